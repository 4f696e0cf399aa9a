//! A more fully-fledged example, showcasing the other methods on [`HeapMovingMedian`]

use moving_median::{HeapMovingMedian, MedianError};

/// Some sample data to calculate the moving median for
///
/// Note the spike at 950.0, which the median filters out
const DATA: [f64; 12] = [
    10.2, 10.4, 9.9, 950.0, 10.1, 10.3, 10.0, 9.8, 10.6, 10.5, 9.7, 10.2,
];

fn main() -> Result<(), MedianError> {
    // Signed sizes, e.g. from user input, can be checked on the way in
    let mut median = HeapMovingMedian::try_from(4_i64)?;

    // Nothing has been ingested yet, so there's no median to report
    assert_eq!(median.median(), Err(MedianError::Empty));

    for data_point in DATA {
        if let Some(oldest) = median.oldest().filter(|_| median.is_full()) {
            println!("{oldest} is about to leave the window");
        }

        median.update(data_point);

        let window: Vec<f64> = median.values().collect();
        println!(
            "Window {window:?} ({}/{} samples), median {}",
            median.len(),
            median.window_size(),
            median.median()?
        );
    }

    // Start over without reallocating
    median.reset();
    println!("After reset, empty: {}", median.is_empty());

    Ok(())
}

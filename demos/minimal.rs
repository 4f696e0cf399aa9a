//! A basic example showing minimal usage
//!
//! We construct a [`HeapMovingMedian`], feed it a stream, and read out the median after every sample

use moving_median::{HeapMovingMedian, MedianError};

/// Some sample data to calculate the moving median for
///
/// In practice, this will probably be an unbounded stream
const DATA: [f64; 15] = [
    18.6, 83.1, 21.5, 21.4, 63.4, 64.1, 4.6, 92.7, 31.1, 94.8, 2.4, 44.5, 70.0, 17.1, 61.0,
];

fn main() -> Result<(), MedianError> {
    // Median of the last 5 samples
    let mut median = HeapMovingMedian::new(5)?;

    for data_point in DATA {
        let current = median.update(data_point);
        println!("{data_point:>6} -> median {current}");
    }

    Ok(())
}

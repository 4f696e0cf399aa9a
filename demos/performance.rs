//! Times the three estimators over growing window sizes
//!
//! Every estimator gets the same random stream, and their final medians must agree.
//! Results are written as CSV rows: `window,naive_ms,tree_ms,heap_ms`.
//!
//! Usage: `cargo run --release --example performance -- [output.csv] [max_window]`

use std::{
    env,
    error::Error,
    fs::File,
    io::{self, BufWriter, Write},
    time::Instant,
};

use moving_median::{
    reference::{NaiveMovingMedian, TreeMovingMedian},
    HeapMovingMedian, MovingMedian,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SAMPLES: usize = 500_000;
const WINDOW_STEP: usize = 4;
const EPSILON: f64 = 1e-9;

/// Runs one estimator over the stream, returning the elapsed milliseconds and its final median
fn time(estimator: &mut dyn MovingMedian, values: &[f64]) -> Result<(u128, f64), Box<dyn Error>> {
    let start = Instant::now();
    for value in values {
        estimator.update(*value);
    }
    let elapsed = start.elapsed().as_millis();

    Ok((elapsed, estimator.median()?))
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let mut out: Box<dyn Write> = match args.next() {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };
    let max_window: usize = match args.next() {
        Some(arg) => arg.parse()?,
        None => 1000,
    };

    let mut rng = StdRng::seed_from_u64(17);
    writeln!(out, "window,naive_ms,tree_ms,heap_ms")?;

    for window in (WINDOW_STEP..=max_window).step_by(WINDOW_STEP) {
        eprintln!("Executing test window = {window}");
        let values: Vec<f64> = (0..SAMPLES).map(|_| rng.random()).collect();

        let (naive_ms, naive) = time(&mut NaiveMovingMedian::new(window)?, &values)?;
        let (tree_ms, tree) = time(&mut TreeMovingMedian::new(window)?, &values)?;
        let (heap_ms, heap) = time(&mut HeapMovingMedian::new(window)?, &values)?;

        if (naive - tree).abs() > EPSILON || (naive - heap).abs() > EPSILON {
            return Err(format!(
                "inconsistent results for window {window}: naive {naive}, tree {tree}, heap {heap}"
            )
            .into());
        }

        writeln!(out, "{window},{naive_ms},{tree_ms},{heap_ms}")?;
    }

    out.flush()?;
    Ok(())
}

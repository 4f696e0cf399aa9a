use thiserror::Error;

/// Failures reported by the moving-median estimators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MedianError {
    /// The requested window cannot hold any samples
    #[error("window size must be a positive integer, got {window}")]
    InvalidWindowSize {
        /// The rejected window size
        window: i64,
    },
    /// No sample has been ingested yet, so there is no median
    #[error("median requested before any sample was ingested")]
    Empty,
}

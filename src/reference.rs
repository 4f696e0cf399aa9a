//! Straightforward moving-median estimators used as baselines
//!
//! These are slower than [`crate::HeapMovingMedian`], but simple enough to trust.
//! They are used to cross-check the heap estimator and to benchmark against it.

use std::collections::{BTreeSet, VecDeque};

use ordered_float::OrderedFloat;

use crate::{validate_window, MedianError, MovingMedian};

/// Recomputes the median by sorting a copy of the whole window on every update
///
/// O(n log n) per update.
#[derive(Debug, Clone)]
pub struct NaiveMovingMedian {
    window_size: usize,
    window: VecDeque<f64>,
    /// Reused buffer for the sorted copy
    sorted: Vec<f64>,
    median: Option<f64>,
}

impl NaiveMovingMedian {
    /// Constructs an empty estimator over the last `window_size` samples
    pub fn new(window_size: usize) -> Result<Self, MedianError> {
        validate_window(window_size)?;

        Ok(Self {
            window_size,
            window: VecDeque::with_capacity(window_size),
            sorted: Vec::with_capacity(window_size),
            median: None,
        })
    }
}

impl MovingMedian for NaiveMovingMedian {
    fn update(&mut self, value: f64) -> f64 {
        if self.window.len() == self.window_size {
            self.window.pop_front();
        }
        self.window.push_back(value);

        self.sorted.clear();
        self.sorted.extend(self.window.iter().copied());
        self.sorted.sort_by(f64::total_cmp);

        let half = self.sorted.len() / 2;
        let median = if self.sorted.len() % 2 == 1 {
            self.sorted[half]
        } else {
            (self.sorted[half - 1] + self.sorted[half]) / 2.
        };

        self.median = Some(median);
        median
    }

    fn median(&self) -> Result<f64, MedianError> {
        self.median.ok_or(MedianError::Empty)
    }

    fn window_size(&self) -> usize {
        self.window_size
    }
}

/// Window entries are tagged with their arrival sequence so equal values stay distinct in the sets
type Entry = (OrderedFloat<f64>, u64);

/// Keeps the window split across two ordered sets
///
/// `lower` holds the smaller half and is never smaller than `upper`,
/// so the median is either the largest entry of `lower` or the mean of both boundary entries.
/// O(log n) per update.
#[derive(Debug, Clone)]
pub struct TreeMovingMedian {
    window_size: usize,
    window: VecDeque<Entry>,
    lower: BTreeSet<Entry>,
    upper: BTreeSet<Entry>,
    sequence: u64,
    median: Option<f64>,
}

impl TreeMovingMedian {
    /// Constructs an empty estimator over the last `window_size` samples
    pub fn new(window_size: usize) -> Result<Self, MedianError> {
        validate_window(window_size)?;

        Ok(Self {
            window_size,
            window: VecDeque::with_capacity(window_size),
            lower: BTreeSet::new(),
            upper: BTreeSet::new(),
            sequence: 0,
            median: None,
        })
    }

    fn rebalance(&mut self) {
        while self.lower.len() > self.upper.len() + 1 {
            if let Some(entry) = self.lower.pop_last() {
                self.upper.insert(entry);
            }
        }
        while self.upper.len() > self.lower.len() {
            if let Some(entry) = self.upper.pop_first() {
                self.lower.insert(entry);
            }
        }

        // An emptied `lower` can route a large value below smaller `upper` entries
        while let (Some(&low), Some(&high)) = (self.lower.last(), self.upper.first()) {
            if low.0 <= high.0 {
                break;
            }
            self.lower.remove(&low);
            self.upper.remove(&high);
            self.lower.insert(high);
            self.upper.insert(low);
        }
    }
}

impl MovingMedian for TreeMovingMedian {
    fn update(&mut self, value: f64) -> f64 {
        if self.window.len() == self.window_size {
            if let Some(oldest) = self.window.pop_front() {
                if !self.lower.remove(&oldest) {
                    self.upper.remove(&oldest);
                }
            }
        }

        let entry = (OrderedFloat(value), self.sequence);
        self.sequence += 1;
        self.window.push_back(entry);

        if self.lower.last().is_some_and(|top| entry.0 > top.0) {
            self.upper.insert(entry);
        } else {
            self.lower.insert(entry);
        }
        self.rebalance();

        let median = match (self.lower.last(), self.upper.first()) {
            (Some(low), Some(high)) if self.lower.len() == self.upper.len() => {
                (low.0 .0 + high.0 .0) / 2.
            }
            (Some(low), _) => low.0 .0,
            (None, _) => unreachable!("lower set holds at least one entry after an update"),
        };

        self.median = Some(median);
        median
    }

    fn median(&self) -> Result<f64, MedianError> {
        self.median.ok_or(MedianError::Empty)
    }

    fn window_size(&self) -> usize {
        self.window_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medians<M: MovingMedian>(estimator: &mut M, data: &[f64]) -> Vec<f64> {
        data.iter().map(|v| estimator.update(*v)).collect()
    }

    #[test]
    fn naive_warm_up_and_slide() {
        let mut naive = NaiveMovingMedian::new(3).unwrap();

        assert_eq!(
            medians(&mut naive, &[10., 1., 5., 3., 8.]),
            vec![10., 5.5, 5., 3., 5.]
        );
    }

    #[test]
    fn tree_warm_up_and_slide() {
        let mut tree = TreeMovingMedian::new(3).unwrap();

        assert_eq!(
            medians(&mut tree, &[10., 1., 5., 3., 8.]),
            vec![10., 5.5, 5., 3., 5.]
        );
    }

    #[test]
    fn tree_handles_duplicates() {
        let mut tree = TreeMovingMedian::new(4).unwrap();

        assert_eq!(
            medians(&mut tree, &[2., 2., 2., 1., 1., 1., 1.]),
            vec![2., 2., 2., 2., 1.5, 1., 1.]
        );
    }

    #[test]
    fn tree_refills_empty_lower() {
        let mut tree = TreeMovingMedian::new(2).unwrap();

        // Evicting 1 empties the lower set while 2 is still in the upper one
        assert_eq!(medians(&mut tree, &[1., 2., 9., 0.]), vec![1., 1.5, 5.5, 4.5]);
    }

    #[test]
    fn both_agree() {
        let data: Vec<f64> = (0..200).map(|i| ((i * 37) % 101) as f64).collect();

        for window in 1..12 {
            let mut naive = NaiveMovingMedian::new(window).unwrap();
            let mut tree = TreeMovingMedian::new(window).unwrap();

            assert_eq!(medians(&mut naive, &data), medians(&mut tree, &data));
        }
    }

    #[test]
    fn empty_window_rejected() {
        assert_eq!(
            NaiveMovingMedian::new(0).unwrap_err(),
            MedianError::InvalidWindowSize { window: 0 }
        );
        assert!(TreeMovingMedian::new(0).is_err());
    }

    #[test]
    fn no_median_before_update() {
        let naive = NaiveMovingMedian::new(4).unwrap();
        let tree = TreeMovingMedian::new(4).unwrap();

        assert_eq!(naive.median(), Err(MedianError::Empty));
        assert_eq!(tree.median(), Err(MedianError::Empty));
        assert_eq!(tree.window_size(), 4);
    }
}

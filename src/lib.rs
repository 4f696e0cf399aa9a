#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod error;
mod heap;
pub mod reference;
mod ring;

pub use error::MedianError;

use std::cmp::Ordering;

use heap::IndexedHeap;
use ring::{Side, WindowRing};

/// Window size used by [`HeapMovingMedian::default`]
pub const DEFAULT_WINDOW_SIZE: usize = 64;

/// Common interface of every estimator in this crate
///
/// Lets a harness drive [`HeapMovingMedian`] and the [`reference`] estimators over the same stream.
pub trait MovingMedian {
    /// Ingests one sample and returns the median of the current window
    fn update(&mut self, value: f64) -> f64;

    /// Median computed by the last [`Self::update`]
    ///
    /// Returns [`MedianError::Empty`] if nothing has been ingested yet.
    fn median(&self) -> Result<f64, MedianError>;

    /// Number of samples the window holds once full
    fn window_size(&self) -> usize;
}

pub(crate) fn validate_window(window_size: usize) -> Result<(), MedianError> {
    if window_size == 0 {
        return Err(MedianError::InvalidWindowSize { window: 0 });
    }

    Ok(())
}

/// Median of the last `window_size` samples of a stream, updated in O(log n) per sample
///
/// The window is split between two heaps: a max-heap with the smaller half of the samples,
/// and a min-heap with the larger half. Their roots are the two central values of the window.
///
/// A ring with one entry per window slot records which heap holds each sample and where,
/// so the oldest sample can be pulled out of the middle of a heap when it leaves the window.
///
/// The lower heap can hold `⌈n/2⌉` samples and the upper heap `⌊n/2⌋`,
/// so odd windows keep their central value at the root of the lower heap.
///
/// Before the window fills up, the median is taken over the samples ingested so far.
#[derive(Debug, Clone)]
pub struct HeapMovingMedian {
    /// Samples currently in the window
    len: usize,

    /// Max-heap with the smaller half of the window
    lower: IndexedHeap,
    /// Min-heap with the larger half of the window
    upper: IndexedHeap,

    /// Where each window slot lives in [`Self::lower`] or [`Self::upper`]
    ///
    /// Its cursor is the slot the next sample will be written to.
    ring: WindowRing,

    /// Median after the last update, if there was one
    median: Option<f64>,
}

impl Default for HeapMovingMedian {
    /// Initializes an estimator with a window of [`DEFAULT_WINDOW_SIZE`] samples
    fn default() -> Self {
        Self::build(DEFAULT_WINDOW_SIZE)
    }
}

impl TryFrom<i64> for HeapMovingMedian {
    type Error = MedianError;

    /// Constructs an estimator from a signed window size, rejecting anything below one
    fn try_from(window_size: i64) -> Result<Self, Self::Error> {
        match usize::try_from(window_size) {
            Ok(window) if window > 0 => Self::new(window),
            _ => Err(MedianError::InvalidWindowSize {
                window: window_size,
            }),
        }
    }
}

impl HeapMovingMedian {
    /// Constructs a new [`Self`] over the last `window_size` samples, without any samples collected
    ///
    /// Any positive window size is accepted. A window of zero returns [`MedianError::InvalidWindowSize`].
    pub fn new(window_size: usize) -> Result<Self, MedianError> {
        validate_window(window_size)?;
        Ok(Self::build(window_size))
    }

    fn build(window_size: usize) -> Self {
        let lower_capacity = window_size - window_size / 2;
        let upper_capacity = window_size / 2;

        #[cfg(feature = "log")]
        log::debug!(
            "Moving median over {} samples: lower heap capacity {}, upper heap capacity {}",
            window_size,
            lower_capacity,
            upper_capacity
        );

        Self {
            len: 0,
            lower: IndexedHeap::new(Side::Lower, lower_capacity),
            upper: IndexedHeap::new(Side::Upper, upper_capacity),
            ring: WindowRing::new(window_size),
            median: None,
        }
    }

    /// Number of samples the window holds once full
    pub fn window_size(&self) -> usize {
        self.ring.capacity()
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no sample has been ingested since construction or the last [`Self::reset`]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the next update will evict a sample
    pub fn is_full(&self) -> bool {
        self.len == self.window_size()
    }

    /// Median computed by the last [`Self::update`]
    ///
    /// Returns [`MedianError::Empty`] if nothing has been ingested yet.
    pub fn median(&self) -> Result<f64, MedianError> {
        self.median.ok_or(MedianError::Empty)
    }

    /// Oldest sample in the window
    ///
    /// Once the window is full, this is the sample the next update evicts.
    pub fn oldest(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }

        self.value_in_slot(self.ring.oldest_slot(self.len))
    }

    /// Samples in the window, oldest first
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        let oldest = self.ring.oldest_slot(self.len);
        let window_size = self.window_size();

        (0..self.len).filter_map(move |i| self.value_in_slot((oldest + i) % window_size))
    }

    /// Empties the window, keeping the allocated storage
    pub fn reset(&mut self) {
        self.lower.clear();
        self.upper.clear();
        self.ring.reset();
        self.len = 0;
        self.median = None;
    }

    /// Processes a new sample in the stream, returning the updated median
    ///
    /// If the window is full, the oldest sample is evicted first.
    pub fn update(&mut self, value: f64) -> f64 {
        if value.is_nan() {
            #[cfg(feature = "log")]
            log::warn!("Got NaN sample. Medians will be unreliable while it is in the window.");
        }

        if self.is_full() {
            self.evict();
        }

        let slot = self.ring.next_evict_slot();
        let into_lower = match self.lower.root() {
            Some(top) => value <= top,
            None => true,
        };

        // Make room in the destination first, so both heaps stay within one of each other
        if into_lower {
            if self.lower.is_full() || self.lower.len() > self.upper.len() {
                self.lower.transfer_root_to(&mut self.upper, &mut self.ring);
            }
            self.lower.insert(value, slot, &mut self.ring);
        } else {
            if self.upper.is_full() || self.upper.len() > self.lower.len() {
                self.upper.transfer_root_to(&mut self.lower, &mut self.ring);
            }
            self.upper.insert(value, slot, &mut self.ring);
        }

        self.repair_order();

        self.len += 1;
        self.ring.advance();

        let median = self.central_value();
        self.median = Some(median);
        median
    }

    /// Removes the oldest sample from whichever heap holds it
    fn evict(&mut self) -> Option<f64> {
        let location = self.ring.location(self.ring.next_evict_slot())?;
        let heap = match location.side {
            Side::Lower => &mut self.lower,
            Side::Upper => &mut self.upper,
        };

        let value = heap.extract_at(location.position, &mut self.ring);
        self.len -= 1;

        Some(value)
    }

    /// Swaps the roots until every lower value is at most every upper value
    ///
    /// Only a transfer from the upper heap followed by a smaller insert breaks the order,
    /// and a single swap fixes that.
    fn repair_order(&mut self) {
        while let (Some(low), Some(high)) = (self.lower.root(), self.upper.root()) {
            if low.partial_cmp(&high) != Some(Ordering::Greater) {
                break;
            }

            #[cfg(feature = "log")]
            log::trace!("Swapping heap roots {} and {}", low, high);

            self.lower.swap_roots_with(&mut self.upper, &mut self.ring);
        }
    }

    fn central_value(&self) -> f64 {
        match (self.lower.root(), self.upper.root()) {
            (Some(low), Some(high)) => match self.lower.len().cmp(&self.upper.len()) {
                Ordering::Greater => low,
                Ordering::Less => high,
                Ordering::Equal => (low + high) / 2.,
            },
            (Some(low), None) => low,
            (None, Some(high)) => high,
            (None, None) => unreachable!("a sample was just inserted"),
        }
    }

    fn value_in_slot(&self, slot: usize) -> Option<f64> {
        let location = self.ring.location(slot)?;
        let heap = match location.side {
            Side::Lower => &self.lower,
            Side::Upper => &self.upper,
        };

        Some(heap.value_at(location.position))
    }
}

impl MovingMedian for HeapMovingMedian {
    fn update(&mut self, value: f64) -> f64 {
        HeapMovingMedian::update(self, value)
    }

    fn median(&self) -> Result<f64, MedianError> {
        HeapMovingMedian::median(self)
    }

    fn window_size(&self) -> usize {
        HeapMovingMedian::window_size(self)
    }
}

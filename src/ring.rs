//! Circular record of where each live window sample currently sits

/// Which of the two heaps holds a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    /// Max-ordered heap with the smaller half of the window
    Lower,
    /// Min-ordered heap with the larger half of the window
    Upper,
}

/// Heap side and array position of one window sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Location {
    pub(crate) side: Side,
    pub(crate) position: usize,
}

/// Fixed-capacity ring of [`Location`]s, one per window slot
///
/// The cursor always points at the slot the next sample will be written to,
/// which is also the oldest sample once the window is full.
#[derive(Debug, Clone)]
pub(crate) struct WindowRing {
    slots: Vec<Option<Location>>,
    cursor: usize,
}

impl WindowRing {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            cursor: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Slot about to be overwritten by the next sample
    pub(crate) fn next_evict_slot(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor forward, wrapping at the capacity
    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor == self.slots.len() {
            self.cursor = 0;
        }
    }

    /// Slot of the oldest live sample, given how many samples are live
    pub(crate) fn oldest_slot(&self, len: usize) -> usize {
        (self.cursor + self.slots.len() - len) % self.slots.len()
    }

    pub(crate) fn location(&self, slot: usize) -> Option<Location> {
        self.slots[slot]
    }

    pub(crate) fn place(&mut self, slot: usize, side: Side, position: usize) {
        self.slots[slot] = Some(Location { side, position });
    }

    pub(crate) fn clear(&mut self, slot: usize) {
        self.slots[slot] = None;
    }

    /// Forgets every location and rewinds the cursor
    pub(crate) fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.cursor = 0;
    }
}

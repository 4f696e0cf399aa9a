//! Bounded binary heap whose entries can be removed from any position
//!
//! Every entry carries the window slot that owns it, and every move of an entry
//! is written back to the [`WindowRing`], so the ring always knows where a sample
//! lives. That is what makes eviction of the oldest sample O(log n).

use crate::ring::{Side, WindowRing};

fn parent_of(k: usize) -> usize {
    (k - 1) / 2
}

fn left_child_of(k: usize) -> usize {
    2 * k + 1
}

/// A capacity-bounded heap over `f64` values
///
/// The [`Side`] fixes the ordering: [`Side::Lower`] is a max-heap, [`Side::Upper`] a min-heap.
#[derive(Debug, Clone)]
pub(crate) struct IndexedHeap {
    side: Side,
    capacity: usize,
    /// Heap-ordered values
    values: Vec<f64>,
    /// Window slot owning the value at the same position in [`Self::values`]
    owners: Vec<usize>,
}

impl IndexedHeap {
    pub(crate) fn new(side: Side, capacity: usize) -> Self {
        Self {
            side,
            capacity,
            values: Vec::with_capacity(capacity),
            owners: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Extremal value of the heap, if any
    pub(crate) fn root(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub(crate) fn value_at(&self, position: usize) -> f64 {
        self.values[position]
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
        self.owners.clear();
    }

    /// Whether `a` belongs closer to the root than `b`
    fn precedes(&self, a: f64, b: f64) -> bool {
        match self.side {
            Side::Lower => a > b,
            Side::Upper => a < b,
        }
    }

    /// Adds `value` owned by window slot `owner`, returning its final position
    ///
    /// Panics if the heap is full. The caller is responsible for rebalancing first.
    pub(crate) fn insert(&mut self, value: f64, owner: usize, ring: &mut WindowRing) -> usize {
        assert!(
            !self.is_full(),
            "insert into a full {:?} heap of capacity {}",
            self.side,
            self.capacity
        );

        let position = self.values.len();
        self.values.push(value);
        self.owners.push(owner);
        ring.place(owner, self.side, position);

        self.sift_up(position, ring)
    }

    /// Removes and returns the value at `position`
    ///
    /// The last entry is moved into the hole and then sifted whichever way restores heap order.
    pub(crate) fn extract_at(&mut self, position: usize, ring: &mut WindowRing) -> f64 {
        let (value, owner) = self.remove(position, ring);
        ring.clear(owner);
        value
    }

    /// Moves this heap's root into `other`, keeping its owning slot
    pub(crate) fn transfer_root_to(&mut self, other: &mut IndexedHeap, ring: &mut WindowRing) {
        if self.is_empty() {
            return;
        }

        let (value, owner) = self.remove(0, ring);
        other.insert(value, owner, ring);
    }

    /// Exchanges the roots of the two heaps without changing either size
    pub(crate) fn swap_roots_with(&mut self, other: &mut IndexedHeap, ring: &mut WindowRing) {
        if self.is_empty() || other.is_empty() {
            return;
        }

        let (value, owner) = (self.values[0], self.owners[0]);
        let (other_value, other_owner) = other.replace_root(value, owner, ring);
        self.replace_root(other_value, other_owner, ring);
    }

    fn remove(&mut self, position: usize, ring: &mut WindowRing) -> (f64, usize) {
        let value = self.values.swap_remove(position);
        let owner = self.owners.swap_remove(position);

        if position < self.values.len() {
            ring.place(self.owners[position], self.side, position);
            let position = self.sift_up(position, ring);
            self.sift_down(position, ring);
        }

        (value, owner)
    }

    /// Overwrites the root, returning the previous root and its owner
    fn replace_root(&mut self, value: f64, owner: usize, ring: &mut WindowRing) -> (f64, usize) {
        let old = (self.values[0], self.owners[0]);
        self.values[0] = value;
        self.owners[0] = owner;
        ring.place(owner, self.side, 0);
        self.sift_down(0, ring);

        old
    }

    fn swap(&mut self, i: usize, j: usize, ring: &mut WindowRing) {
        self.values.swap(i, j);
        self.owners.swap(i, j);
        ring.place(self.owners[i], self.side, i);
        ring.place(self.owners[j], self.side, j);
    }

    fn sift_up(&mut self, mut k: usize, ring: &mut WindowRing) -> usize {
        while k > 0 {
            let parent = parent_of(k);
            if !self.precedes(self.values[k], self.values[parent]) {
                break;
            }
            self.swap(k, parent, ring);
            k = parent;
        }

        k
    }

    fn sift_down(&mut self, mut k: usize, ring: &mut WindowRing) -> usize {
        let len = self.values.len();
        loop {
            let left = left_child_of(k);
            if left >= len {
                break;
            }

            let right = left + 1;
            let child = if right < len && self.precedes(self.values[right], self.values[left]) {
                right
            } else {
                left
            };

            if !self.precedes(self.values[child], self.values[k]) {
                break;
            }
            self.swap(k, child, ring);
            k = child;
        }

        k
    }

    /// Asserts heap order and that every owner slot points back at its position
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self, ring: &WindowRing) {
        use crate::ring::Location;

        assert!(self.len() <= self.capacity);
        assert_eq!(self.values.len(), self.owners.len());
        for k in 1..self.len() {
            assert!(
                !self.precedes(self.values[k], self.values[parent_of(k)]),
                "{:?} heap order broken at {k}",
                self.side
            );
        }
        for (position, &owner) in self.owners.iter().enumerate() {
            assert_eq!(
                ring.location(owner),
                Some(Location {
                    side: self.side,
                    position
                })
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(side: Side, data: &[f64]) -> (IndexedHeap, WindowRing) {
        let mut ring = WindowRing::new(data.len());
        let mut heap = IndexedHeap::new(side, data.len());
        for (slot, v) in data.iter().enumerate() {
            heap.insert(*v, slot, &mut ring);
        }

        (heap, ring)
    }

    const DATA: [f64; 9] = [5., 3., 8., 1., 9., 2., 7., 4., 6.];

    #[test]
    fn index_arithmetic() {
        assert_eq!(left_child_of(0), 1);
        assert_eq!(left_child_of(3), 7);
        assert_eq!(parent_of(1), 0);
        assert_eq!(parent_of(2), 0);
        assert_eq!(parent_of(8), 3);
    }

    #[test]
    fn max_heap_root() {
        let (heap, ring) = filled(Side::Lower, &DATA);

        assert_eq!(heap.root(), Some(9.));
        heap.assert_consistent(&ring);
    }

    #[test]
    fn min_heap_root() {
        let (heap, ring) = filled(Side::Upper, &DATA);

        assert_eq!(heap.root(), Some(1.));
        heap.assert_consistent(&ring);
    }

    #[test]
    fn empty_root() {
        let heap = IndexedHeap::new(Side::Lower, 4);
        assert_eq!(heap.root(), None);
        assert!(heap.is_empty());
    }

    #[test]
    fn extract_every_slot_in_turn() {
        let (mut heap, mut ring) = filled(Side::Upper, &DATA);

        // Remove by owning slot, the way eviction does
        for (slot, expected) in DATA.iter().enumerate() {
            let position = ring.location(slot).unwrap().position;
            assert_eq!(heap.extract_at(position, &mut ring), *expected);
            assert_eq!(ring.location(slot), None);
            heap.assert_consistent(&ring);
        }

        assert!(heap.is_empty());
    }

    #[test]
    fn extract_last_position() {
        let (mut heap, mut ring) = filled(Side::Lower, &DATA);
        let last = heap.len() - 1;
        let expected = heap.value_at(last);

        assert_eq!(heap.extract_at(last, &mut ring), expected);
        heap.assert_consistent(&ring);
    }

    #[test]
    fn transfer_keeps_owner() {
        let mut ring = WindowRing::new(4);
        let mut lower = IndexedHeap::new(Side::Lower, 2);
        let mut upper = IndexedHeap::new(Side::Upper, 2);
        lower.insert(1., 0, &mut ring);
        lower.insert(2., 1, &mut ring);

        lower.transfer_root_to(&mut upper, &mut ring);

        assert_eq!(lower.root(), Some(1.));
        assert_eq!(upper.root(), Some(2.));
        assert_eq!(ring.location(1).unwrap().side, Side::Upper);
        lower.assert_consistent(&ring);
        upper.assert_consistent(&ring);
    }

    #[test]
    fn swap_roots() {
        let mut ring = WindowRing::new(6);
        let mut lower = IndexedHeap::new(Side::Lower, 3);
        let mut upper = IndexedHeap::new(Side::Upper, 3);
        for (slot, v) in [1., 6., 2.].into_iter().enumerate() {
            lower.insert(v, slot, &mut ring);
        }
        for (slot, v) in [4., 5., 7.].into_iter().enumerate() {
            upper.insert(v, slot + 3, &mut ring);
        }

        lower.swap_roots_with(&mut upper, &mut ring);

        assert_eq!(lower.root(), Some(4.));
        assert_eq!(upper.root(), Some(5.));
        assert_eq!(lower.len(), 3);
        assert_eq!(upper.len(), 3);
        assert_eq!(ring.location(1).unwrap().side, Side::Upper);
        assert_eq!(ring.location(3).unwrap().side, Side::Lower);
        lower.assert_consistent(&ring);
        upper.assert_consistent(&ring);
    }

    #[test]
    #[should_panic]
    fn insert_past_capacity() {
        let mut ring = WindowRing::new(2);
        let mut heap = IndexedHeap::new(Side::Upper, 1);
        heap.insert(1., 0, &mut ring);
        heap.insert(2., 1, &mut ring);
    }

    #[test]
    fn zero_capacity_is_full() {
        let heap = IndexedHeap::new(Side::Upper, 0);
        assert!(heap.is_full());
        assert!(heap.is_empty());
    }
}

//! Binary Heap implementation
//!
//! An array-backed binary heap ordered by a caller-supplied comparator
//! (natural `Ord` order by default, so a min-heap).
//!
//! Items are located by value equality for [`update`](BinaryHeap::update),
//! which is an O(n) scan. Callers needing O(log n) priority changes should
//! use the handle-based [`FibonacciHeap`](crate::fibonacci::FibonacciHeap).
//!
//! # Time Complexity
//!
//! | Operation        | Complexity         |
//! |------------------|--------------------|
//! | `push`           | O(log n) amortized |
//! | `remove_minimum` | O(log n)           |
//! | `minimum`        | O(1)               |
//! | `update`         | O(n)               |
//! | `from_vec`       | O(n)               |
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::binary::BinaryHeap;
//!
//! let mut heap = BinaryHeap::new();
//! for p in [5, 3, 8, 1, 9, 2] {
//!     heap.push(p, p * 10);
//! }
//! heap.update(0, 90);
//! assert_eq!(heap.remove_minimum(), Ok((0, 90)));
//! assert_eq!(heap.remove_minimum(), Ok((1, 10)));
//! ```

use crate::compare::{Compare, NaturalOrder};
use crate::error::{Error, Result};
use crate::traits::Heap;
use std::cmp::Ordering;
use std::fmt;

/// Initial capacity used by [`BinaryHeap::new`]
pub const DEFAULT_CAPACITY: usize = 16;

/// An array-backed binary heap of (priority, value) pairs
///
/// The root holds the priority that compares lowest under the comparator.
/// Capacity grows to `2 * capacity + 1` whenever a push finds the heap full.
pub struct BinaryHeap<T, P, C = NaturalOrder> {
    /// Heap-ordered (priority, value) pairs
    data: Vec<(P, T)>,
    /// Logical capacity; the backing vector reserves exactly this much
    capacity: usize,
    /// Bumped by every mutation
    version: u64,
    cmp: C,
}

impl<T, P: Ord> BinaryHeap<T, P> {
    /// Creates an empty heap ordered by `P`'s natural order
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, NaturalOrder)
    }
}

impl<T, P: Ord> Default for BinaryHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, C: Compare<P>> BinaryHeap<T, P, C> {
    /// Creates an empty heap ordered by `cmp`
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_capacity_and_comparator(DEFAULT_CAPACITY, cmp)
    }

    /// Creates an empty heap with the given capacity and comparator
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            version: 0,
            cmp,
        }
    }

    /// Builds a heap from unordered pairs in O(n)
    pub fn from_vec(pairs: Vec<(P, T)>, cmp: C) -> Self {
        let capacity = pairs.len();
        let mut heap = Self {
            data: pairs,
            capacity,
            version: 0,
            cmp,
        };
        for index in (0..heap.data.len() / 2).rev() {
            heap.sift_down(index);
        }
        heap
    }

    /// Number of elements the heap holds before it next grows
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of elements in the heap
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mutation counter, bumped by every structural change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Inserts `value` with `priority`
    pub fn push(&mut self, priority: P, value: T) {
        if self.data.len() == self.capacity {
            self.capacity = self.capacity * 2 + 1;
            self.data.reserve_exact(self.capacity - self.data.len());
        }
        self.data.push((priority, value));
        self.sift_up(self.data.len() - 1);
        self.version += 1;
    }

    /// Returns the root pair without removing it
    pub fn minimum(&self) -> Result<(&P, &T)> {
        self.data
            .first()
            .map(|(p, t)| (p, t))
            .ok_or(Error::EmptyCollection)
    }

    /// Removes and returns the root pair
    pub fn remove_minimum(&mut self) -> Result<(P, T)> {
        if self.data.is_empty() {
            return Err(Error::EmptyCollection);
        }
        self.remove_at(0)
    }

    /// Removes the pair stored at heap position `index`
    ///
    /// The last element is moved into the hole and sifted in whichever
    /// direction restores the heap property, since its priority may be
    /// smaller or larger than its new neighbours.
    pub fn remove_at(&mut self, index: usize) -> Result<(P, T)> {
        let len = self.data.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        let removed = self.data.swap_remove(index);
        if index < self.data.len() && self.sift_up(index) == index {
            self.sift_down(index);
        }
        self.version += 1;
        Ok(removed)
    }

    /// Removes every element, keeping the capacity
    pub fn clear(&mut self) {
        self.data.clear();
        self.version += 1;
    }

    /// Verifies the heap property over the whole backing array
    ///
    /// Intended for tests; O(n).
    pub fn is_consistent(&self) -> bool {
        (1..self.data.len()).all(|index| !self.less(index, (index - 1) / 2))
    }

    /// Iterates pairs in heap-array order (not sorted)
    pub fn iter(&self) -> Iter<'_, T, P> {
        Iter {
            inner: self.data.iter(),
        }
    }

    /// Consumes the heap, returning pairs in extraction order
    pub fn into_sorted_vec(mut self) -> Vec<(P, T)> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Ok(pair) = self.remove_minimum() {
            sorted.push(pair);
        }
        sorted
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.cmp.compare(&self.data[a].0, &self.data[b].0) == Ordering::Less
    }

    /// Move element at index up to maintain heap property, returning where it
    /// came to rest
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.data.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }

            if smallest == index {
                break;
            }
            self.data.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T: PartialEq, P, C: Compare<P>> BinaryHeap<T, P, C> {
    /// Position of `value` in the backing array, found by linear scan
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.data.iter().position(|(_, v)| v == value)
    }

    /// Sets the priority of `value`, inserting it when absent
    ///
    /// O(n) because the value is located by scanning.
    pub fn update(&mut self, priority: P, value: T) {
        let Some(index) = self.index_of(&value) else {
            self.push(priority, value);
            return;
        };
        let ordering = self.cmp.compare(&priority, &self.data[index].0);
        self.data[index] = (priority, value);
        match ordering {
            Ordering::Less => {
                self.sift_up(index);
            }
            Ordering::Greater => self.sift_down(index),
            Ordering::Equal => {}
        }
        self.version += 1;
    }

    /// Like [`update`](Self::update), but only lowers priorities
    ///
    /// Returns true if the heap changed (value inserted or moved closer to
    /// the root).
    pub fn minimum_update(&mut self, priority: P, value: T) -> bool {
        match self.index_of(&value) {
            Some(index) if self.cmp.compare(&priority, &self.data[index].0) != Ordering::Less => {
                false
            }
            _ => {
                self.update(priority, value);
                true
            }
        }
    }
}

impl<T: Clone, P: Clone, C> BinaryHeap<T, P, C> {
    /// Snapshot of the values in heap-array order
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Snapshot of the (priority, value) pairs in heap-array order
    pub fn to_pairs(&self) -> Vec<(P, T)> {
        self.data.clone()
    }
}

impl<T, P, C: Compare<P>> Heap<T, P> for BinaryHeap<T, P, C> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn push(&mut self, priority: P, item: T) {
        BinaryHeap::push(self, priority, item);
    }

    fn peek(&self) -> Result<(&P, &T)> {
        self.minimum()
    }

    fn pop(&mut self) -> Result<(P, T)> {
        self.remove_minimum()
    }
}

impl<T: fmt::Debug, P: fmt::Debug, C> fmt::Debug for BinaryHeap<T, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryHeap")
            .field("capacity", &self.capacity)
            .field("version", &self.version)
            .field("data", &self.data)
            .finish()
    }
}

/// Iterator over a [`BinaryHeap`] in heap-array order
pub struct Iter<'a, T, P> {
    inner: std::slice::Iter<'a, (P, T)>,
}

impl<'a, T, P> Iterator for Iter<'a, T, P> {
    type Item = (&'a P, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(p, t)| (p, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, P> ExactSizeIterator for Iter<'_, T, P> {}

impl<'a, T, P, C: Compare<P>> IntoIterator for &'a BinaryHeap<T, P, C> {
    type Item = (&'a P, &'a T);
    type IntoIter = Iter<'a, T, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

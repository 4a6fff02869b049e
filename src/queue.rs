//! Priority queues that derive priorities from their items
//!
//! Graph searches usually keep priorities outside the queue (a distance
//! table indexed by vertex) and want to queue the vertices themselves. Both
//! adapters here take a projection `Fn(&T) -> P` at construction and call it
//! whenever an item is enqueued or updated:
//!
//! - [`BinaryQueue`] wraps a [`BinaryHeap`]. `update` is an O(n) scan.
//! - [`FibonacciQueue`] wraps a [`FibonacciHeap`] and remembers the handle of
//!   every queued item, so `update` is a decrease-key.
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::queue::FibonacciQueue;
//! use graph_heaps::PriorityQueue;
//! use std::cell::Cell;
//!
//! let distance = [Cell::new(9), Cell::new(4), Cell::new(7)];
//! let mut queue = FibonacciQueue::new(|v: &usize| distance[*v].get());
//! for v in 0..3 {
//!     queue.enqueue(v);
//! }
//! distance[0].set(1);
//! queue.update(0);
//! assert_eq!(queue.dequeue(), Ok(0));
//! assert_eq!(queue.dequeue(), Ok(1));
//! ```

use crate::binary::BinaryHeap;
use crate::compare::{Compare, Direction, NaturalOrder};
use crate::error::Result;
use crate::fibonacci::{FibonacciHandle, FibonacciHeap};
use crate::traits::PriorityQueue;
use rustc_hash::FxHashMap;
use std::fmt;
use std::hash::Hash;

/// Priority queue backed by a [`BinaryHeap`]
///
/// Enqueueing an item that is already queued repositions it instead of
/// queueing a second copy. The membership check is an O(n) scan.
pub struct BinaryQueue<T, P, F, C = NaturalOrder> {
    heap: BinaryHeap<T, P, C>,
    priority_of: F,
}

impl<T, P: Ord, F: Fn(&T) -> P> BinaryQueue<T, P, F> {
    /// Creates an empty queue ordered by `priority_of`, smallest first
    pub fn new(priority_of: F) -> Self {
        Self::with_comparator(priority_of, NaturalOrder)
    }

    /// Builds a queue holding `values` in O(n)
    ///
    /// `values` should be distinct; duplicates are not merged.
    pub fn from_values<I: IntoIterator<Item = T>>(values: I, priority_of: F) -> Self {
        Self::from_values_with_comparator(values, priority_of, NaturalOrder)
    }
}

impl<T, P, F: Fn(&T) -> P, C: Compare<P>> BinaryQueue<T, P, F, C> {
    /// Creates an empty queue whose priorities are ordered by `cmp`
    pub fn with_comparator(priority_of: F, cmp: C) -> Self {
        Self {
            heap: BinaryHeap::with_comparator(cmp),
            priority_of,
        }
    }

    /// Builds a queue holding `values` in O(n), ordered by `cmp`
    pub fn from_values_with_comparator<I: IntoIterator<Item = T>>(
        values: I,
        priority_of: F,
        cmp: C,
    ) -> Self {
        let pairs = values
            .into_iter()
            .map(|value| (priority_of(&value), value))
            .collect();
        Self {
            heap: BinaryHeap::from_vec(pairs, cmp),
            priority_of,
        }
    }
}

impl<T: Clone, P: Clone, F, C> BinaryQueue<T, P, F, C> {
    /// Queued items in heap-array order
    pub fn to_vec(&self) -> Vec<T> {
        self.heap.to_vec()
    }

    /// Queued (priority, item) pairs in heap-array order
    pub fn to_pairs(&self) -> Vec<(P, T)> {
        self.heap.to_pairs()
    }
}

impl<T: PartialEq, P, F: Fn(&T) -> P, C: Compare<P>> PriorityQueue<T>
    for BinaryQueue<T, P, F, C>
{
    fn len(&self) -> usize {
        self.heap.len()
    }

    fn enqueue(&mut self, value: T) {
        // update pushes absent values and repositions queued ones
        self.update(value);
    }

    fn dequeue(&mut self) -> Result<T> {
        self.heap.remove_minimum().map(|(_, value)| value)
    }

    fn peek(&self) -> Result<&T> {
        self.heap.minimum().map(|(_, value)| value)
    }

    fn update(&mut self, value: T) {
        let priority = (self.priority_of)(&value);
        self.heap.update(priority, value);
    }

    fn contains(&self, value: &T) -> bool {
        self.heap.index_of(value).is_some()
    }
}

impl<T: fmt::Debug, P: fmt::Debug, F, C> fmt::Debug for BinaryQueue<T, P, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryQueue")
            .field("heap", &self.heap)
            .finish_non_exhaustive()
    }
}

/// Priority queue backed by a [`FibonacciHeap`]
///
/// Items double as keys of a handle table, so they must be `Hash + Eq` and
/// are cloned once per enqueue. Enqueueing an item that is already queued
/// repositions it instead of queueing a second copy.
pub struct FibonacciQueue<T, P, F, C = NaturalOrder> {
    heap: FibonacciHeap<T, P, C>,
    handles: FxHashMap<T, FibonacciHandle>,
    priority_of: F,
}

impl<T, P: Ord, F: Fn(&T) -> P> FibonacciQueue<T, P, F>
where
    T: Hash + Eq + Clone,
{
    /// Creates an empty queue ordered by `priority_of`, smallest first
    pub fn new(priority_of: F) -> Self {
        Self::with_direction(priority_of, Direction::Increasing)
    }

    /// Creates an empty queue extracting in `direction`
    pub fn with_direction(priority_of: F, direction: Direction) -> Self {
        Self::with_comparator(priority_of, direction, NaturalOrder)
    }

    /// Builds a queue by enqueueing each of `values`
    pub fn from_values<I: IntoIterator<Item = T>>(values: I, priority_of: F) -> Self {
        let mut queue = Self::new(priority_of);
        for value in values {
            queue.enqueue(value);
        }
        queue
    }
}

impl<T, P, F: Fn(&T) -> P, C: Compare<P>> FibonacciQueue<T, P, F, C>
where
    T: Hash + Eq + Clone,
{
    /// Creates an empty queue ordered by `cmp` and extracting in `direction`
    pub fn with_comparator(priority_of: F, direction: Direction, cmp: C) -> Self {
        Self {
            heap: FibonacciHeap::with_comparator(direction, cmp),
            handles: FxHashMap::default(),
            priority_of,
        }
    }

    /// Extraction direction of the underlying heap
    pub fn direction(&self) -> Direction {
        self.heap.direction()
    }
}

impl<T, P, F: Fn(&T) -> P, C: Compare<P>> PriorityQueue<T> for FibonacciQueue<T, P, F, C>
where
    T: Hash + Eq + Clone,
{
    fn len(&self) -> usize {
        self.heap.len()
    }

    fn enqueue(&mut self, value: T) {
        if self.handles.contains_key(&value) {
            self.update(value);
            return;
        }
        let priority = (self.priority_of)(&value);
        let handle = self.heap.enqueue(priority, value.clone());
        self.handles.insert(value, handle);
    }

    fn dequeue(&mut self) -> Result<T> {
        let (_, value) = self.heap.dequeue()?;
        self.handles.remove(&value);
        Ok(value)
    }

    fn peek(&self) -> Result<&T> {
        self.heap.top().map(|(_, value)| value)
    }

    fn update(&mut self, value: T) {
        if let Some(&handle) = self.handles.get(&value) {
            let priority = (self.priority_of)(&value);
            if self.heap.change_key(handle, priority).is_ok() {
                return;
            }
            self.handles.remove(&value);
        }
        self.enqueue(value);
    }

    fn contains(&self, value: &T) -> bool {
        self.handles.contains_key(value)
    }
}

impl<T, P, F, C> fmt::Debug for FibonacciQueue<T, P, F, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciQueue")
            .field("heap", &self.heap)
            .finish_non_exhaustive()
    }
}

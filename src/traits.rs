//! Common traits for the structures in this crate
//!
//! - [`Heap`]: the (priority, item) heap contract shared by
//!   [`BinaryHeap`](crate::binary::BinaryHeap) and
//!   [`FibonacciHeap`](crate::fibonacci::FibonacciHeap)
//! - [`PriorityQueue`]: the adapter contract graph searches hold, where the
//!   priority of an item is projected from the item itself
//! - [`DisjointSet`]: the union–find contract used by connectivity and
//!   spanning-tree algorithms

use crate::error::Result;

/// Base trait for heap data structures
///
/// Heaps store (priority, item) pairs to separate the ordering key from the
/// data. Which end of the order is extracted first is decided by the heap's
/// comparator (and, for the Fibonacci heap, its direction).
///
/// # Example
///
/// ```rust
/// use graph_heaps::Heap;
/// use graph_heaps::binary::BinaryHeap;
///
/// let mut heap = BinaryHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Ok((&1, &"one")));
/// assert_eq!(heap.pop(), Ok((1, "one")));
/// ```
pub trait Heap<T, P> {
    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    ///
    /// # Time Complexity
    /// O(log n) for the binary heap, O(1) for the Fibonacci heap.
    fn push(&mut self, priority: P, item: T);

    /// Returns the first priority and its item without removing them
    ///
    /// # Errors
    /// [`Error::EmptyCollection`](crate::Error::EmptyCollection) if the heap
    /// is empty.
    fn peek(&self) -> Result<(&P, &T)>;

    /// Removes and returns the first priority and its item
    ///
    /// # Errors
    /// [`Error::EmptyCollection`](crate::Error::EmptyCollection) if the heap
    /// is empty.
    fn pop(&mut self) -> Result<(P, T)>;
}

/// Priority queue whose priorities are computed from the items
///
/// Implementations are constructed with a projection `Fn(&T) -> P`. The
/// projection is re-evaluated on [`enqueue`](Self::enqueue) and
/// [`update`](Self::update), so callers mutate whatever the projection reads
/// (a distance table, typically) and then call `update`.
pub trait PriorityQueue<T> {
    /// Number of queued items
    fn len(&self) -> usize;

    /// Returns true if nothing is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `value` at its current priority
    fn enqueue(&mut self, value: T);

    /// Removes and returns the item with the first priority
    ///
    /// # Errors
    /// [`Error::EmptyCollection`](crate::Error::EmptyCollection) if empty.
    fn dequeue(&mut self) -> Result<T>;

    /// Returns the item with the first priority without removing it
    ///
    /// # Errors
    /// [`Error::EmptyCollection`](crate::Error::EmptyCollection) if empty.
    fn peek(&self) -> Result<&T>;

    /// Re-reads the priority of `value` and repositions it
    ///
    /// Values not currently queued are enqueued.
    fn update(&mut self, value: T);

    /// Returns true if `value` is queued and not yet dequeued
    fn contains(&self, value: &T) -> bool;
}

/// Disjoint-set (union–find) contract
pub trait DisjointSet<T> {
    /// Number of registered elements
    fn element_count(&self) -> usize;

    /// Number of distinct sets
    fn set_count(&self) -> usize;

    /// Returns true if `value` has been registered
    fn contains(&self, value: &T) -> bool;

    /// Registers `value` as a new singleton set
    ///
    /// # Errors
    /// [`Error::DuplicateElement`](crate::Error::DuplicateElement) if already
    /// registered.
    fn make_set(&mut self, value: T) -> Result<()>;

    /// Returns the representative of the set containing `value`
    ///
    /// # Errors
    /// [`Error::NotFound`](crate::Error::NotFound) if `value` is unknown.
    fn find_set(&mut self, value: &T) -> Result<&T>;

    /// Merges the sets containing `a` and `b`
    ///
    /// Returns `false` if they were already in the same set.
    ///
    /// # Errors
    /// [`Error::NotFound`](crate::Error::NotFound) if either value is unknown.
    fn union(&mut self, a: &T, b: &T) -> Result<bool>;

    /// Returns true if `a` and `b` share a representative
    ///
    /// # Errors
    /// [`Error::NotFound`](crate::Error::NotFound) if either value is unknown.
    fn are_in_same_set(&mut self, a: &T, b: &T) -> Result<bool>;
}

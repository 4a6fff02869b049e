//! Heaps and disjoint sets for graph algorithms
//!
//! This crate provides the priority queues and union–find structure that
//! shortest-path, minimum-spanning-tree and connectivity algorithms are built
//! on.
//!
//! # Structures
//!
//! - **Binary Heap**: array-backed; O(log n) push and remove-minimum, O(n)
//!   value lookup for updates
//! - **Fibonacci Heap**: O(1) amortized enqueue, O(m) merge of an m-element
//!   heap; O(log n) amortized dequeue, change-key and delete;
//!   generation-checked handles
//! - **Soft Heap**: approximate priority queue with a tunable error rate ε;
//!   at most ε·n items carry a corrupted key at any time
//! - **Priority-queue adapters**: [`queue::BinaryQueue`] and
//!   [`queue::FibonacciQueue`] compute priorities from the queued items
//! - **Disjoint-set forest**: union by rank with path compression
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::fibonacci::FibonacciHeap;
//! use graph_heaps::Heap;
//!
//! let mut heap = FibonacciHeap::new();
//! let a = heap.enqueue(5, "item1");
//! heap.enqueue(3, "item2");
//! heap.change_key(a, 1).unwrap();
//! assert_eq!(heap.peek(), Ok((&1, &"item1")));
//! ```
//!
//! # Logging
//!
//! Structural events (consolidation, cascading cuts, merges, soft-heap
//! re-softening, unions) are emitted through [`tracing`] at `trace` and
//! `debug` level. No subscriber is installed by the library.

pub mod binary;
pub mod compare;
pub mod disjoint_set;
pub mod error;
pub mod fibonacci;
pub mod queue;
pub mod rank;
pub mod soft;
pub mod traits;

pub use error::{Error, Result};
pub use traits::{DisjointSet, Heap, PriorityQueue};

//! Error type shared by every structure in the crate.
//!
//! Every failure is a caller bug surfaced synchronously: nothing here is
//! transient and no operation retries internally.

use thiserror::Error;

/// Errors returned by heap, queue and disjoint-set operations
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// A minimum was requested from a structure holding no elements
    #[error("collection is empty")]
    EmptyCollection,
    /// The value was never registered with the structure
    #[error("value not found")]
    NotFound,
    /// The value is already registered (disjoint-set `make_set`)
    #[error("value is already present")]
    DuplicateElement,
    /// The handle no longer refers to a live element of this heap
    #[error("handle is no longer valid for this heap")]
    InvalidHandle,
    /// A soft-heap key was not strictly below the configured sentinel
    #[error("key is not strictly below the configured maximum key")]
    KeyOutOfRange,
    /// Two Fibonacci heaps of opposite direction cannot be merged
    #[error("cannot merge heaps of different direction")]
    DirectionMismatch,
    /// Soft-heap error rate outside `(0, 0.5]`
    #[error("error rate {0} is outside (0, 0.5]")]
    InvalidErrorRate(f64),
    /// Positional access past the end of the backing storage
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// Requested position
        index: usize,
        /// Number of elements at the time of the call
        len: usize,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

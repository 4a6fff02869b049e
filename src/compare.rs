//! Ordering helpers shared by the heaps.
//!
//! Every structure is generic over a [`Compare`] implementation. When no
//! comparator is given the natural [`Ord`] order is used via [`NaturalOrder`];
//! closures of the form `Fn(&P, &P) -> Ordering` are accepted anywhere a
//! comparator is.
//!
//! The Fibonacci heap additionally carries a [`Direction`]: a decreasing heap
//! reverses every comparison, so min-heaps and max-heaps share one
//! implementation.

use std::cmp::Ordering;

pub use ::compare::Compare;

/// Comparator using the natural [`Ord`] order of the priority type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NaturalOrder;

impl<T: Ord> Compare<T> for NaturalOrder {
    #[inline]
    fn compare(&self, l: &T, r: &T) -> Ordering {
        l.cmp(r)
    }
}

/// Which end of the order a heap extracts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Smallest priority first (min-heap)
    #[default]
    Increasing,
    /// Largest priority first (max-heap)
    Decreasing,
}

impl Direction {
    /// Applies the direction to a comparator result
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Increasing => ordering,
            Direction::Decreasing => ordering.reverse(),
        }
    }

    /// Compares `a` and `b` with `cmp`, then orients the result
    ///
    /// `Ordering::Less` means `a` is extracted before `b`.
    #[inline]
    pub fn compare<P, C: Compare<P>>(self, cmp: &C, a: &P, b: &P) -> Ordering {
        self.apply(cmp.compare(a, b))
    }

    /// Returns true if `a` must be extracted strictly before `b`
    #[inline]
    pub fn precedes<P, C: Compare<P>>(self, cmp: &C, a: &P, b: &P) -> bool {
        self.compare(cmp, a, b) == Ordering::Less
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_reverses() {
        let cmp = NaturalOrder;
        assert!(Direction::Increasing.precedes(&cmp, &1, &2));
        assert!(!Direction::Increasing.precedes(&cmp, &2, &1));
        assert!(Direction::Decreasing.precedes(&cmp, &2, &1));
        assert!(!Direction::Decreasing.precedes(&cmp, &1, &1));
    }

    #[test]
    fn test_closure_comparator() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        assert_eq!(
            Direction::Increasing.compare(&by_len, &"ab", &"abc"),
            Ordering::Less
        );
        assert_eq!(
            Direction::Decreasing.compare(&by_len, &"ab", &"abc"),
            Ordering::Greater
        );
    }
}

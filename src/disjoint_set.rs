//! Disjoint-set forest
//!
//! Elements are registered with [`make_set`](DisjointSet::make_set) and
//! stored by ordinal; a hash index maps each value to its ordinal. Trees are
//! kept shallow with union by rank, and [`find_set`](DisjointSet::find_set)
//! re-parents every node on the walked path directly to the root, giving
//! inverse-Ackermann amortized cost.
//!
//! When two roots of equal rank are united, the root of the first argument
//! wins and its rank grows by one.

use crate::error::{Error, Result};
use crate::rank::{checked_increment, Rank};
use crate::traits::DisjointSet;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use tracing::trace;

/// Union-find over arbitrary hashable values
///
/// # Example
///
/// ```rust
/// use graph_heaps::disjoint_set::ForestDisjointSet;
/// use graph_heaps::DisjointSet;
///
/// let mut sets = ForestDisjointSet::new();
/// for v in 1..=3 {
///     sets.make_set(v).unwrap();
/// }
/// assert_eq!(sets.union(&1, &2), Ok(true));
/// assert_eq!(sets.are_in_same_set(&2, &1), Ok(true));
/// assert_eq!(sets.set_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ForestDisjointSet<T> {
    index: FxHashMap<T, usize>,
    values: Vec<T>,
    parent: Vec<usize>,
    rank: Vec<Rank>,
    sets: usize,
}

impl<T: Hash + Eq + Clone> ForestDisjointSet<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut index = FxHashMap::default();
        index.reserve(capacity);
        Self {
            index,
            values: Vec::with_capacity(capacity),
            parent: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
            sets: 0,
        }
    }

    fn ordinal(&self, value: &T) -> Result<usize> {
        self.index.get(value).copied().ok_or(Error::NotFound)
    }

    /// Root ordinal of `x`, compressing the walked path
    fn find_root(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = x;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }
}

impl<T: Hash + Eq + Clone> Default for ForestDisjointSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq + Clone> DisjointSet<T> for ForestDisjointSet<T> {
    fn element_count(&self) -> usize {
        self.values.len()
    }

    fn set_count(&self) -> usize {
        self.sets
    }

    fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    fn make_set(&mut self, value: T) -> Result<()> {
        if self.index.contains_key(&value) {
            return Err(Error::DuplicateElement);
        }
        let ordinal = self.values.len();
        self.index.insert(value.clone(), ordinal);
        self.values.push(value);
        self.parent.push(ordinal);
        self.rank.push(0);
        self.sets += 1;
        Ok(())
    }

    fn find_set(&mut self, value: &T) -> Result<&T> {
        let x = self.ordinal(value)?;
        let root = self.find_root(x);
        Ok(&self.values[root])
    }

    fn union(&mut self, a: &T, b: &T) -> Result<bool> {
        let (a, b) = (self.ordinal(a)?, self.ordinal(b)?);
        let (ra, rb) = (self.find_root(a), self.find_root(b));
        if ra == rb {
            return Ok(false);
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            Ordering::Less => self.parent[ra] = rb,
            Ordering::Greater => self.parent[rb] = ra,
            Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = checked_increment(self.rank[ra]);
            }
        }
        self.sets -= 1;
        trace!(sets = self.sets, "united disjoint sets");
        Ok(true)
    }

    fn are_in_same_set(&mut self, a: &T, b: &T) -> Result<bool> {
        let (a, b) = (self.ordinal(a)?, self.ordinal(b)?);
        Ok(self.find_root(a) == self.find_root(b))
    }
}

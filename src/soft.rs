//! Soft Heap implementation
//!
//! A soft heap (Chazelle, 2000) is an approximate priority queue. Items are
//! batched into lists owned by tree nodes; each node carries a *corruption
//! key* (`ckey`) that is at least the true key of every item in its list.
//! `delete_min` returns an item from the node with the smallest `ckey`, which
//! may not be the item with the smallest true key. In exchange, insertion is
//! O(1) and deletion O(log 1/ε) amortized.
//!
//! With error rate ε, at most ε·n items are corrupted at any time, where n is
//! the number of insertions. The rank threshold `r = 2 + 2⌈log₂(1/ε)⌉`
//! controls when nodes are re-softened (their lists concatenated).
//!
//! Nodes live in a [`SlotMap`] arena. The heap is a doubly linked list of
//! rank-ordered heads terminated by header and tail sentinels; every head
//! caches the head with the smallest `ckey` from itself to the tail.
//!
//! # Example
//!
//! ```rust
//! use graph_heaps::soft::SoftHeap;
//!
//! let mut heap = SoftHeap::new(0.01, i64::MAX).unwrap();
//! for key in [5, 1, 4, 2, 3] {
//!     heap.add(key, key * 10).unwrap();
//! }
//! assert_eq!(heap.delete_min(), Ok((1, 10)));
//! assert_eq!(heap.len(), 4);
//! ```

use crate::compare::{Compare, NaturalOrder};
use crate::error::{Error, Result};
use slotmap::{new_key_type, Key, SlotMap};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use tracing::trace;

/// Error rate used by [`SoftHeapConfig::new`]
pub const DEFAULT_ERROR_RATE: f64 = 0.1;

new_key_type! {
    struct NodeKey;
    struct HeadKey;
}

/// Construction parameters for a [`SoftHeap`]
#[derive(Debug, Clone, PartialEq)]
pub struct SoftHeapConfig<K> {
    /// Bound ε on the fraction of corrupted items, 0 < ε ≤ 0.5
    pub error_rate: f64,
    /// Sentinel strictly above every key; marks exhausted nodes
    pub key_max_value: K,
}

impl<K> SoftHeapConfig<K> {
    /// Configuration with the default error rate and the given key sentinel
    pub fn new(key_max_value: K) -> Self {
        Self {
            error_rate: DEFAULT_ERROR_RATE,
            key_max_value,
        }
    }

    /// Replaces the error rate; validated when the heap is built
    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }
}

struct Node<K, V> {
    ckey: K,
    rank: usize,
    next: NodeKey,
    child: NodeKey,
    /// Item list, stored back to front: the next item to pop is last
    items: SmallVec<[(K, V); 1]>,
}

struct Head {
    queue: NodeKey,
    next: HeadKey,
    prev: HeadKey,
    suffix_min: HeadKey,
    rank: usize,
}

impl Head {
    fn sentinel(rank: usize) -> Self {
        Self {
            queue: NodeKey::null(),
            next: HeadKey::null(),
            prev: HeadKey::null(),
            suffix_min: HeadKey::null(),
            rank,
        }
    }
}

/// Soft Heap
pub struct SoftHeap<K, V, C = NaturalOrder> {
    nodes: SlotMap<NodeKey, Node<K, V>>,
    heads: SlotMap<HeadKey, Head>,
    header: HeadKey,
    tail: HeadKey,
    error_rate: f64,
    r: usize,
    key_max_value: K,
    len: usize,
    cmp: C,
}

impl<K: Ord + Clone, V> SoftHeap<K, V> {
    /// Creates an empty soft heap with error rate `error_rate`
    ///
    /// # Errors
    /// [`Error::InvalidErrorRate`] unless 0 < `error_rate` ≤ 0.5.
    pub fn new(error_rate: f64, key_max_value: K) -> Result<Self> {
        Self::with_comparator(error_rate, key_max_value, NaturalOrder)
    }

    /// Creates an empty soft heap from `config`
    ///
    /// # Errors
    /// [`Error::InvalidErrorRate`] unless 0 < `config.error_rate` ≤ 0.5.
    pub fn from_config(config: SoftHeapConfig<K>) -> Result<Self> {
        Self::new(config.error_rate, config.key_max_value)
    }
}

impl<K: Clone, V, C: Compare<K>> SoftHeap<K, V, C> {
    /// Creates an empty soft heap ordered by `cmp`
    ///
    /// # Errors
    /// [`Error::InvalidErrorRate`] unless 0 < `error_rate` ≤ 0.5.
    pub fn with_comparator(error_rate: f64, key_max_value: K, cmp: C) -> Result<Self> {
        if !(error_rate > 0.0 && error_rate <= 0.5) {
            return Err(Error::InvalidErrorRate(error_rate));
        }
        let r = 2 + 2 * (1.0 / error_rate).log2().ceil() as usize;

        let mut heads = SlotMap::with_key();
        let header = heads.insert(Head::sentinel(0));
        let tail = heads.insert(Head::sentinel(usize::MAX));
        heads[header].next = tail;
        heads[tail].prev = header;

        Ok(Self {
            nodes: SlotMap::with_key(),
            heads,
            header,
            tail,
            error_rate,
            r,
            key_max_value,
            len: 0,
            cmp,
        })
    }

    /// Number of items in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap holds no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured error rate ε
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Rank threshold `r` above which nodes are re-softened
    pub fn min_rank(&self) -> usize {
        self.r
    }

    /// Sentinel key; every added key must compare strictly below it
    pub fn key_max_value(&self) -> &K {
        &self.key_max_value
    }

    /// Inserts `value` with `key`
    ///
    /// # Errors
    /// [`Error::KeyOutOfRange`] if `key` is not strictly below
    /// [`key_max_value`](Self::key_max_value).
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.is_exhausted(&key) {
            return Err(Error::KeyOutOfRange);
        }
        let mut items = SmallVec::new();
        let ckey = key.clone();
        items.push((key, value));
        let node = self.nodes.insert(Node {
            ckey,
            rank: 0,
            next: NodeKey::null(),
            child: NodeKey::null(),
            items,
        });
        self.meld(node);
        self.len += 1;
        Ok(())
    }

    /// Removes an item from the node with the smallest corruption key
    ///
    /// The returned key is the item's true key. It is the true minimum unless
    /// corruption got in the way.
    ///
    /// # Errors
    /// [`Error::EmptyCollection`] if the heap is empty.
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        if self.len == 0 {
            return Err(Error::EmptyCollection);
        }
        loop {
            let head = self.heads[self.heads[self.header].next].suffix_min;
            let top = self.heads[head].queue;

            if let Some(item) = self.nodes[top].items.pop() {
                self.len -= 1;
                return Ok(item);
            }

            let rank = self.nodes[top].rank;
            let mut children = 0;
            let mut current = top;
            while !self.nodes[current].next.is_null() {
                children += 1;
                current = self.nodes[current].next;
            }

            if children < rank / 2 {
                trace!(rank, children, "dissolving soft heap node");
                let prev = self.unlink_head(head);
                self.fix_minlist(prev);
                let mut current = top;
                while !current.is_null() {
                    let Some(node) = self.nodes.remove(current) else {
                        break;
                    };
                    debug_assert!(node.items.is_empty());
                    if !node.child.is_null() {
                        self.meld(node.child);
                    }
                    current = node.next;
                }
            } else {
                self.sift(top);
                if self.is_exhausted(&self.nodes[top].ckey) {
                    let prev = self.unlink_head(head);
                    self.nodes.remove(top);
                    self.fix_minlist(prev);
                } else {
                    self.fix_minlist(head);
                }
            }
        }
    }

    /// Drains the heap in approximate order
    ///
    /// Soft heaps have no non-destructive traversal.
    pub fn drain(&mut self) -> Drain<'_, K, V, C> {
        Drain { heap: self }
    }

    /// Number of items whose true key is below their node's corruption key
    ///
    /// Never exceeds ε times the number of insertions. O(n).
    pub fn corrupted_count(&self) -> usize {
        self.nodes
            .values()
            .map(|node| {
                node.items
                    .iter()
                    .filter(|(key, _)| self.cmp.compare(key, &node.ckey) == Ordering::Less)
                    .count()
            })
            .sum()
    }

    fn is_exhausted(&self, key: &K) -> bool {
        self.cmp.compare(key, &self.key_max_value) != Ordering::Less
    }

    fn ckey_greater(&self, a: NodeKey, b: NodeKey) -> bool {
        self.cmp.compare(&self.nodes[a].ckey, &self.nodes[b].ckey) == Ordering::Greater
    }

    fn head_ckey_less(&self, a: HeadKey, b: HeadKey) -> bool {
        let (a, b) = (self.heads[a].queue, self.heads[b].queue);
        self.cmp.compare(&self.nodes[a].ckey, &self.nodes[b].ckey) == Ordering::Less
    }

    /// Removes `head` from the head list, returning its predecessor
    fn unlink_head(&mut self, head: HeadKey) -> HeadKey {
        let (prev, next) = (self.heads[head].prev, self.heads[head].next);
        self.heads[prev].next = next;
        self.heads[next].prev = prev;
        self.heads.remove(head);
        prev
    }

    /// Melds the tree rooted at `node` into the head list, linking equal
    /// ranks as it goes
    fn meld(&mut self, mut node: NodeKey) {
        let rank = self.nodes[node].rank;
        let mut to_head = self.heads[self.header].next;
        while rank > self.heads[to_head].rank {
            to_head = self.heads[to_head].next;
        }
        let prev_head = self.heads[to_head].prev;

        while self.nodes[node].rank == self.heads[to_head].rank {
            let other = self.heads[to_head].queue;
            let (top, bottom) = if self.ckey_greater(other, node) {
                (node, other)
            } else {
                (other, node)
            };
            let items = std::mem::take(&mut self.nodes[top].items);
            let (ckey, top_rank) = (self.nodes[top].ckey.clone(), self.nodes[top].rank);
            node = self.nodes.insert(Node {
                ckey,
                rank: top_rank + 1,
                next: top,
                child: bottom,
                items,
            });
            to_head = self.heads[to_head].next;
        }

        let first_consumed = self.heads[prev_head].next;
        let head = if first_consumed == to_head {
            self.heads.insert(Head::sentinel(0))
        } else {
            let mut stale = self.heads[first_consumed].next;
            while stale != to_head {
                let next = self.heads[stale].next;
                self.heads.remove(stale);
                stale = next;
            }
            first_consumed
        };

        let new_rank = self.nodes[node].rank;
        {
            let h = &mut self.heads[head];
            h.queue = node;
            h.rank = new_rank;
            h.prev = prev_head;
            h.next = to_head;
        }
        self.heads[prev_head].next = head;
        self.heads[to_head].prev = head;
        self.fix_minlist(head);
    }

    /// Recomputes suffix minima from `head` back to the header
    fn fix_minlist(&mut self, mut head: HeadKey) {
        let next = self.heads[head].next;
        let mut min = if next == self.tail {
            head
        } else {
            self.heads[next].suffix_min
        };
        while head != self.header {
            if self.head_ckey_less(head, min) {
                min = head;
            }
            self.heads[head].suffix_min = min;
            head = self.heads[head].prev;
        }
    }

    /// Refills the empty item list of `node` from below
    fn sift(&mut self, node: NodeKey) {
        debug_assert!(self.nodes[node].items.is_empty());
        let (next, child) = (self.nodes[node].next, self.nodes[node].child);
        if next.is_null() && child.is_null() {
            self.nodes[node].ckey = self.key_max_value.clone();
            return;
        }

        self.sift(next);
        self.order_pair(node);
        self.take_list(node);

        let rank = self.nodes[node].rank;
        let child_rank = self.nodes[self.nodes[node].child].rank;
        if rank > self.r && (rank % 2 == 1 || child_rank + 1 < rank) {
            let next = self.nodes[node].next;
            self.sift(next);
            self.order_pair(node);
            let next = self.nodes[node].next;
            if !self.is_exhausted(&self.nodes[next].ckey) && !self.nodes[next].items.is_empty() {
                trace!(rank, "re-softening soft heap node");
                let moved = std::mem::take(&mut self.nodes[next].items);
                let ckey = self.nodes[next].ckey.clone();
                let target = &mut self.nodes[node];
                target.items.extend(moved);
                target.ckey = ckey;
            }
        }

        let (next, child) = (self.nodes[node].next, self.nodes[node].child);
        if self.is_exhausted(&self.nodes[child].ckey) {
            self.nodes.remove(child);
            if self.is_exhausted(&self.nodes[next].ckey) {
                self.nodes.remove(next);
                let target = &mut self.nodes[node];
                target.next = NodeKey::null();
                target.child = NodeKey::null();
            } else if let Some(removed) = self.nodes.remove(next) {
                let target = &mut self.nodes[node];
                target.next = removed.next;
                target.child = removed.child;
            }
        }
    }

    /// Swaps `next` and `child` of `node` so that `next` has the smaller ckey
    fn order_pair(&mut self, node: NodeKey) {
        let (next, child) = (self.nodes[node].next, self.nodes[node].child);
        if self.ckey_greater(next, child) {
            let target = &mut self.nodes[node];
            target.next = child;
            target.child = next;
        }
    }

    /// Moves the list and ckey of `node.next` up into `node`
    fn take_list(&mut self, node: NodeKey) {
        let next = self.nodes[node].next;
        let items = std::mem::take(&mut self.nodes[next].items);
        let ckey = self.nodes[next].ckey.clone();
        let target = &mut self.nodes[node];
        target.items = items;
        target.ckey = ckey;
    }
}

impl<K: fmt::Debug, V, C> fmt::Debug for SoftHeap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftHeap")
            .field("len", &self.len)
            .field("error_rate", &self.error_rate)
            .field("min_rank", &self.r)
            .field("key_max_value", &self.key_max_value)
            .finish_non_exhaustive()
    }
}

/// Draining iterator returned by [`SoftHeap::drain`]
pub struct Drain<'a, K, V, C> {
    heap: &'a mut SoftHeap<K, V, C>,
}

impl<K: Clone, V, C: Compare<K>> Iterator for Drain<'_, K, V, C> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.delete_min().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic key stream
    fn lcg_keys(n: usize, mut state: u64) -> Vec<i64> {
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                ((state >> 33) % 1_000_000) as i64
            })
            .collect()
    }

    #[test]
    fn test_error_rate_validation() {
        assert!(SoftHeap::<i64, ()>::new(0.0, i64::MAX).is_err());
        assert!(SoftHeap::<i64, ()>::new(0.6, i64::MAX).is_err());
        assert!(SoftHeap::<i64, ()>::new(-0.1, i64::MAX).is_err());
        assert!(matches!(
            SoftHeap::<i64, ()>::new(f64::NAN, i64::MAX),
            Err(Error::InvalidErrorRate(_))
        ));
        assert!(SoftHeap::<i64, ()>::new(0.5, i64::MAX).is_ok());
    }

    #[test]
    fn test_min_rank() {
        let rank = |eps| SoftHeap::<i64, ()>::new(eps, i64::MAX).unwrap().min_rank();
        assert_eq!(rank(0.5), 4);
        assert_eq!(rank(0.25), 6);
        assert_eq!(rank(0.1), 10);
        assert_eq!(rank(0.01), 16);
    }

    #[test]
    fn test_from_config() {
        let config = SoftHeapConfig::new(100u32).with_error_rate(0.25);
        let heap: SoftHeap<u32, ()> = SoftHeap::from_config(config).unwrap();
        assert_eq!(heap.error_rate(), 0.25);
        assert_eq!(heap.key_max_value(), &100);
        assert_eq!(SoftHeapConfig::new(1u8).error_rate, DEFAULT_ERROR_RATE);
    }

    #[test]
    fn test_key_out_of_range() {
        let mut heap = SoftHeap::new(0.1, 100).unwrap();
        assert_eq!(heap.add(100, "max"), Err(Error::KeyOutOfRange));
        assert_eq!(heap.add(200, "above"), Err(Error::KeyOutOfRange));
        assert!(heap.is_empty());
        assert_eq!(heap.add(99, "ok"), Ok(()));
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_empty_delete_min() {
        let mut heap: SoftHeap<i64, ()> = SoftHeap::new(0.1, i64::MAX).unwrap();
        assert_eq!(heap.delete_min(), Err(Error::EmptyCollection));
        heap.add(1, ()).unwrap();
        assert_eq!(heap.delete_min(), Ok((1, ())));
        assert_eq!(heap.delete_min(), Err(Error::EmptyCollection));
    }

    #[test]
    fn test_exact_order_below_threshold() {
        // With r = 16 no node of a 1000-item heap is ever re-softened
        let mut heap = SoftHeap::new(0.01, i64::MAX).unwrap();
        let keys = lcg_keys(1000, 42);
        for &key in &keys {
            heap.add(key, key * 2).unwrap();
        }
        assert_eq!(heap.corrupted_count(), 0);

        let drained: Vec<(i64, i64)> = heap.drain().collect();
        let mut expected = keys.clone();
        expected.sort_unstable();
        assert_eq!(drained.iter().map(|&(k, _)| k).collect::<Vec<_>>(), expected);
        assert!(drained.iter().all(|&(k, v)| v == k * 2));
        assert!(heap.is_empty());
    }

    #[test]
    fn test_corruption_bound_and_conservation() {
        let eps = 0.5;
        let n = 4096;
        let mut heap = SoftHeap::new(eps, i64::MAX).unwrap();
        let keys = lcg_keys(n, 7);
        for &key in &keys {
            heap.add(key, key).unwrap();
        }

        let bound = (eps * n as f64) as usize;
        let mut out = Vec::with_capacity(n);
        while let Ok((key, value)) = heap.delete_min() {
            assert_eq!(key, value);
            assert!(heap.corrupted_count() <= bound);
            out.push(key);
        }

        let mut expected = keys;
        expected.sort_unstable();
        out.sort_unstable();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_interleaved_operations() {
        let mut heap = SoftHeap::new(0.25, i64::MAX).unwrap();
        let keys = lcg_keys(600, 3);
        let mut removed = 0;
        for (i, &key) in keys.iter().enumerate() {
            heap.add(key, i).unwrap();
            if i % 3 == 2 {
                heap.delete_min().unwrap();
                removed += 1;
            }
        }
        assert_eq!(heap.len(), keys.len() - removed);
        assert_eq!(heap.drain().count(), keys.len() - removed);
    }

    #[test]
    fn test_duplicate_keys() {
        let mut heap = SoftHeap::new(0.01, u8::MAX).unwrap();
        for _ in 0..10 {
            heap.add(7, ()).unwrap();
        }
        heap.add(3, ()).unwrap();
        assert_eq!(heap.delete_min(), Ok((3, ())));
        assert_eq!(heap.drain().filter(|&(k, _)| k == 7).count(), 10);
    }

    #[test]
    fn test_custom_comparator() {
        // Max-first order with i32::MIN as the sentinel
        let mut heap =
            SoftHeap::with_comparator(0.01, i32::MIN, |a: &i32, b: &i32| b.cmp(a)).unwrap();
        assert_eq!(heap.add(i32::MIN, ()), Err(Error::KeyOutOfRange));
        for key in [3, 9, 1, 7] {
            heap.add(key, ()).unwrap();
        }
        let keys: Vec<i32> = heap.drain().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![9, 7, 3, 1]);
    }
}

//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized enqueue
//! - O(m) merge of a heap holding m elements
//! - O(log n) amortized dequeue, change_key and delete
//!
//! The structure is a forest of heap-ordered trees whose roots are linked in a
//! circular doubly linked list. Cells live in a [`SlotMap`] arena and link to
//! each other by key, so there are no raw pointers and no ownership cycles.
//!
//! # Handles
//!
//! [`enqueue`](FibonacciHeap::enqueue) returns a [`FibonacciHandle`]: a slot
//! key (index + generation) tagged with the id of the heap that issued it. A
//! handle whose cell has been dequeued, deleted or cleared, or that was issued
//! by another heap, is rejected with [`Error::InvalidHandle`] instead of
//! aliasing a reused slot.
//!
//! # Direction
//!
//! A heap is either [`Direction::Increasing`] (extracts the smallest priority
//! first) or [`Direction::Decreasing`] (largest first). The direction reverses
//! every comparison, so both share this implementation.

use crate::compare::{Compare, Direction, NaturalOrder};
use crate::error::{Error, Result};
use crate::rank::{checked_increment, max_degree, saturating_decrement, Rank};
use crate::traits::Heap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, Key, SlotMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use tracing::{debug, trace};

new_key_type! {
    struct CellKey;
}

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(1);

/// Handle to an element in a Fibonacci heap
///
/// Handles are plain tokens: holding one does not keep the element alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    key: CellKey,
    heap: u64,
}

/// Translation from the handles of a merged-away heap to handles in the
/// surviving heap, as returned by [`FibonacciHeap::merge`]
pub type HandleMap = FxHashMap<FibonacciHandle, FibonacciHandle>;

struct Cell<T, P> {
    priority: P,
    value: T,
    degree: Rank,
    /// Lost a child since it last became a child itself
    marked: bool,
    parent: CellKey,
    /// Any one child; null if none
    child: CellKey,
    prev: CellKey,
    next: CellKey,
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use graph_heaps::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.enqueue(10, "a");
/// heap.enqueue(5, "b");
/// let c = heap.enqueue(20, "c");
/// heap.change_key(c, 1).unwrap();
/// assert_eq!(heap.dequeue(), Ok((1, "c")));
/// assert_eq!(heap.dequeue(), Ok((5, "b")));
/// ```
pub struct FibonacciHeap<T, P, C = NaturalOrder> {
    cells: SlotMap<CellKey, Cell<T, P>>,
    /// Cached extremal root; always some root of a non-empty heap
    next: CellKey,
    /// `next` may not be extremal and must be recomputed
    dirty: bool,
    direction: Direction,
    cmp: C,
    id: u64,
    /// Degree -> root scratch table reused across consolidations
    degree_table: Vec<CellKey>,
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates an empty min-heap ordered by `P`'s natural order
    pub fn new() -> Self {
        Self::with_direction(Direction::Increasing)
    }

    /// Creates an empty heap ordered by `P`'s natural order in `direction`
    pub fn with_direction(direction: Direction) -> Self {
        Self::with_comparator(direction, NaturalOrder)
    }
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, C: Compare<P>> FibonacciHeap<T, P, C> {
    /// Creates an empty heap ordered by `cmp` in `direction`
    pub fn with_comparator(direction: Direction, cmp: C) -> Self {
        Self {
            cells: SlotMap::with_key(),
            next: CellKey::null(),
            dirty: false,
            direction,
            cmp,
            id: NEXT_HEAP_ID.fetch_add(1, AtomicOrdering::Relaxed),
            degree_table: Vec::new(),
        }
    }

    /// Number of elements in the heap
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Extraction direction fixed at construction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Inserts `value` with `priority`, returning a handle to it
    ///
    /// No restructuring happens: the cell joins the root list.
    pub fn enqueue(&mut self, priority: P, value: T) -> FibonacciHandle {
        let key = self.cells.insert(Cell {
            priority,
            value,
            degree: 0,
            marked: false,
            parent: CellKey::null(),
            child: CellKey::null(),
            prev: CellKey::null(),
            next: CellKey::null(),
        });
        self.add_root(key);
        if key != self.next && self.precedes(key, self.next) {
            self.next = key;
        }
        FibonacciHandle { key, heap: self.id }
    }

    /// Returns the extremal (priority, value) without removing it
    pub fn top(&self) -> Result<(&P, &T)> {
        self.cells
            .get(self.next)
            .map(|cell| (&cell.priority, &cell.value))
            .ok_or(Error::EmptyCollection)
    }

    /// Removes and returns the extremal (priority, value)
    pub fn dequeue(&mut self) -> Result<(P, T)> {
        let top = self.next;
        if top.is_null() {
            return Err(Error::EmptyCollection);
        }

        // Promote children to roots
        let first_child = self.cells[top].child;
        if !first_child.is_null() {
            let mut current = first_child;
            loop {
                let cell = &mut self.cells[current];
                cell.parent = CellKey::null();
                cell.marked = false;
                current = cell.next;
                if current == first_child {
                    break;
                }
            }
            self.splice(top, first_child);
            self.cells[top].child = CellKey::null();
        }

        let right = self.cells[top].next;
        if right == top {
            self.next = CellKey::null();
        } else {
            self.unlink(top);
            self.next = right;
            self.dirty = true;
        }

        let cell = self.cells.remove(top).ok_or(Error::InvalidHandle)?;
        self.refresh_next();
        Ok((cell.priority, cell.value))
    }

    /// Moves the element behind `handle` to `priority`
    ///
    /// Moving toward the extraction end cuts the cell from its parent when it
    /// now violates heap order, cascading through marked ancestors. Moving
    /// away cuts every child that now precedes it and marks the cell.
    pub fn change_key(&mut self, handle: FibonacciHandle, priority: P) -> Result<()> {
        let key = self.resolve(handle)?;
        let ordering = self
            .direction
            .compare(&self.cmp, &priority, &self.cells[key].priority);
        self.cells[key].priority = priority;

        match ordering {
            std::cmp::Ordering::Less => {
                let parent = self.cells[key].parent;
                if !parent.is_null() && self.precedes(key, parent) {
                    self.cut(key);
                    self.cascading_cut(parent);
                }
                if key != self.next && self.cells[key].parent.is_null() && self.precedes(key, self.next)
                {
                    self.next = key;
                }
            }
            std::cmp::Ordering::Greater => {
                let violating: Vec<CellKey> = self
                    .children(key)
                    .into_iter()
                    .filter(|&child| self.precedes(child, key))
                    .collect();
                for &child in &violating {
                    self.cut(child);
                }
                let parent = self.cells[key].parent;
                if !violating.is_empty() && !parent.is_null() {
                    if self.cells[key].marked {
                        self.cut(key);
                        self.cascading_cut(parent);
                    } else {
                        self.cells[key].marked = true;
                    }
                }
                if key == self.next {
                    self.dirty = true;
                    self.refresh_next();
                }
            }
            std::cmp::Ordering::Equal => {}
        }
        Ok(())
    }

    /// Removes the element behind `handle`, returning its (priority, value)
    pub fn delete(&mut self, handle: FibonacciHandle) -> Result<(P, T)> {
        let key = self.resolve(handle)?;
        let parent = self.cells[key].parent;
        if !parent.is_null() {
            self.cut(key);
            self.cascading_cut(parent);
        }
        // Force the cell to the front, as if its key were the sentinel extreme
        if key != self.next {
            self.next = key;
            self.dirty = true;
        }
        self.dequeue()
    }

    /// Moves every element of `other` into this heap
    ///
    /// Runs in O(m) for an `other` of m elements. Each cell is re-inserted
    /// into this heap's arena and gets a new handle, recorded in the returned
    /// map; only the final root-list splice is constant time.
    ///
    /// # Errors
    /// [`Error::DirectionMismatch`] if the heaps extract in opposite
    /// directions; `other` is dropped unchanged in that case.
    pub fn merge(&mut self, other: Self) -> Result<HandleMap> {
        if self.direction != other.direction {
            return Err(Error::DirectionMismatch);
        }

        let FibonacciHeap {
            cells: other_cells,
            next: other_next,
            id: other_id,
            ..
        } = other;

        let mut translation: FxHashMap<CellKey, CellKey> = FxHashMap::default();
        translation.reserve(other_cells.len());
        for (old_key, cell) in other_cells {
            translation.insert(old_key, self.cells.insert(cell));
        }
        let remap = |key: CellKey| {
            if key.is_null() {
                key
            } else {
                translation[&key]
            }
        };
        for &new_key in translation.values() {
            let cell = &mut self.cells[new_key];
            cell.parent = remap(cell.parent);
            cell.child = remap(cell.child);
            cell.prev = remap(cell.prev);
            cell.next = remap(cell.next);
        }

        if !other_next.is_null() {
            let incoming = remap(other_next);
            if self.next.is_null() {
                self.next = incoming;
            } else {
                self.splice(self.next, incoming);
                if self.precedes(incoming, self.next) {
                    self.next = incoming;
                }
            }
        }
        debug!(moved = translation.len(), total = self.len(), "merged fibonacci heaps");

        Ok(translation
            .into_iter()
            .map(|(old, new)| {
                (
                    FibonacciHandle {
                        key: old,
                        heap: other_id,
                    },
                    FibonacciHandle {
                        key: new,
                        heap: self.id,
                    },
                )
            })
            .collect())
    }

    /// Returns true if `handle` refers to a live element of this heap
    pub fn contains(&self, handle: FibonacciHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Current priority of the element behind `handle`
    pub fn priority(&self, handle: FibonacciHandle) -> Result<&P> {
        let key = self.resolve(handle)?;
        Ok(&self.cells[key].priority)
    }

    /// Value of the element behind `handle`
    pub fn value(&self, handle: FibonacciHandle) -> Result<&T> {
        let key = self.resolve(handle)?;
        Ok(&self.cells[key].value)
    }

    /// Removes every element; all outstanding handles become invalid
    pub fn clear(&mut self) {
        self.cells.clear();
        self.next = CellKey::null();
        self.dirty = false;
    }

    /// Drains the heap in extraction order
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, T, P, C> {
        DrainSorted { heap: self }
    }

    /// Checks every structural invariant
    ///
    /// Heap order, parent/child links, degrees, sibling symmetry, the cached
    /// extremum and that every cell is reachable from the root list.
    /// Intended for tests; O(n).
    pub fn is_consistent(&self) -> bool {
        if self.next.is_null() {
            return self.cells.is_empty();
        }
        if self.dirty || !self.cells[self.next].parent.is_null() {
            return false;
        }
        let roots = self.siblings(self.next);
        if roots.iter().any(|&r| self.precedes(r, self.next)) {
            return false;
        }

        let mut reached = 0;
        let mut stack: Vec<CellKey> = roots;
        while let Some(key) = stack.pop() {
            reached += 1;
            let cell = &self.cells[key];
            if self.cells[cell.next].prev != key || self.cells[cell.prev].next != key {
                return false;
            }
            let children = self.children(key);
            if children.len() != cell.degree as usize {
                return false;
            }
            for &child in &children {
                if self.cells[child].parent != key || self.precedes(child, key) {
                    return false;
                }
            }
            stack.extend(children);
        }
        reached == self.cells.len()
    }

    fn resolve(&self, handle: FibonacciHandle) -> Result<CellKey> {
        if handle.heap == self.id && self.cells.contains_key(handle.key) {
            Ok(handle.key)
        } else {
            Err(Error::InvalidHandle)
        }
    }

    /// True if `a` is extracted strictly before `b`
    fn precedes(&self, a: CellKey, b: CellKey) -> bool {
        self.direction
            .precedes(&self.cmp, &self.cells[a].priority, &self.cells[b].priority)
    }

    /// All keys in the circular list containing `start`
    fn siblings(&self, start: CellKey) -> Vec<CellKey> {
        let mut keys = Vec::new();
        let mut current = start;
        loop {
            keys.push(current);
            current = self.cells[current].next;
            if current == start {
                break;
            }
        }
        keys
    }

    fn children(&self, key: CellKey) -> Vec<CellKey> {
        let child = self.cells[key].child;
        if child.is_null() {
            Vec::new()
        } else {
            self.siblings(child)
        }
    }

    /// Joins the circular lists containing `a` and `b`
    fn splice(&mut self, a: CellKey, b: CellKey) {
        let a_next = self.cells[a].next;
        let b_prev = self.cells[b].prev;
        self.cells[a].next = b;
        self.cells[b].prev = a;
        self.cells[b_prev].next = a_next;
        self.cells[a_next].prev = b_prev;
    }

    /// Removes `key` from its sibling list, leaving it a singleton list
    fn unlink(&mut self, key: CellKey) {
        let (prev, next) = (self.cells[key].prev, self.cells[key].next);
        self.cells[prev].next = next;
        self.cells[next].prev = prev;
        let cell = &mut self.cells[key];
        cell.prev = key;
        cell.next = key;
    }

    /// Adds a detached cell to the root list
    fn add_root(&mut self, key: CellKey) {
        let cell = &mut self.cells[key];
        cell.parent = CellKey::null();
        cell.marked = false;
        cell.prev = key;
        cell.next = key;
        if self.next.is_null() {
            self.next = key;
        } else {
            self.splice(self.next, key);
        }
    }

    /// Makes root `child` a child of root `parent`
    fn link(&mut self, child: CellKey, parent: CellKey) {
        self.unlink(child);
        let first = self.cells[parent].child;
        {
            let cell = &mut self.cells[child];
            cell.parent = parent;
            cell.marked = false;
        }
        if first.is_null() {
            self.cells[parent].child = child;
        } else {
            self.splice(first, child);
        }
        let cell = &mut self.cells[parent];
        cell.degree = checked_increment(cell.degree);
    }

    /// Detaches `key` from its parent and moves it to the root list
    fn cut(&mut self, key: CellKey) {
        let parent = self.cells[key].parent;
        let sibling = self.cells[key].next;
        if self.cells[parent].child == key {
            self.cells[parent].child = if sibling == key {
                CellKey::null()
            } else {
                sibling
            };
        }
        self.unlink(key);
        let cell = &mut self.cells[parent];
        cell.degree = saturating_decrement(cell.degree);
        self.add_root(key);
    }

    /// Walks up from a cell that just lost a child, cutting marked ancestors
    fn cascading_cut(&mut self, mut key: CellKey) {
        let mut cuts = 0usize;
        loop {
            let parent = self.cells[key].parent;
            if parent.is_null() {
                break;
            }
            if !self.cells[key].marked {
                self.cells[key].marked = true;
                break;
            }
            self.cut(key);
            cuts += 1;
            key = parent;
        }
        if cuts > 0 {
            trace!(cuts, "cascading cut");
        }
    }

    fn refresh_next(&mut self) {
        if self.dirty {
            self.consolidate();
            self.dirty = false;
        }
    }

    /// Links equal-degree roots until every root degree is unique, then scans
    /// the remaining roots for the new extremum
    fn consolidate(&mut self) {
        if self.next.is_null() {
            return;
        }
        let roots = self.siblings(self.next);
        let roots_before = roots.len();

        let mut table = std::mem::take(&mut self.degree_table);
        table.clear();
        table.resize(max_degree(self.cells.len()) + 1, CellKey::null());

        for root in roots {
            let mut x = root;
            let mut degree = self.cells[x].degree as usize;
            loop {
                if degree >= table.len() {
                    table.resize(degree + 1, CellKey::null());
                }
                let y = std::mem::replace(&mut table[degree], CellKey::null());
                if y.is_null() {
                    break;
                }
                if self.precedes(y, x) {
                    self.link(x, y);
                    x = y;
                } else {
                    self.link(y, x);
                }
                degree += 1;
            }
            table[degree] = x;
        }

        let mut best = CellKey::null();
        let mut roots_after = 0usize;
        for &root in table.iter().filter(|k| !k.is_null()) {
            roots_after += 1;
            if best.is_null() || self.precedes(root, best) {
                best = root;
            }
        }
        self.next = best;
        self.degree_table = table;
        trace!(roots_before, roots_after, "consolidated root list");
    }
}

impl<T: Clone, P: Clone, C: Compare<P> + Clone> FibonacciHeap<T, P, C> {
    /// Iterates (priority, value) pairs in extraction order without
    /// modifying the heap
    ///
    /// The logical content is copied into a temporary heap through a
    /// depth-first walk of every tree, which is then dequeued: O(n log n).
    pub fn iter_sorted(&self) -> IntoIter<T, P, C> {
        let mut snapshot = FibonacciHeap::with_comparator(self.direction, self.cmp.clone());
        if !self.next.is_null() {
            let mut stack = self.siblings(self.next);
            while let Some(key) = stack.pop() {
                let cell = &self.cells[key];
                snapshot.enqueue(cell.priority.clone(), cell.value.clone());
                stack.extend(self.children(key));
            }
        }
        IntoIter { heap: snapshot }
    }
}

impl<T, P, C: Compare<P>> Heap<T, P> for FibonacciHeap<T, P, C> {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn push(&mut self, priority: P, item: T) {
        self.enqueue(priority, item);
    }

    fn peek(&self) -> Result<(&P, &T)> {
        self.top()
    }

    fn pop(&mut self) -> Result<(P, T)> {
        self.dequeue()
    }
}

impl<T, P, C> fmt::Debug for FibonacciHeap<T, P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.cells.len())
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

/// Owning iterator yielding elements in extraction order
pub struct IntoIter<T, P, C> {
    heap: FibonacciHeap<T, P, C>,
}

impl<T, P, C: Compare<P>> Iterator for IntoIter<T, P, C> {
    type Item = (P, T);

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.dequeue().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T, P, C: Compare<P>> ExactSizeIterator for IntoIter<T, P, C> {}

impl<T, P, C: Compare<P>> IntoIterator for FibonacciHeap<T, P, C> {
    type Item = (P, T);
    type IntoIter = IntoIter<T, P, C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { heap: self }
    }
}

/// Draining iterator returned by [`FibonacciHeap::drain_sorted`]
pub struct DrainSorted<'a, T, P, C> {
    heap: &'a mut FibonacciHeap<T, P, C>,
}

impl<T, P, C: Compare<P>> Iterator for DrainSorted<'_, T, P, C> {
    type Item = (P, T);

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.dequeue().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) insert, O(1) amortized decrease_key
//! - O(log n) amortized extract_minimum and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list and the heap keeps a pointer to the minimum
//! root. Work is deferred: insert just adds a root, and extract_minimum pays for
//! the accumulated roots by consolidating them into trees of distinct degree.
//! decrease_key cuts a violating node to the root list and uses node marks to
//! cascade the cut upwards, which keeps every tree of degree `d` at least
//! `F(d + 2)` nodes large.
//!
//! Nodes are stored in a generational arena and linked by key, so handles are
//! plain `(heap, key)` pairs. A handle whose node has been removed, or that was
//! issued by another heap, is rejected with [`HeapError::StaleHandle`].

use crate::arena::{Node, NodeArena, NodeKey};
use crate::error::{HeapError, InvariantError};
use crate::ring;
use crate::stats::HeapStats;
use crate::traits::{DecreaseKeyHeap, Handle, Heap};
use log::{debug, trace};
use slotmap::SecondaryMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(1);

/// Golden ratio; the maximum root degree is bounded by `log_phi(n)`.
const PHI: f64 = 1.618_033_988_749_895;

/// Handle to an element in a Fibonacci heap
///
/// Handles stay valid until their element is extracted or deleted. After that
/// every operation taking the handle returns [`HeapError::StaleHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    heap: u64,
    node: NodeKey,
}

impl Handle for FibonacciHandle {}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.insert(5, "item");
/// heap.insert(3, "other");
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.minimum(), Ok((&1, &"item")));
/// assert_eq!(heap.extract_minimum(), Ok((1, "item")));
/// ```
pub struct FibonacciHeap<T, P: Ord> {
    nodes: NodeArena<T, P>,
    min: Option<NodeKey>,
    len: usize,
    id: u64,
    stats: HeapStats,
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self::from_arena(NodeArena::new())
    }

    /// Creates an empty heap with room for `capacity` elements before reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_arena(NodeArena::with_capacity(capacity))
    }

    fn from_arena(nodes: NodeArena<T, P>) -> Self {
        Self {
            nodes,
            min: None,
            len: 0,
            id: NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed),
            stats: HeapStats::default(),
        }
    }

    /// Returns the number of elements in the heap
    pub fn size(&self) -> usize {
        self.len
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Inserts an element with the given priority, returning a handle to it
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, priority: P, item: T) -> FibonacciHandle {
        let node = self.nodes.alloc(priority, item);
        self.add_root(node);
        self.len += 1;

        FibonacciHandle {
            heap: self.id,
            node,
        }
    }

    /// Returns the minimum priority and its item without removing it
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no elements.
    pub fn minimum(&self) -> Result<(&P, &T), HeapError> {
        self.peek().ok_or(HeapError::EmptyHeap)
    }

    /// Returns the minimum priority and its item, if any
    pub fn peek(&self) -> Option<(&P, &T)> {
        self.min.map(|min| {
            let node = &self.nodes[min];
            (&node.priority, &node.item)
        })
    }

    /// Returns the current priority and item behind a handle
    ///
    /// # Errors
    /// Returns `HeapError::StaleHandle` if the element was removed.
    pub fn get(&self, handle: &FibonacciHandle) -> Result<(&P, &T), HeapError> {
        let key = self.resolve(handle)?;
        self.nodes
            .get(key)
            .map(|node| (&node.priority, &node.item))
            .ok_or(HeapError::StaleHandle)
    }

    /// Returns true if the handle still refers to an element of this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        handle.heap == self.id && self.nodes.contains(handle.node)
    }

    /// Removes and returns the minimum priority and its item
    ///
    /// The children of the minimum are promoted to roots, then the root list is
    /// consolidated so that no two roots share a degree.
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if there are no elements. The heap is left
    /// untouched in that case.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_minimum(&mut self) -> Result<(P, T), HeapError> {
        let min = self.min.ok_or(HeapError::EmptyHeap)?;

        if let Some(child) = self.nodes[min].child.take() {
            for promoted in ring::members(&self.nodes, child) {
                let node = &mut self.nodes[promoted];
                node.parent = None;
                node.marked = false;
                ring::insert_before(&mut self.nodes, min, promoted);
            }
            self.nodes[min].degree = 0;
        }

        let next = self.nodes[min].right;
        if ring::remove(&mut self.nodes, min) {
            self.min = None;
        } else {
            self.min = Some(next);
            self.consolidate(next);
        }

        self.len -= 1;
        let Node { priority, item, .. } = self.nodes.take(min);
        Ok((priority, item))
    }

    /// Removes and returns the minimum priority and its item, if any
    pub fn pop(&mut self) -> Option<(P, T)> {
        self.extract_minimum().ok()
    }

    /// Lowers the priority of the element behind `handle`
    ///
    /// An equal priority is accepted and leaves the heap unchanged.
    ///
    /// # Errors
    /// - `HeapError::InvalidDecrease` if `new_priority` is greater than the
    ///   current priority. The element keeps its old priority.
    /// - `HeapError::StaleHandle` if the element was removed.
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(
        &mut self,
        handle: &FibonacciHandle,
        new_priority: P,
    ) -> Result<(), HeapError> {
        let key = self.resolve(handle)?;

        if new_priority > self.nodes[key].priority {
            debug!("rejected decrease_key that would raise {:?}", handle);
            return Err(HeapError::InvalidDecrease);
        }
        self.nodes[key].priority = new_priority;

        match self.nodes[key].parent {
            Some(parent) => {
                if self.nodes[key].priority < self.nodes[parent].priority {
                    self.cut(key, parent);
                    let cuts = 1 + self.cascading_cut(parent);
                    self.stats.finish_op(cuts);
                }
            }
            None => {
                if let Some(min) = self.min {
                    if self.nodes[key].priority < self.nodes[min].priority {
                        self.min = Some(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Removes the element behind `handle` and returns it
    ///
    /// The node is cut to the root list and forced to be the minimum, then
    /// removed through the extract_minimum path. No sentinel priority is needed.
    ///
    /// # Errors
    /// Returns `HeapError::StaleHandle` if the element was already removed.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<(P, T), HeapError> {
        let key = self.resolve(handle)?;

        if let Some(parent) = self.nodes[key].parent {
            self.cut(key, parent);
            let cuts = 1 + self.cascading_cut(parent);
            self.stats.finish_op(cuts);
        }

        self.min = Some(key);
        self.extract_minimum()
    }

    /// Moves every element of `other` into this heap
    ///
    /// Handles issued by `other` are stale afterwards; handles issued by this
    /// heap stay valid. The restructuring counters of `other` are added to
    /// this heap's [`stats`](Self::stats).
    ///
    /// # Time Complexity
    /// O(m) where m is the size of `other`, since its nodes are re-keyed into
    /// this heap's arena.
    pub fn merge(&mut self, mut other: Self) {
        self.stats.absorb(other.stats);
        let Some(other_min) = other.min.take() else {
            return;
        };

        let mut remap: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::with_capacity(other.len);
        let mut moved = Vec::with_capacity(other.len);
        for (old, node) in other.nodes.drain() {
            let new = self.nodes.insert_with_key(|_| node);
            remap.insert(old, new);
            moved.push(new);
        }

        for &key in &moved {
            let node = &mut self.nodes[key];
            node.left = remap[node.left];
            node.right = remap[node.right];
            node.parent = node.parent.map(|parent| remap[parent]);
            node.child = node.child.map(|child| remap[child]);
        }

        let other_min = remap[other_min];
        match self.min {
            None => self.min = Some(other_min),
            Some(min) => {
                ring::splice(&mut self.nodes, min, other_min);
                if self.nodes[other_min].priority < self.nodes[min].priority {
                    self.min = Some(other_min);
                }
            }
        }

        self.len += other.len;
        other.len = 0;
    }

    /// Removes every element. All outstanding handles become stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
        self.len = 0;
        self.id = NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the restructuring counters accumulated so far
    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// Resets the restructuring counters to zero
    pub fn reset_stats(&mut self) {
        self.stats = HeapStats::default();
    }

    fn resolve(&self, handle: &FibonacciHandle) -> Result<NodeKey, HeapError> {
        if self.contains(handle) {
            Ok(handle.node)
        } else {
            debug!("rejected stale handle {:?}", handle);
            Err(HeapError::StaleHandle)
        }
    }

    /// Splices `node` into the root list next to the minimum, updating the
    /// minimum if `node` is smaller. `node`'s old sibling links are discarded.
    fn add_root(&mut self, node: NodeKey) {
        match self.min {
            None => {
                ring::make_circular(&mut self.nodes, node);
                self.min = Some(node);
            }
            Some(min) => {
                ring::insert_before(&mut self.nodes, min, node);
                if self.nodes[node].priority < self.nodes[min].priority {
                    self.min = Some(node);
                }
            }
        }
    }

    /// Links roots of equal degree until every root degree is distinct, then
    /// rebuilds the root list and finds the new minimum.
    fn consolidate(&mut self, start: NodeKey) {
        let roots = ring::members(&self.nodes, start);
        let mut by_degree: Vec<Option<NodeKey>> = vec![None; degree_bound(self.len)];
        trace!("consolidating {} roots", roots.len());

        for root in roots {
            let mut x = root;
            let mut degree = self.nodes[x].degree;

            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                let Some(mut y) = by_degree[degree].take() else {
                    break;
                };
                if self.nodes[y].priority < self.nodes[x].priority {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                degree += 1;
            }

            by_degree[degree] = Some(x);
        }

        self.min = None;
        let mut remaining = 0;
        for root in by_degree.into_iter().flatten() {
            self.add_root(root);
            remaining += 1;
        }
        trace!("consolidation left {} roots", remaining);

        self.stats.consolidations += 1;
    }

    /// Makes root `child` a child of root `parent`.
    fn link(&mut self, child: NodeKey, parent: NodeKey) {
        ring::remove(&mut self.nodes, child);

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.marked = false;

        match self.nodes[parent].child {
            Some(first) => ring::insert_before(&mut self.nodes, first, child),
            None => self.nodes[parent].child = Some(child),
        }
        self.nodes[parent].degree += 1;

        self.stats.links += 1;
    }

    /// Detaches `node` from `parent` and adds it to the root list unmarked.
    fn cut(&mut self, node: NodeKey, parent: NodeKey) {
        let next = self.nodes[node].right;
        let was_only_child = ring::remove(&mut self.nodes, node);

        let p = &mut self.nodes[parent];
        if was_only_child {
            p.child = None;
        } else if p.child == Some(node) {
            p.child = Some(next);
        }
        p.degree -= 1;

        let n = &mut self.nodes[node];
        n.parent = None;
        n.marked = false;
        self.add_root(node);

        self.stats.cuts += 1;
    }

    /// Walks up from `node`, which just lost a child. The first unmarked
    /// non-root gets marked; marked ones are cut and the walk continues.
    ///
    /// Returns the number of cuts performed.
    fn cascading_cut(&mut self, node: NodeKey) -> u64 {
        let mut cuts = 0;
        let mut current = node;

        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[current].marked {
                self.nodes[current].marked = true;
                break;
            }
            self.cut(current, parent);
            self.stats.cascading_cuts += 1;
            cuts += 1;
            current = parent;
        }

        if cuts > 0 {
            trace!("cascading cut promoted {} ancestors", cuts);
        }
        cuts
    }

    /// Checks every structural invariant of the heap
    ///
    /// Verifies ring linkage, parent links, heap order, degrees, marks on
    /// roots, the minimum pointer, the `F(d + 2)` subtree size bound and the
    /// element count. Intended for tests and debugging; runs in O(n).
    ///
    /// # Errors
    /// Returns an [`InvariantError`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let Some(min) = self.min else {
            if self.len != 0 || self.nodes.len() != 0 {
                return Err(InvariantError::new(format!(
                    "no minimum but len is {} and arena holds {} nodes",
                    self.len,
                    self.nodes.len()
                )));
            }
            return Ok(());
        };

        if !self.nodes.contains(min) {
            return Err(InvariantError::new("minimum is not a live node"));
        }

        let roots = ring::members(&self.nodes, min);
        self.check_ring(&roots)?;

        let mut total = 0;
        for &root in &roots {
            let node = &self.nodes[root];
            if node.parent.is_some() {
                return Err(InvariantError::new("root list member has a parent"));
            }
            if node.marked {
                return Err(InvariantError::new("root is marked"));
            }
            if node.priority < self.nodes[min].priority {
                return Err(InvariantError::new("a root is smaller than the minimum"));
            }
            total += self.check_tree(root)?;
        }

        if total != self.len {
            return Err(InvariantError::new(format!(
                "reachable nodes {} differ from len {}",
                total, self.len
            )));
        }
        if self.nodes.len() != self.len {
            return Err(InvariantError::new(format!(
                "arena holds {} nodes but len is {}",
                self.nodes.len(),
                self.len
            )));
        }
        Ok(())
    }

    fn check_ring(&self, members: &[NodeKey]) -> Result<(), InvariantError> {
        for &key in members {
            let node = &self.nodes[key];
            if self.nodes[node.right].left != key || self.nodes[node.left].right != key {
                return Err(InvariantError::new("sibling ring links are inconsistent"));
            }
        }
        Ok(())
    }

    /// Validates the tree under `root` and returns its size.
    fn check_tree(&self, root: NodeKey) -> Result<usize, InvariantError> {
        // Pre-order list, then sizes computed bottom-up in reverse.
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            order.push(key);
            let node = &self.nodes[key];

            let Some(child) = node.child else {
                if node.degree != 0 {
                    return Err(InvariantError::new("childless node has nonzero degree"));
                }
                continue;
            };

            let children = ring::members(&self.nodes, child);
            self.check_ring(&children)?;
            if children.len() != node.degree {
                return Err(InvariantError::new(format!(
                    "degree {} but {} children",
                    node.degree,
                    children.len()
                )));
            }
            for &c in &children {
                let child_node = &self.nodes[c];
                if child_node.parent != Some(key) {
                    return Err(InvariantError::new("child does not point back to its parent"));
                }
                if child_node.priority < node.priority {
                    return Err(InvariantError::new("heap order violated"));
                }
                stack.push(c);
            }
        }

        let mut sizes: SecondaryMap<NodeKey, usize> = SecondaryMap::with_capacity(order.len());
        for &key in order.iter().rev() {
            let node = &self.nodes[key];
            let size = 1 + node.child.map_or(0, |child| {
                ring::members(&self.nodes, child)
                    .iter()
                    .map(|c| sizes.get(*c).copied().unwrap_or(0))
                    .sum()
            });
            if size < fibonacci(node.degree + 2) {
                return Err(InvariantError::new(format!(
                    "subtree of degree {} has only {} nodes",
                    node.degree, size
                )));
            }
            sizes.insert(key, size);
        }

        Ok(sizes.get(root).copied().unwrap_or(0))
    }
}

/// Initial size of the consolidation table: the largest possible root degree
/// plus slack. The table still grows if a larger degree shows up.
fn degree_bound(len: usize) -> usize {
    let n = len.max(1) as f64;
    (n.ln() / PHI.ln()) as usize + 2
}

/// `F(k)` with `F(1) = F(2) = 1`, saturating.
fn fibonacci(k: usize) -> usize {
    let (mut a, mut b) = (0usize, 1usize);
    for _ in 0..k {
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    a
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.peek().map(|(priority, _)| priority))
            .finish()
    }
}

impl<T, P: Ord> Extend<(P, T)> for FibonacciHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.insert(priority, item);
        }
    }
}

impl<T, P: Ord> FromIterator<(P, T)> for FibonacciHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord> Heap<T, P> for FibonacciHeap<T, P> {
    fn new() -> Self {
        Self::from_arena(NodeArena::new())
    }

    fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn push(&mut self, priority: P, item: T) {
        self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        FibonacciHeap::peek(self)
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.extract_minimum().ok()
    }

    fn merge(&mut self, other: Self) {
        FibonacciHeap::merge(self, other)
    }
}

impl<T, P: Ord> DecreaseKeyHeap<T, P> for FibonacciHeap<T, P> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_priority)
    }

    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError> {
        FibonacciHeap::delete(self, handle)
    }
}

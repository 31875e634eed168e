//! Arena storage for heap nodes
//!
//! Nodes live in a [`SlotMap`] and refer to each other by [`NodeKey`]. Keys are
//! generational: once a node is removed its key never resolves again, even if
//! the slot is reused, which is what lets the heap reject stale handles instead
//! of touching a recycled node.
//!
//! The arena is the only owner of node data. Parent, child and sibling links
//! are plain keys, so the ring structure has no ownership cycles.

use crate::ring::RingLinks;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};

new_key_type! {
    /// Arena key identifying a node
    pub struct NodeKey;
}

/// A node of a heap-ordered tree.
#[derive(Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) priority: P,
    pub(crate) item: T,
    /// `None` for roots.
    pub(crate) parent: Option<NodeKey>,
    /// Any one child; the others are reached through its sibling ring.
    pub(crate) child: Option<NodeKey>,
    pub(crate) left: NodeKey,
    pub(crate) right: NodeKey,
    pub(crate) degree: usize,
    /// Lost a child since it last became a non-root. Always false on roots.
    pub(crate) marked: bool,
}

/// Slot arena owning every node of one heap.
#[derive(Debug)]
pub(crate) struct NodeArena<T, P> {
    nodes: SlotMap<NodeKey, Node<T, P>>,
}

impl<T, P> NodeArena<T, P> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Allocates a detached singleton node.
    pub(crate) fn alloc(&mut self, priority: P, item: T) -> NodeKey {
        self.nodes.insert_with_key(|key| Node {
            priority,
            item,
            parent: None,
            child: None,
            left: key,
            right: key,
            degree: 0,
            marked: false,
        })
    }

    /// Frees a node and returns its contents.
    ///
    /// Its links must already be detached from every live node.
    ///
    /// # Panics
    /// Panics if `key` is not live, the same as indexing.
    pub(crate) fn take(&mut self, key: NodeKey) -> Node<T, P> {
        match self.nodes.remove(key) {
            Some(node) => node,
            None => panic!("node {:?} is not in the arena", key),
        }
    }

    pub(crate) fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub(crate) fn get(&self, key: NodeKey) -> Option<&Node<T, P>> {
        self.nodes.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Removes every node, yielding them with their old keys.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (NodeKey, Node<T, P>)> + '_ {
        self.nodes.drain()
    }

    /// Inserts a node produced by `f`, which receives the node's new key.
    pub(crate) fn insert_with_key<F>(&mut self, f: F) -> NodeKey
    where
        F: FnOnce(NodeKey) -> Node<T, P>,
    {
        self.nodes.insert_with_key(f)
    }
}

impl<T, P> Index<NodeKey> for NodeArena<T, P> {
    type Output = Node<T, P>;

    #[inline]
    fn index(&self, key: NodeKey) -> &Node<T, P> {
        &self.nodes[key]
    }
}

impl<T, P> IndexMut<NodeKey> for NodeArena<T, P> {
    #[inline]
    fn index_mut(&mut self, key: NodeKey) -> &mut Node<T, P> {
        &mut self.nodes[key]
    }
}

impl<T, P> RingLinks for NodeArena<T, P> {
    type Key = NodeKey;

    #[inline]
    fn left(&self, node: NodeKey) -> NodeKey {
        self.nodes[node].left
    }

    #[inline]
    fn right(&self, node: NodeKey) -> NodeKey {
        self.nodes[node].right
    }

    #[inline]
    fn set_left(&mut self, node: NodeKey, left: NodeKey) {
        self.nodes[node].left = left;
    }

    #[inline]
    fn set_right(&mut self, node: NodeKey, right: NodeKey) {
        self.nodes[node].right = right;
    }
}

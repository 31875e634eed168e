//! Index-based circular doubly-linked rings.
//!
//! Both the root list and every child list of the heap are circular rings of
//! sibling nodes. Links are stored as arena keys rather than pointers, so the
//! operations here are generic over anything that can read and write a node's
//! `left` / `right` neighbours.
//!
//! # Circular rings
//!
//! - A single node points to itself (both `left` and `right`)
//! - There is no head or tail, any node can be the entry point
//! - Joining two rings is O(1)
//! - Traversal wraps around, so it must track its starting point

use smallvec::SmallVec;

/// Snapshot of a ring's members, taken before the ring is restructured.
pub(crate) type Members<K> = SmallVec<[K; 16]>;

/// Access to the sibling links of nodes addressed by `Key`.
///
/// Implementations may panic on a key that is not present; every key handed
/// to these operations is expected to be live.
pub(crate) trait RingLinks {
    type Key: Copy + Eq;

    fn left(&self, node: Self::Key) -> Self::Key;
    fn right(&self, node: Self::Key) -> Self::Key;
    fn set_left(&mut self, node: Self::Key, left: Self::Key);
    fn set_right(&mut self, node: Self::Key, right: Self::Key);
}

/// Makes `node` a ring of one element.
#[inline]
pub(crate) fn make_circular<R: RingLinks>(ring: &mut R, node: R::Key) {
    ring.set_left(node, node);
    ring.set_right(node, node);
}

/// Returns true if `node` is the only member of its ring.
#[cfg(test)]
pub(crate) fn is_singleton<R: RingLinks>(ring: &R, node: R::Key) -> bool {
    ring.right(node) == node
}

/// Inserts `node` immediately to the left of `at`.
///
/// `node`'s previous links are overwritten, so it must not still be relied on
/// as a member of another ring.
#[inline]
pub(crate) fn insert_before<R: RingLinks>(ring: &mut R, at: R::Key, node: R::Key) {
    let prev = ring.left(at);

    ring.set_right(node, at);
    ring.set_left(node, prev);
    ring.set_right(prev, node);
    ring.set_left(at, node);
}

/// Removes `node` from its ring and leaves it as a singleton.
///
/// Returns `true` if `node` was the only element, in which case the ring is
/// now gone and any owner pointing into it must be cleared by the caller.
#[inline]
pub(crate) fn remove<R: RingLinks>(ring: &mut R, node: R::Key) -> bool {
    let next = ring.right(node);
    let prev = ring.left(node);

    if next == node {
        return true;
    }

    ring.set_right(prev, next);
    ring.set_left(next, prev);
    make_circular(ring, node);
    false
}

/// Joins the ring containing `b` into the ring containing `a`.
///
/// Before:
///   Ring A: ... <-> a_prev <-> a <-> ...
///   Ring B: ... <-> b_prev <-> b <-> ...
///
/// After:
///   ... <-> a_prev <-> b <-> ... <-> b_prev <-> a <-> ...
pub(crate) fn splice<R: RingLinks>(ring: &mut R, a: R::Key, b: R::Key) {
    let a_prev = ring.left(a);
    let b_prev = ring.left(b);

    ring.set_right(a_prev, b);
    ring.set_left(b, a_prev);

    ring.set_right(b_prev, a);
    ring.set_left(a, b_prev);
}

/// Collects every member of `start`'s ring, beginning with `start` and moving
/// right.
///
/// The result is materialized so callers can relink the members freely
/// afterwards.
pub(crate) fn members<R: RingLinks>(ring: &R, start: R::Key) -> Members<R::Key> {
    let mut out = Members::new();
    out.push(start);

    let mut current = ring.right(start);
    while current != start {
        out.push(current);
        current = ring.right(current);
    }
    out
}

//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy for priority queues:
//!
//! - [`Heap`]: Base trait for simple heaps without handle support
//! - [`DecreaseKeyHeap`]: Extended trait adding `decrease_key`, `delete` and
//!   handle-based operations
//!
//! The base [`Heap`] trait follows the shape of Rust's standard heap API,
//! while [`DecreaseKeyHeap`] adds the operations needed by algorithms like
//! Dijkstra's shortest path and Prim's minimum spanning tree.

pub use crate::error::HeapError;

/// A handle to an element in the heap, used for decrease_key and delete
///
/// This is an opaque type that identifies a specific element in a specific heap.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// This trait provides a simple API similar to Rust's `BinaryHeap`:
/// - `push` inserts an element (returns `()`)
/// - `pop` removes and returns the minimum
/// - `peek` returns the minimum without removing it
///
/// Unlike `BinaryHeap` which stores values directly (using `Ord`), these heaps
/// store (priority, item) pairs to separate the ordering key from the data.
///
/// # Example
///
/// ```rust
/// use fibheap::Heap;
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and associated item without removing it
    ///
    /// Note that `BinaryHeap` is a max-heap, while these heaps are min-heaps.
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with `decrease_key` and `delete` support
///
/// # Example
///
/// ```rust
/// use fibheap::{DecreaseKeyHeap, Heap};
/// use fibheap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push_with_handle(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// ```
pub trait DecreaseKeyHeap<T, P: Ord>: Heap<T, P> {
    /// The handle type for this heap, used to reference elements after insertion
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Decreases the priority of an element identified by the handle
    ///
    /// # Errors
    /// - `HeapError::InvalidDecrease` if the new priority is greater than the
    ///   current one. An equal priority is accepted and changes nothing.
    /// - `HeapError::StaleHandle` if the element was already removed.
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element identified by the handle, returning it
    ///
    /// # Errors
    /// Returns `HeapError::StaleHandle` if the element was already removed.
    fn delete(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;
}

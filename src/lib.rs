//! Fibonacci heap priority queue
//!
//! This crate provides a Fibonacci heap with handle-based `decrease_key` and
//! `delete`, the operations shortest-path and spanning-tree algorithms lean on
//! when they repeatedly take the smallest pending item and lower priorities.
//!
//! | Operation | Cost |
//! |---|---|
//! | `insert` | O(1) |
//! | `minimum` | O(1) |
//! | `decrease_key` | O(1) amortized |
//! | `extract_minimum` | O(log n) amortized |
//! | `delete` | O(log n) amortized |
//!
//! Nodes live in a generational arena and are linked by key rather than by
//! pointer. Handles returned by `insert` are checked on every use, so a handle
//! to an element that was already removed yields [`HeapError::StaleHandle`]
//! instead of touching unrelated data.
//!
//! The heap is single-threaded: operations take `&mut self` and callers that
//! share a heap across threads must wrap it in a lock of their own.
//!
//! # Example
//!
//! ```rust
//! use fibheap::fibonacci::FibonacciHeap;
//! use fibheap::HeapError;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1");
//! let _handle2 = heap.insert(3, "item2");
//! heap.decrease_key(&handle1, 1).unwrap();
//! assert_eq!(heap.minimum(), Ok((&1, &"item1")));
//! assert_eq!(heap.decrease_key(&handle1, 9), Err(HeapError::InvalidDecrease));
//! ```

mod arena;
pub mod error;
pub mod fibonacci;
mod ring;
pub mod stats;
pub mod traits;

// Re-export the main types for convenience
pub use error::{HeapError, InvariantError};
pub use fibonacci::{FibonacciHandle, FibonacciHeap};
pub use stats::HeapStats;
pub use traits::{DecreaseKeyHeap, Handle, Heap};

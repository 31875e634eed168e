//! Error types for heap operations
//!
//! - [`HeapError`]: returned by operations on the heap itself (empty heap,
//!   rejected decrease, stale handle).
//! - [`InvariantError`]: returned by
//!   [`FibonacciHeap::check_invariants`](crate::fibonacci::FibonacciHeap::check_invariants)
//!   when the tree structure is found to be inconsistent.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapError {
    /// The heap has no elements
    EmptyHeap,
    /// The new priority is greater than the current priority
    InvalidDecrease,
    /// The handle is not valid for this heap (its element was removed, the heap
    /// was cleared or merged away, or the handle came from another heap)
    StaleHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidDecrease => {
                write!(f, "new priority is greater than current priority")
            }
            HeapError::StaleHandle => {
                write!(f, "handle is not valid for this heap")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// Error returned when an internal heap invariant is violated.
///
/// Carries a human-readable description of the first failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

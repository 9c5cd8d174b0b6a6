//! Full-buffer policies.
//!
//! The policy is a type parameter of [`TraceStore`](crate::TraceStore) so both
//! behaviors can be built side by side; the `allow_overwrite` feature only
//! picks which one [`DefaultPolicy`] names.

/// What `put` does when the buffer is full.
pub trait OverflowPolicy {
    /// `true` if the oldest entry is evicted to make room.
    const OVERWRITE: bool;
}

/// Drop the new entry; the buffer is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DropNewest;

impl OverflowPolicy for DropNewest {
    const OVERWRITE: bool = false;
}

/// Evict the oldest entry, then store the new one.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverwriteOldest;

impl OverflowPolicy for OverwriteOldest {
    const OVERWRITE: bool = true;
}

/// Policy selected by the `allow_overwrite` feature.
#[cfg(feature = "allow_overwrite")]
pub type DefaultPolicy = OverwriteOldest;

/// Policy selected by the `allow_overwrite` feature.
#[cfg(not(feature = "allow_overwrite"))]
pub type DefaultPolicy = DropNewest;

/// Result of a single `put`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// Stored in a free slot
    Stored,
    /// Buffer full; the new entry was discarded
    Dropped,
    /// Buffer full; the oldest entry was discarded to store the new one
    Evicted,
}

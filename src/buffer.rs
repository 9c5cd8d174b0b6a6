//! Ring buffer of trace words.
//!
//! # Design
//!
//! - Fixed-size array of `N` words, `N` a power of 2 for modulo via bitmask
//! - `head` is the next slot to write, `tail` the oldest queued word
//! - `head == tail` is empty; `head + 1 == tail` (mod N) is full, so one slot
//!   is always unused and usable capacity is `N - 1`
//! - Full-buffer behavior comes from the [`OverflowPolicy`] type parameter
//!
//! # Memory Layout
//!
//! The store is `#[repr(C)]` so a debugger (or a post-mortem memory dump) can
//! read it without symbols for the generic instantiation:
//!
//! ```text
//! +--------------------+
//! | magic              |  4 bytes, 0xAA55CC33 once initialized
//! +--------------------+
//! | reset_count        |  4 bytes
//! +--------------------+
//! | head               |  4 bytes
//! +--------------------+
//! | tail               |  4 bytes
//! +--------------------+
//! | trace_buffer[0..N] |  N * 4 bytes
//! +--------------------+
//! | last_value         |  4 bytes
//! +--------------------+
//! ```
//!
//! # Concurrency
//!
//! There is no internal locking. `put` reads `head`, writes a slot, then
//! advances `head`; a nested `put` on the same store from a higher-priority
//! interrupt in the middle of that sequence corrupts it. On a single core
//! where every `put` runs to completion before the next starts, no further
//! synchronization is needed.

use core::marker::PhantomData;

use crate::policy::{DefaultPolicy, OverflowPolicy, PutOutcome};

// =============================================================================
// Buffer Configuration
// =============================================================================

/// Number of words in a store when no length is given.
/// Must be a power of 2.
pub const DEFAULT_BUFFER_LENGTH: usize = 256;

// Compile-time verification that the default is usable
const _: () = assert!(
    DEFAULT_BUFFER_LENGTH.is_power_of_two(),
    "DEFAULT_BUFFER_LENGTH must be a power of 2"
);

// =============================================================================
// Trace Store
// =============================================================================

/// The trace ring buffer and its reset-survival control fields.
///
/// `N` must be a power of 2 no smaller than 2; any other length fails the
/// build as soon as a store of that length is constructed.
#[repr(C)]
pub struct TraceStore<const N: usize = DEFAULT_BUFFER_LENGTH, P: OverflowPolicy = DefaultPolicy>
{
    /// Initialization sentinel. Only the lifecycle code writes it.
    pub(crate) magic: u32,
    /// Number of warm resets since the last cold start.
    pub(crate) reset_count: u32,
    head: u32,
    tail: u32,
    trace_buffer: [u32; N],
    last_value: u32,
    _policy: PhantomData<P>,
}

impl<const N: usize, P: OverflowPolicy> TraceStore<N, P> {
    /// Index mask (N - 1). Evaluating it checks the length at build time.
    const MASK: u32 = {
        assert!(
            N.is_power_of_two() && N >= 2,
            "trace buffer length must be a power of 2 (and at least 2)"
        );
        assert!(N <= 1 << 31, "trace buffer length must fit a u32 index");
        (N - 1) as u32
    };

    /// Maximum number of queued words.
    pub const CAPACITY: u32 = Self::MASK;

    /// Create an empty, never-initialized store.
    ///
    /// This is const to allow static initialization. A store placed in
    /// memory that is not cleared on reset does not go through this at all;
    /// its fields hold whatever the previous run left.
    pub const fn new() -> Self {
        let _mask = Self::MASK;
        Self {
            magic: 0,
            reset_count: 0,
            head: 0,
            tail: 0,
            trace_buffer: [0; N],
            last_value: 0,
            _policy: PhantomData,
        }
    }

    /// Check whether no words are queued.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Check whether the next `put` hits the overflow policy.
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        (self.head.wrapping_add(1) & Self::MASK) == self.tail
    }

    /// Number of queued words (at most `N - 1`).
    #[inline(always)]
    pub fn num_entries(&self) -> u32 {
        self.head.wrapping_sub(self.tail) & Self::MASK
    }

    /// Maximum number of queued words.
    #[inline(always)]
    pub const fn capacity(&self) -> u32 {
        Self::CAPACITY
    }

    /// Discard all queued words.
    ///
    /// Leaves `magic` and `reset_count` alone; slot contents are not cleared,
    /// they'll be overwritten naturally.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Append a word.
    ///
    /// If the buffer is full the policy decides: `DropNewest` leaves the
    /// buffer untouched, `OverwriteOldest` advances `tail` first so exactly
    /// one oldest word is lost. Neither case is reported beyond the returned
    /// outcome, which callers are free to ignore.
    #[inline(always)]
    pub fn put(&mut self, word: u32) -> PutOutcome {
        let mut outcome = PutOutcome::Stored;

        if self.is_full() {
            if !P::OVERWRITE {
                return PutOutcome::Dropped;
            }
            self.tail = self.tail.wrapping_add(1) & Self::MASK;
            outcome = PutOutcome::Evicted;
        }

        // Masking the index keeps a store inherited from a previous run
        // in bounds even if its indices were damaged.
        self.trace_buffer[(self.head & Self::MASK) as usize] = word;
        self.head = self.head.wrapping_add(1) & Self::MASK;

        outcome
    }

    /// Remove and return the oldest word, or `0` if the buffer is empty.
    ///
    /// `0` is the reserved "no data" value; a queued all-zero word reads the
    /// same as an empty buffer.
    #[inline(always)]
    pub fn get(&mut self) -> u32 {
        if self.is_empty() {
            return 0;
        }

        let word = self.trace_buffer[(self.tail & Self::MASK) as usize];
        self.tail = self.tail.wrapping_add(1) & Self::MASK;
        self.last_value = word;
        word
    }

    /// Iterate over queued words, oldest first, without consuming them.
    ///
    /// # Warning
    ///
    /// Producers must be quiet while iterating.
    pub fn entries(&self) -> impl Iterator<Item = u32> + '_ {
        let tail = self.tail;
        (0..self.num_entries())
            .map(move |i| self.trace_buffer[(tail.wrapping_add(i) & Self::MASK) as usize])
    }

    /// Most recently dequeued word.
    #[inline]
    pub fn last_value(&self) -> u32 {
        self.last_value
    }

    /// Next slot to be written.
    #[inline]
    pub fn head(&self) -> u32 {
        self.head
    }

    /// Slot of the oldest queued word.
    #[inline]
    pub fn tail(&self) -> u32 {
        self.tail
    }

    /// Current initialization sentinel.
    #[inline]
    pub fn magic(&self) -> u32 {
        self.magic
    }

    /// Warm resets observed since the last cold start.
    #[inline]
    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }

    /// Reset the indices after a cold start.
    pub(crate) fn reset_indices(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Pull inherited indices back into `[0, N)` after a warm reset.
    pub(crate) fn normalize_indices(&mut self) {
        self.head &= Self::MASK;
        self.tail &= Self::MASK;
    }
}

impl<const N: usize, P: OverflowPolicy> Default for TraceStore<N, P> {
    fn default() -> Self {
        Self::new()
    }
}

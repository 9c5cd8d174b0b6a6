//! On-target execution tracer for resource-constrained processors.
//!
//! A fixed-capacity circular log of compact 32-bit trace entries (boot and
//! reset events, function entry/exit, source-line markers, variable and
//! peripheral-register snapshots), recorded during normal and crash-path
//! execution and drained later to a UART, flash or debugger channel for
//! offline decoding.
//!
//! # Design Principles
//!
//! 1. **No allocation, no blocking**: every producer operation is O(1) and
//!    unconditional once entered
//! 2. **Fixed-width entries**: one 32-bit word per event (two for
//!    address/value snapshots), tagged in the top 4 bits
//! 3. **Reset survival**: a store placed in memory that is not cleared on
//!    reset keeps its entries across a warm reset, detected via a sentinel
//! 4. **Silent, policy-driven failure**: a full buffer drops or evicts
//!    according to the overflow policy; loss is signaled once per drain
//!
//! # Architecture
//!
//! ```text
//!  trace_function! / trace_line! / ...
//!            |
//!            v
//! +---------------------+      +------------------+
//! |  ExecTracer         |----->|  protocol        |  encode to tagged words
//! |  (enable, config)   |      +------------------+
//! +----------+----------+
//!            | put
//!            v
//! +---------------------+      +------------------+
//! |  TraceStore<N, P>   |<-----|  lifecycle       |  cold/warm init, VERSION
//! |  ring of N words    |      +------------------+
//! +----------+----------+
//!            | get (dump)
//!            v
//! +---------------------+
//! |  output             |----> TraceSink: "0x%08X\n" records
//! +---------------------+
//! ```
//!
//! # Concurrency
//!
//! There is no internal locking. `put` must not be preempted by a nested
//! `put` on the same store; single-core firmware that only ever calls it to
//! completion needs nothing more. Drains take optional lock/unlock hooks that
//! are expected to hold producers off.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod buffer;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod macros;
pub mod output;
pub mod policy;
pub mod protocol;
pub mod tracer;

pub use self::buffer::{TraceStore, DEFAULT_BUFFER_LENGTH};
pub use self::config::{MemoryMap, TracerConfig};
pub use self::error::EncodeError;
pub use self::lifecycle::{BootKind, TRACE_INIT_MAGIC};
pub use self::output::{dump, render_word, Callbacks, DumpSummary, TraceSink, RECORD_LEN};
pub use self::policy::{DefaultPolicy, DropNewest, OverflowPolicy, OverwriteOldest, PutOutcome};
pub use self::protocol::{IdCode, TRACE_PROTOCOL_MAJOR, TRACE_PROTOCOL_MINOR};
pub use self::tracer::ExecTracer;

#[cfg(feature = "std")]
pub use self::output::IoSink;

//! Draining the trace buffer to an external sink.
//!
//! # Output Format
//!
//! One record per queued word, oldest first, each exactly 11 ASCII bytes:
//!
//! ```text
//! 0x0F000000      <- only if the buffer was full when the drain started
//! 0x10560100      <- VERSION 1.0
//! 0x30001234      <- FUNC_ENTRY
//! ```
//!
//! Hex text needs no framing layer on a raw UART or debugger channel and a
//! human can read it straight off a terminal.
//!
//! # Locking
//!
//! The drain takes optional `lock`/`unlock` hooks. If they are supplied they
//! must keep producers out for the duration of the drain (typically by
//! masking interrupts). Without them, a `put` racing the drain is the
//! caller's problem.

use crate::buffer::TraceStore;
use crate::policy::OverflowPolicy;
use crate::protocol::BUFFER_FULL_MARKER;

/// Length of one rendered record: `0x` + 8 hex digits + `\n`.
pub const RECORD_LEN: usize = 11;

/// Receives rendered records, one call per record.
///
/// The core never inspects whether a write succeeded; failures are for the
/// sink to handle out of band.
pub trait TraceSink {
    fn write(&mut self, record: &[u8]);
}

impl<F: FnMut(&[u8])> TraceSink for F {
    #[inline]
    fn write(&mut self, record: &[u8]) {
        self(record)
    }
}

/// Sink plus the optional drain lock hooks.
pub struct Callbacks<W> {
    pub write: W,
    pub lock: Option<fn()>,
    pub unlock: Option<fn()>,
}

impl<W: TraceSink> Callbacks<W> {
    /// Sink without lock hooks.
    pub const fn new(write: W) -> Self {
        Self {
            write,
            lock: None,
            unlock: None,
        }
    }

    /// Sink guarded by `lock`/`unlock` for the length of each drain.
    pub const fn with_lock(write: W, lock: fn(), unlock: fn()) -> Self {
        Self {
            write,
            lock: Some(lock),
            unlock: Some(unlock),
        }
    }
}

/// What a drain emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DumpSummary {
    /// Data records written, not counting the overflow marker.
    pub records: u32,
    /// The buffer was full at the start; entries were possibly lost.
    pub overflowed: bool,
}

/// Render a word as `0xXXXXXXXX\n` with uppercase digits.
pub fn render_word(word: u32) -> [u8; RECORD_LEN] {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

    let mut record = [0u8; RECORD_LEN];
    record[0] = b'0';
    record[1] = b'x';
    for i in 0..8 {
        let nibble = (word >> ((7 - i) * 4)) & 0xF;
        record[2 + i] = HEX_CHARS[nibble as usize];
    }
    record[RECORD_LEN - 1] = b'\n';
    record
}

/// Drain every queued word to the sink.
///
/// Consumes the buffer: it is empty afterwards. An empty buffer still runs
/// the lock hooks but never calls the sink.
pub fn dump<const N: usize, P: OverflowPolicy, W: TraceSink>(
    store: &mut TraceStore<N, P>,
    callbacks: &mut Callbacks<W>,
) -> DumpSummary {
    if let Some(lock) = callbacks.lock {
        lock();
    }

    let mut summary = DumpSummary {
        records: 0,
        overflowed: store.is_full(),
    };

    if summary.overflowed {
        callbacks.write.write(&render_word(BUFFER_FULL_MARKER));
    }

    // A queued zero word is forwarded like any other; only the empty check
    // ends the drain.
    while !store.is_empty() {
        let word = store.get();
        callbacks.write.write(&render_word(word));
        summary.records += 1;
    }

    if let Some(unlock) = callbacks.unlock {
        unlock();
    }

    if summary.overflowed {
        log::warn!(
            "exec trace: buffer reached capacity, entries were lost ({} drained)",
            summary.records
        );
    } else {
        log::debug!("exec trace: drained {} entries", summary.records);
    }

    summary
}

// =============================================================================
// std::io Adapter
// =============================================================================

/// Sink writing records to any `std::io::Write`.
///
/// The tracer ignores sink failures, so the first error is kept here for the
/// caller to inspect; later records are still attempted.
#[cfg(feature = "std")]
pub struct IoSink<T: std::io::Write> {
    inner: T,
    error: Option<std::io::Error>,
}

#[cfg(feature = "std")]
impl<T: std::io::Write> IoSink<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, error: None }
    }

    /// Take the first I/O error seen since the last call.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<T: std::io::Write> TraceSink for IoSink<T> {
    fn write(&mut self, record: &[u8]) {
        if let Err(e) = self.inner.write_all(record) {
            if self.error.is_none() {
                self.error = Some(e);
            }
        }
    }
}

//! Producer-facing tracer.
//!
//! [`ExecTracer`] borrows the single trace store for the lifetime of the
//! firmware's tracing and pairs it with the sink callbacks and configuration.
//! Every operation takes `&mut self`, so in safe code the borrow checker
//! enforces the single-writer rule the ring buffer relies on. Firmware that
//! traces from interrupt handlers shares it through whatever critical-section
//! mechanism the platform provides.
//!
//! # Usage
//!
//! ```rust
//! use exec_tracer::{Callbacks, DropNewest, ExecTracer, TraceStore, TracerConfig};
//!
//! fn uart_write(record: &[u8]) {
//!     // push `record` out of the debug UART
//! #   let _ = record;
//! }
//!
//! let mut store: TraceStore<64, DropNewest> = TraceStore::new();
//! let mut tracer = ExecTracer::init(
//!     &mut store,
//!     Callbacks::new(uart_write),
//!     TracerConfig::DEFAULT,
//! );
//!
//! tracer.trace_reset(0x20);
//! tracer.trace_line(7, line!());
//! let summary = tracer.dump();
//! assert_eq!(summary.records, 3); // VERSION, RESET, FILE_AND_LINE
//! ```

use crate::buffer::{TraceStore, DEFAULT_BUFFER_LENGTH};
use crate::config::TracerConfig;
use crate::lifecycle::BootKind;
use crate::output::{self, Callbacks, DumpSummary, TraceSink};
use crate::policy::{DefaultPolicy, OverflowPolicy, PutOutcome};
use crate::protocol;

/// The trace store together with its sink and configuration.
pub struct ExecTracer<
    'a,
    W: TraceSink,
    const N: usize = DEFAULT_BUFFER_LENGTH,
    P: OverflowPolicy = DefaultPolicy,
> {
    store: &'a mut TraceStore<N, P>,
    callbacks: Callbacks<W>,
    config: TracerConfig,
    boot_kind: BootKind,
    enabled: bool,
}

impl<'a, W: TraceSink, const N: usize, P: OverflowPolicy> ExecTracer<'a, W, N, P> {
    /// Initialize tracing on `store`.
    ///
    /// Detects cold start vs. warm reset through the store's sentinel and
    /// appends a VERSION entry. If the store survived a reset and
    /// `config.stop_tracing_after_reset` is set, tracing is left disabled
    /// after the VERSION entry so the pre-reset history stays intact until
    /// it is drained.
    pub fn init(store: &'a mut TraceStore<N, P>, callbacks: Callbacks<W>, config: TracerConfig) -> Self {
        let boot_kind = store.init(config.version_word);

        let enabled = match boot_kind {
            BootKind::Cold => {
                log::info!("exec trace: cold start, {} entry buffer", store.capacity());
                true
            }
            BootKind::Warm { reset_count } => {
                log::info!(
                    "exec trace: warm reset #{}, {} entries retained",
                    reset_count,
                    store.num_entries()
                );
                if config.stop_tracing_after_reset {
                    log::warn!("exec trace: tracing halted after reset");
                    false
                } else {
                    true
                }
            }
        };

        Self {
            store,
            callbacks,
            config,
            boot_kind,
            enabled,
        }
    }

    // =========================================================================
    // Enable/Disable Control
    // =========================================================================

    #[inline]
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    #[inline]
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    #[inline(always)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // =========================================================================
    // Buffer Operations
    // =========================================================================

    /// Append a raw word. Ignored while tracing is disabled.
    #[inline(always)]
    pub fn put(&mut self, word: u32) -> Option<PutOutcome> {
        if !self.enabled {
            return None;
        }
        Some(self.store.put(word))
    }

    #[inline]
    pub fn get(&mut self) -> u32 {
        self.store.get()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.store.is_full()
    }

    #[inline]
    pub fn num_entries(&self) -> u32 {
        self.store.num_entries()
    }

    // =========================================================================
    // Trace Points
    // =========================================================================

    /// Append the configured VERSION word.
    #[inline]
    pub fn trace_version(&mut self) {
        self.put(self.config.version_word);
    }

    /// Append a RESET entry. `cause` must already be shifted into the low
    /// 28 bits.
    #[inline]
    pub fn trace_reset(&mut self, cause: u32) {
        self.put(protocol::reset(cause));
    }

    #[inline]
    pub fn trace_function_entry(&mut self, address: usize) {
        self.put(protocol::function_entry(address, self.config.memory_map.flash_base));
    }

    #[inline]
    pub fn trace_function_exit(&mut self, address: usize) {
        self.put(protocol::function_exit(address, self.config.memory_map.flash_base));
    }

    #[inline]
    pub fn trace_line(&mut self, module_id: u16, line: u32) {
        self.put(protocol::file_and_line(module_id, line));
    }

    /// Append a VARIABLE_VALUE pair.
    ///
    /// The two words go in with two independent `put`s; see the
    /// [`protocol`] docs for what that means near a full buffer.
    #[inline]
    pub fn trace_variable(&mut self, address: usize, value: u32) {
        let [addr_word, value_word] =
            protocol::variable_value(address, self.config.memory_map.ram_base, value);
        self.put(addr_word);
        self.put(value_word);
    }

    /// Append an SFR_VALUE pair. Same two-word caveat as `trace_variable`.
    #[inline]
    pub fn trace_sfr(&mut self, address: usize, value: u32) {
        let [addr_word, value_word] =
            protocol::sfr_value(address, self.config.memory_map.sfr_base, value);
        self.put(addr_word);
        self.put(value_word);
    }

    // =========================================================================
    // Drain
    // =========================================================================

    /// Drain the buffer through the sink. See [`output::dump`].
    pub fn dump(&mut self) -> DumpSummary {
        output::dump(self.store, &mut self.callbacks)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &TraceStore<N, P> {
        &*self.store
    }

    pub fn sink(&self) -> &W {
        &self.callbacks.write
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.callbacks.write
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn boot_kind(&self) -> BootKind {
        self.boot_kind
    }

    /// Give back the store borrow and the callbacks.
    pub fn into_parts(self) -> (&'a mut TraceStore<N, P>, Callbacks<W>) {
        (self.store, self.callbacks)
    }
}

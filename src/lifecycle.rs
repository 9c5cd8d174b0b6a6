//! Cold start vs. warm reset detection.
//!
//! A store placed in memory that survives a reset still holds the previous
//! run's entries when the firmware restarts. The only thing that tells a
//! surviving store from power-on garbage is the `magic` sentinel: if it
//! matches, the indices and contents are trusted; otherwise the store is
//! reinitialized. Random memory matching the sentinel by accident is an
//! accepted residual risk.

use crate::buffer::TraceStore;
use crate::policy::OverflowPolicy;

/// Sentinel written into `magic` by the first `init`.
pub const TRACE_INIT_MAGIC: u32 = 0xAA55_CC33;

/// How `init` found the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootKind {
    /// Sentinel missing: indices and reset count were zeroed.
    Cold,
    /// Sentinel present: previous entries kept, reset count incremented.
    Warm { reset_count: u32 },
}

impl BootKind {
    /// `true` if the store survived a reset.
    #[inline]
    pub fn is_warm(self) -> bool {
        matches!(self, BootKind::Warm { .. })
    }
}

impl<const N: usize, P: OverflowPolicy> TraceStore<N, P> {
    /// Initialize or re-adopt the store, then append `version_word`.
    ///
    /// The VERSION entry is appended on every call. With overwrite disabled
    /// and a buffer left full by the previous run it is silently dropped.
    pub fn init(&mut self, version_word: u32) -> BootKind {
        let kind = if self.magic != TRACE_INIT_MAGIC {
            self.reset_count = 0;
            self.reset_indices();
            self.magic = TRACE_INIT_MAGIC;
            BootKind::Cold
        } else {
            self.normalize_indices();
            self.reset_count = self.reset_count.wrapping_add(1);
            BootKind::Warm {
                reset_count: self.reset_count,
            }
        };

        self.put(version_word);
        kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::DropNewest;
    use crate::protocol::CURRENT_VERSION;

    #[test]
    fn first_init_is_cold() {
        let mut store: TraceStore<16, DropNewest> = TraceStore::new();
        assert_eq!(store.init(CURRENT_VERSION), BootKind::Cold);
        assert_eq!(store.magic(), TRACE_INIT_MAGIC);
        assert_eq!(store.reset_count(), 0);
        assert_eq!(store.num_entries(), 1);
        assert_eq!(store.get(), CURRENT_VERSION);
    }

    #[test]
    fn garbage_indices_are_discarded_on_cold_start() {
        let mut store: TraceStore<16, DropNewest> = TraceStore::new();
        store.put(1);
        store.put(2);
        store.reset_count = 0x5A5A_5A5A;
        store.magic = 0xDEAD_BEEF;

        assert_eq!(store.init(CURRENT_VERSION), BootKind::Cold);
        assert_eq!(store.reset_count(), 0);
        assert_eq!(store.entries().collect::<std::vec::Vec<_>>(), [CURRENT_VERSION]);
    }

    #[test]
    fn second_init_is_warm_and_keeps_entries() {
        let mut store: TraceStore<16, DropNewest> = TraceStore::new();
        store.init(CURRENT_VERSION);
        store.put(0x3000_0010);

        assert_eq!(store.init(CURRENT_VERSION), BootKind::Warm { reset_count: 1 });
        assert_eq!(store.magic(), TRACE_INIT_MAGIC);
        assert_eq!(
            store.entries().collect::<std::vec::Vec<_>>(),
            [CURRENT_VERSION, 0x3000_0010, CURRENT_VERSION]
        );
        assert!(BootKind::Warm { reset_count: 1 }.is_warm());
        assert!(!BootKind::Cold.is_warm());
    }
}

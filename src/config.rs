//! Tracer configuration.
//!
//! Everything here is known at build time. The values are plain `const`
//! data so a firmware image can declare its configuration as a `const` and
//! pay nothing at runtime:
//!
//! ```rust
//! use exec_tracer::{MemoryMap, TracerConfig};
//!
//! const TRACE_CONFIG: TracerConfig = TracerConfig::DEFAULT
//!     .with_memory_map(MemoryMap::new(0x0800_0000, 0x2000_0000, 0x4000_0000))
//!     .with_stop_tracing_after_reset(false);
//! ```

use crate::protocol;

/// Base addresses that code, data and register addresses are encoded
/// relative to.
///
/// Offsets from these bases are narrowed to 28 bits. Non-contiguous regions
/// are not supported; anything further than 256 MiB above its base is
/// truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMap {
    /// Start of flash (function entry/exit addresses)
    pub flash_base: usize,
    /// Start of RAM (variable addresses)
    pub ram_base: usize,
    /// Start of the peripheral register area (SFR addresses)
    pub sfr_base: usize,
}

impl MemoryMap {
    /// Every address is encoded as-is (truncated to 28 bits).
    pub const FLAT: MemoryMap = MemoryMap::new(0, 0, 0);

    pub const fn new(flash_base: usize, ram_base: usize, sfr_base: usize) -> Self {
        Self {
            flash_base,
            ram_base,
            sfr_base,
        }
    }

    /// Check that a code address survives encoding unchanged.
    pub const fn check_code(&self, address: usize) -> Result<u32, crate::EncodeError> {
        protocol::checked_offset(address, self.flash_base)
    }

    /// Check that a variable address survives encoding unchanged.
    pub const fn check_variable(&self, address: usize) -> Result<u32, crate::EncodeError> {
        protocol::checked_offset(address, self.ram_base)
    }

    /// Check that a register address survives encoding unchanged.
    pub const fn check_sfr(&self, address: usize) -> Result<u32, crate::EncodeError> {
        protocol::checked_offset(address, self.sfr_base)
    }
}

impl Default for MemoryMap {
    fn default() -> Self {
        Self::FLAT
    }
}

/// Runtime-visible tracer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerConfig {
    /// Bases for address compaction.
    pub memory_map: MemoryMap,
    /// Halt tracing when `init` detects a warm reset, so the entries that led
    /// up to the reset are not overwritten before they are drained.
    pub stop_tracing_after_reset: bool,
    /// VERSION word emitted on every `init`.
    pub version_word: u32,
}

impl TracerConfig {
    /// Configuration implied by the crate's Cargo features.
    pub const DEFAULT: TracerConfig = TracerConfig {
        memory_map: MemoryMap::FLAT,
        stop_tracing_after_reset: cfg!(feature = "stop_tracing_after_reset"),
        version_word: protocol::CURRENT_VERSION,
    };

    pub const fn with_memory_map(mut self, memory_map: MemoryMap) -> Self {
        self.memory_map = memory_map;
        self
    }

    pub const fn with_stop_tracing_after_reset(mut self, stop: bool) -> Self {
        self.stop_tracing_after_reset = stop;
        self
    }

    /// Announce a different protocol version. Only useful for decoder tests.
    pub const fn with_protocol_version(mut self, major: u8, minor: u8) -> Self {
        self.version_word = protocol::version(major, minor);
        self
    }
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

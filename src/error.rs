//! Errors reported by the checked encoders.
//!
//! The runtime trace path has no error returns: drops, evictions and empty
//! reads are policy, not failures. These errors only come out of the
//! `checked_*` encoders in [`crate::protocol`], which integrators use to
//! validate their memory map and module ids before trusting the lossy
//! encoders.

use core::fmt;

/// A value that the lossy encoders would have silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// Address lies below the configured region base
    AddressBelowBase,
    /// Offset from the region base does not fit in 28 bits
    OffsetOverflow,
    /// Module identifier does not fit in 12 bits
    ModuleIdOverflow,
    /// Line number does not fit in 16 bits
    LineOverflow,
    /// Reset cause has bits set above bit 27
    CauseOverflow,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::AddressBelowBase => write!(f, "address below region base"),
            EncodeError::OffsetOverflow => write!(f, "offset exceeds 28 bits"),
            EncodeError::ModuleIdOverflow => write!(f, "module id exceeds 12 bits"),
            EncodeError::LineOverflow => write!(f, "line number exceeds 16 bits"),
            EncodeError::CauseOverflow => write!(f, "reset cause exceeds 28 bits"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EncodeError {}

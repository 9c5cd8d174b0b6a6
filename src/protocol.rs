//! Trace word encoding.
//!
//! Every trace entry is a single 32-bit word, or a pair of words for
//! address/value snapshots. The top 4 bits carry the ID code identifying the
//! entry type; the remaining 28 bits carry a type-specific payload.
//!
//! # Word Layout
//!
//! ```text
//!  31    28 27                                            0
//! +--------+-----------------------------------------------+
//! | ID code| payload                                       |
//! +--------+-----------------------------------------------+
//!
//! VERSION        | 0x1 | 0000 | 'V' [23:16] | major [15:8] | minor [7:0] |
//! RESET          | 0x2 | reset cause [27:0]                               |
//! FUNC_ENTRY     | 0x3 | code address - flash base [27:0]                 |
//! FUNC_EXIT      | 0x4 | code address - flash base [27:0]                 |
//! FILE_AND_LINE  | 0x5 | module id [27:16] | line [15:0]                  |
//! VARIABLE_VALUE | 0x6 | data address - RAM base [27:0]   + raw value word|
//! SFR_VALUE      | 0x7 | register address - SFR base [27:0] + raw value   |
//! ```
//!
//! Encoders only shift, mask and OR. Oversized inputs are silently truncated
//! to their field width; the `checked_*` variants report the truncation
//! instead.
//!
//! A value record is two words and is NOT atomic with respect to buffer
//! capacity: with overwrite disabled, a buffer one slot from full accepts the
//! address word and drops the value word, which desynchronizes the decoder.
//! Integrators must size the buffer so this cannot happen on paths they care
//! about.

use crate::error::EncodeError;

/// Protocol major version. Bump for breaking changes.
pub const TRACE_PROTOCOL_MAJOR: u8 = 1;

/// Protocol minor version. Bump for non-breaking changes.
pub const TRACE_PROTOCOL_MINOR: u8 = 0;

/// Bit position of the ID code.
pub const ID_CODE_SHIFT: u32 = 28;

/// Mask of the 28-bit payload below the ID code.
pub const PAYLOAD_MASK: u32 = 0x0FFF_FFFF;

/// Marker byte stored in the VERSION payload.
pub const VERSION_MARKER: u8 = b'V';

/// Width of the FILE_AND_LINE module identifier.
pub const MODULE_ID_BITS: u32 = 12;

/// Width of the FILE_AND_LINE line number.
pub const LINE_BITS: u32 = 16;

const MODULE_ID_MASK: u32 = (1 << MODULE_ID_BITS) - 1;
const LINE_MASK: u32 = (1 << LINE_BITS) - 1;

/// Word emitted at drain time when the buffer reached capacity.
pub const BUFFER_FULL_MARKER: u32 = 0x0F00_0000;

/// Entry type identifiers, stored in the top 4 bits of a trace word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IdCode {
    /// Never produced; reserved for "no data".
    Invalid = 0x0,
    Version = 0x1,
    Reset = 0x2,
    FunctionEntry = 0x3,
    FunctionExit = 0x4,
    FileAndLine = 0x5,
    VariableValue = 0x6,
    SfrValue = 0x7,
    /// Reserved for drain-time overflow signaling.
    BufferFull = 0xF,
}

impl IdCode {
    /// Classify a word by its tag nibble.
    ///
    /// Returns `None` for the unassigned codes 0x8..=0xE. The second word of a
    /// value record is untagged and classifies arbitrarily; callers tracking
    /// the stream must skip it themselves.
    pub const fn of(word: u32) -> Option<IdCode> {
        match word >> ID_CODE_SHIFT {
            0x0 => Some(IdCode::Invalid),
            0x1 => Some(IdCode::Version),
            0x2 => Some(IdCode::Reset),
            0x3 => Some(IdCode::FunctionEntry),
            0x4 => Some(IdCode::FunctionExit),
            0x5 => Some(IdCode::FileAndLine),
            0x6 => Some(IdCode::VariableValue),
            0x7 => Some(IdCode::SfrValue),
            0xF => Some(IdCode::BufferFull),
            _ => None,
        }
    }

    /// The ID code shifted into its word position.
    #[inline(always)]
    pub const fn tag(self) -> u32 {
        (self as u32) << ID_CODE_SHIFT
    }

    /// Number of buffer words an entry of this type occupies.
    pub const fn word_count(self) -> usize {
        match self {
            IdCode::VariableValue | IdCode::SfrValue => 2,
            _ => 1,
        }
    }
}

/// Combine an ID code with a payload, truncating the payload to 28 bits.
#[inline(always)]
pub const fn tagged(code: IdCode, payload: u32) -> u32 {
    code.tag() | (payload & PAYLOAD_MASK)
}

/// Narrow `address - base` to the 28-bit offset field.
///
/// Addresses below `base` wrap and then truncate; no error is signaled.
#[inline(always)]
pub const fn offset_from(address: usize, base: usize) -> u32 {
    (address.wrapping_sub(base) as u32) & PAYLOAD_MASK
}

/// VERSION entry for the given protocol version.
#[inline(always)]
pub const fn version(major: u8, minor: u8) -> u32 {
    tagged(
        IdCode::Version,
        ((VERSION_MARKER as u32) << 16) | ((major as u32) << 8) | minor as u32,
    )
}

/// VERSION entry for the protocol implemented by this crate.
pub const CURRENT_VERSION: u32 = version(TRACE_PROTOCOL_MAJOR, TRACE_PROTOCOL_MINOR);

/// RESET entry. The caller pre-shifts the cause so the relevant bits land in
/// the low 28.
#[inline(always)]
pub const fn reset(cause: u32) -> u32 {
    tagged(IdCode::Reset, cause)
}

/// FUNC_ENTRY entry for a code address.
#[inline(always)]
pub const fn function_entry(address: usize, flash_base: usize) -> u32 {
    tagged(IdCode::FunctionEntry, offset_from(address, flash_base))
}

/// FUNC_EXIT entry for a code address.
#[inline(always)]
pub const fn function_exit(address: usize, flash_base: usize) -> u32 {
    tagged(IdCode::FunctionExit, offset_from(address, flash_base))
}

/// FILE_AND_LINE entry. The module id keeps 12 bits, the line 16 bits.
#[inline(always)]
pub const fn file_and_line(module_id: u16, line: u32) -> u32 {
    tagged(
        IdCode::FileAndLine,
        (((module_id as u32) & MODULE_ID_MASK) << LINE_BITS) | (line & LINE_MASK),
    )
}

/// VARIABLE_VALUE record: address word followed by the raw value.
#[inline(always)]
pub const fn variable_value(address: usize, ram_base: usize, value: u32) -> [u32; 2] {
    [tagged(IdCode::VariableValue, offset_from(address, ram_base)), value]
}

/// SFR_VALUE record: register address word followed by the raw value.
#[inline(always)]
pub const fn sfr_value(address: usize, sfr_base: usize, value: u32) -> [u32; 2] {
    [tagged(IdCode::SfrValue, offset_from(address, sfr_base)), value]
}

// =============================================================================
// Checked Encoders
// =============================================================================

/// Offset of `address` from `base`, rejecting anything that would not survive
/// the 28-bit narrowing.
pub const fn checked_offset(address: usize, base: usize) -> Result<u32, EncodeError> {
    if address < base {
        return Err(EncodeError::AddressBelowBase);
    }
    let offset = address - base;
    if offset > PAYLOAD_MASK as usize {
        return Err(EncodeError::OffsetOverflow);
    }
    Ok(offset as u32)
}

/// RESET entry that refuses causes wider than 28 bits.
pub const fn checked_reset(cause: u32) -> Result<u32, EncodeError> {
    if cause & !PAYLOAD_MASK != 0 {
        return Err(EncodeError::CauseOverflow);
    }
    Ok(reset(cause))
}

/// FILE_AND_LINE entry that refuses fields wider than their slots.
pub const fn checked_file_and_line(module_id: u16, line: u32) -> Result<u32, EncodeError> {
    if module_id as u32 > MODULE_ID_MASK {
        return Err(EncodeError::ModuleIdOverflow);
    }
    if line > LINE_MASK {
        return Err(EncodeError::LineOverflow);
    }
    Ok(file_and_line(module_id, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_layout() {
        let word = version(TRACE_PROTOCOL_MAJOR, TRACE_PROTOCOL_MINOR);
        assert_eq!(word >> 28, IdCode::Version as u32);
        assert_eq!((word >> 16) & 0xFF, 0x56);
        assert_eq!((word >> 8) & 0xFF, TRACE_PROTOCOL_MAJOR as u32);
        assert_eq!(word & 0xFF, TRACE_PROTOCOL_MINOR as u32);
        assert_eq!(word, 0x1056_0100);
        assert_eq!(CURRENT_VERSION, word);
    }

    #[test]
    fn version_keeps_full_bytes() {
        assert_eq!(version(0xAB, 0xCD), 0x1056_ABCD);
    }

    #[test]
    fn reset_masks_to_payload() {
        // IWDG reset flag from the top byte of an STM32 RCC->CSR
        assert_eq!(reset(0x2000_0000 >> 24), 0x2000_0020);
        assert_eq!(reset(0xFFFF_FFFF), 0x2FFF_FFFF);
    }

    #[test]
    fn function_entry_and_exit_subtract_flash_base() {
        let base = 0x0800_0000;
        assert_eq!(function_entry(0x0800_1235, base), 0x3000_1235);
        assert_eq!(function_exit(0x0800_1235, base), 0x4000_1235);
    }

    #[test]
    fn function_offset_truncates_above_28_bits() {
        assert_eq!(function_entry(0x1234_5678, 0), 0x3234_5678);
        // Below base wraps, then truncates
        assert_eq!(function_entry(0x0000_0000, 0x1), 0x3FFF_FFFF);
    }

    #[test]
    fn file_and_line_packs_fields() {
        assert_eq!(file_and_line(0x123, 0x4567), 0x5123_4567);
        // Module id keeps 12 bits, line keeps 16
        assert_eq!(file_and_line(0xF123, 0x1_4567), 0x5123_4567);
    }

    #[test]
    fn value_records_are_two_words() {
        let ram = 0x2000_0000;
        assert_eq!(variable_value(0x2000_0010, ram, 0xDEAD_BEEF), [0x6000_0010, 0xDEAD_BEEF]);
        let sfr = 0x4000_0000;
        assert_eq!(sfr_value(0x4002_3800, sfr, 0), [0x7002_3800, 0]);
    }

    #[test]
    fn id_code_classification() {
        assert_eq!(IdCode::of(CURRENT_VERSION), Some(IdCode::Version));
        assert_eq!(IdCode::of(0), Some(IdCode::Invalid));
        assert_eq!(IdCode::of(0xF000_0000), Some(IdCode::BufferFull));
        assert_eq!(IdCode::of(0x8000_0000), None);
        assert_eq!(IdCode::SfrValue.word_count(), 2);
        assert_eq!(IdCode::FileAndLine.word_count(), 1);
    }

    #[test]
    fn checked_encoders_reject_truncation() {
        assert_eq!(checked_offset(0x100, 0x200), Err(EncodeError::AddressBelowBase));
        assert_eq!(checked_offset(0x1000_0000, 0), Err(EncodeError::OffsetOverflow));
        assert_eq!(checked_offset(0x0FFF_FFFF, 0), Ok(0x0FFF_FFFF));
        assert_eq!(checked_reset(0x1000_0000), Err(EncodeError::CauseOverflow));
        assert_eq!(checked_reset(0x20), Ok(0x2000_0020));
        assert_eq!(checked_file_and_line(0x1000, 1), Err(EncodeError::ModuleIdOverflow));
        assert_eq!(checked_file_and_line(1, 0x1_0000), Err(EncodeError::LineOverflow));
        assert_eq!(checked_file_and_line(0xFFF, 0xFFFF), Ok(0x5FFF_FFFF));
    }
}

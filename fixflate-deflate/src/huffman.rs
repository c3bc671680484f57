//! Canonical fixed Huffman code decoding.
//!
//! The fixed literal/length code mixes 7-, 8- and 9-bit codes. Because the
//! code is canonical, all codes of one length form contiguous numeric ranges,
//! so decoding reads the code one bit at a time (most significant bit first)
//! and, once 7, 8 and then 9 bits have been gathered, checks the value
//! against the ranges for that length. A code is accepted at the first
//! length where it falls inside a range; the fixed code is prefix-free, so
//! that choice is never ambiguous.

use crate::tables::{DISTANCE_CODE_BITS, DISTANCE_CODES, LENGTH_CODES, LengthCode};
use fixflate_core::BitReader;
use fixflate_core::error::{FlateError, Result};

/// Shortest literal/length code.
const MIN_LITLEN_BITS: u8 = 7;

/// Longest literal/length code.
const MAX_LITLEN_BITS: u8 = 9;

/// A run of consecutive canonical codes of one length.
#[derive(Debug, Clone, Copy)]
pub struct CodeRange {
    /// Code length in bits.
    pub len: u8,
    /// First code of the run.
    pub first_code: u16,
    /// Last code of the run (inclusive).
    pub last_code: u16,
    /// Symbol assigned to `first_code`.
    pub first_symbol: u16,
}

/// Fixed literal/length code ranges (RFC 1951 section 3.2.6).
pub const LITLEN_RANGES: [CodeRange; 4] = [
    CodeRange {
        len: 7,
        first_code: 0x00,
        last_code: 0x17,
        first_symbol: 256,
    },
    CodeRange {
        len: 8,
        first_code: 0x30,
        last_code: 0xBF,
        first_symbol: 0,
    },
    CodeRange {
        len: 8,
        first_code: 0xC0,
        last_code: 0xC7,
        first_symbol: 280,
    },
    CodeRange {
        len: 9,
        first_code: 0x190,
        last_code: 0x1FF,
        first_symbol: 144,
    },
];

/// A decoded literal/length symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitLen {
    /// A literal byte.
    Literal(u8),
    /// The end of block marker.
    EndOfBlock,
    /// A length code; the extra bits still have to be read.
    Length(&'static LengthCode),
}

/// Look up the symbol for a `len`-bit code, if one exists.
fn symbol_for(code: u16, len: u8) -> Option<u16> {
    LITLEN_RANGES
        .iter()
        .find(|range| range.len == len && (range.first_code..=range.last_code).contains(&code))
        .map(|range| range.first_symbol + (code - range.first_code))
}

/// Decode the next literal/length symbol from the fixed code.
pub fn decode_litlen(reader: &mut BitReader<'_>) -> Result<LitLen> {
    let start = reader.bit_position();
    let mut code = 0u16;

    for len in 1..=MAX_LITLEN_BITS {
        code = (code << 1) | reader.read_bits(1)? as u16;
        if len < MIN_LITLEN_BITS {
            continue;
        }

        if let Some(symbol) = symbol_for(code, len) {
            return match symbol {
                0..=255 => Ok(LitLen::Literal(symbol as u8)),
                256 => Ok(LitLen::EndOfBlock),
                257..=285 => Ok(LitLen::Length(&LENGTH_CODES[(symbol - 257) as usize])),
                // 286 and 287 take part in the code but never occur in valid data.
                _ => Err(FlateError::invalid_symbol(start)),
            };
        }
    }

    Err(FlateError::invalid_symbol(start))
}

/// Decode a fixed 5-bit distance code and return its table index.
pub fn decode_distance_symbol(reader: &mut BitReader<'_>) -> Result<usize> {
    let start = reader.bit_position();
    let code = reader.read_code(DISTANCE_CODE_BITS)? as usize;
    if code >= DISTANCE_CODES.len() {
        return Err(FlateError::invalid_symbol(start));
    }
    Ok(code)
}

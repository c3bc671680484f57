//! Fixed Huffman code tables for DEFLATE (RFC 1951).
//!
//! Fixed-code blocks use a code table published in RFC 1951 section 3.2.6
//! instead of transmitting one, so every table here is plain constant data
//! shared read-only by the encoder and the decoder.
//!
//! | Symbols   | Meaning               | Code bits | Codes         |
//! |-----------|-----------------------|-----------|---------------|
//! | 0-143     | literal bytes         | 8         | 0x30 - 0xBF   |
//! | 144-255   | literal bytes         | 9         | 0x190 - 0x1FF |
//! | 256-279   | end of block, lengths | 7         | 0x00 - 0x17   |
//! | 280-287   | lengths               | 8         | 0xC0 - 0xC7   |
//!
//! Distance symbols 0-29 use 5-bit codes equal to the symbol.

/// Minimum back-reference length.
pub const MIN_MATCH: usize = 3;

/// Maximum back-reference length.
pub const MAX_MATCH: usize = 258;

/// Maximum back-reference distance (window size).
pub const MAX_DISTANCE: usize = 32768;

/// End of block symbol.
pub const END_OF_BLOCK_SYMBOL: u16 = 256;

/// Code length of the end of block marker.
pub const END_OF_BLOCK_BITS: u8 = 7;

/// BTYPE value of a fixed Huffman block.
pub const BTYPE_FIXED: u8 = 0b01;

/// Code length of every fixed distance code.
pub const DISTANCE_CODE_BITS: u8 = 5;

/// Literals below this value use 8-bit codes, the rest 9-bit codes.
pub const LITERAL_THRESHOLD: u16 = 144;

/// First 8-bit literal code.
const LITERAL_CODE_OFFSET_8: u16 = 0x30;

/// First 9-bit literal code.
const LITERAL_CODE_OFFSET_9: u16 = 0x190;

/// A Huffman code, stored as its numeric value and bit count.
///
/// The value is written most significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCode {
    /// Code value.
    pub bits: u16,
    /// Number of bits in the code.
    pub len: u8,
}

/// The fixed end of block code, `0000000`.
pub const END_OF_BLOCK: FixedCode = FixedCode {
    bits: 0,
    len: END_OF_BLOCK_BITS,
};

/// A length code entry (RFC 1951 section 3.2.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthCode {
    /// Smallest length this code represents.
    pub base: u16,
    /// Number of extra bits following the code.
    pub extra_bits: u8,
    /// Literal/length alphabet symbol (257-285).
    pub symbol: u16,
    /// Fixed Huffman code for the symbol.
    pub code: FixedCode,
}

/// A distance code entry (RFC 1951 section 3.2.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceCode {
    /// Smallest distance this code represents.
    pub base: u16,
    /// Number of extra bits following the code.
    pub extra_bits: u8,
    /// Distance alphabet symbol (0-29), also its 5-bit code.
    pub symbol: u8,
}

const fn length_code(symbol: u16, base: u16, extra_bits: u8) -> LengthCode {
    let code = if symbol < 280 {
        FixedCode {
            bits: symbol - 256,
            len: 7,
        }
    } else {
        FixedCode {
            bits: 0xC0 + (symbol - 280),
            len: 8,
        }
    };

    LengthCode {
        base,
        extra_bits,
        symbol,
        code,
    }
}

const fn distance_code(symbol: u8, base: u16, extra_bits: u8) -> DistanceCode {
    DistanceCode {
        base,
        extra_bits,
        symbol,
    }
}

/// Length codes 257-285, sorted by base length.
pub const LENGTH_CODES: [LengthCode; 29] = [
    length_code(257, 3, 0),
    length_code(258, 4, 0),
    length_code(259, 5, 0),
    length_code(260, 6, 0),
    length_code(261, 7, 0),
    length_code(262, 8, 0),
    length_code(263, 9, 0),
    length_code(264, 10, 0),
    length_code(265, 11, 1),
    length_code(266, 13, 1),
    length_code(267, 15, 1),
    length_code(268, 17, 1),
    length_code(269, 19, 2),
    length_code(270, 23, 2),
    length_code(271, 27, 2),
    length_code(272, 31, 2),
    length_code(273, 35, 3),
    length_code(274, 43, 3),
    length_code(275, 51, 3),
    length_code(276, 59, 3),
    length_code(277, 67, 4),
    length_code(278, 83, 4),
    length_code(279, 99, 4),
    length_code(280, 115, 4),
    length_code(281, 131, 5),
    length_code(282, 163, 5),
    length_code(283, 195, 5),
    length_code(284, 227, 5),
    length_code(285, 258, 0),
];

/// Distance codes 0-29, sorted by base distance.
pub const DISTANCE_CODES: [DistanceCode; 30] = [
    distance_code(0, 1, 0),
    distance_code(1, 2, 0),
    distance_code(2, 3, 0),
    distance_code(3, 4, 0),
    distance_code(4, 5, 1),
    distance_code(5, 7, 1),
    distance_code(6, 9, 2),
    distance_code(7, 13, 2),
    distance_code(8, 17, 3),
    distance_code(9, 25, 3),
    distance_code(10, 33, 4),
    distance_code(11, 49, 4),
    distance_code(12, 65, 5),
    distance_code(13, 97, 5),
    distance_code(14, 129, 6),
    distance_code(15, 193, 6),
    distance_code(16, 257, 7),
    distance_code(17, 385, 7),
    distance_code(18, 513, 8),
    distance_code(19, 769, 8),
    distance_code(20, 1025, 9),
    distance_code(21, 1537, 9),
    distance_code(22, 2049, 10),
    distance_code(23, 3073, 10),
    distance_code(24, 4097, 11),
    distance_code(25, 6145, 11),
    distance_code(26, 8193, 12),
    distance_code(27, 12289, 12),
    distance_code(28, 16385, 13),
    distance_code(29, 24577, 13),
];

/// Fixed code for a literal byte.
#[inline]
pub fn literal_code(byte: u8) -> FixedCode {
    let byte = byte as u16;
    if byte < LITERAL_THRESHOLD {
        FixedCode {
            bits: LITERAL_CODE_OFFSET_8 + byte,
            len: 8,
        }
    } else {
        FixedCode {
            bits: LITERAL_CODE_OFFSET_9 + (byte - LITERAL_THRESHOLD),
            len: 9,
        }
    }
}

/// Find the length code for `length` (3-258).
///
/// Returns the entry whose base is the greatest base not above `length`,
/// together with the value of its extra bits.
pub fn lookup_length(length: u16) -> (&'static LengthCode, u16) {
    debug_assert!(
        (MIN_MATCH as u16..=MAX_MATCH as u16).contains(&length),
        "Length out of range: {}",
        length
    );

    let idx = LENGTH_CODES.partition_point(|entry| entry.base <= length) - 1;
    let entry = &LENGTH_CODES[idx];
    (entry, length - entry.base)
}

/// Find the distance code for `distance` (1-32768).
///
/// Returns the entry whose base is the greatest base not above `distance`,
/// together with the value of its extra bits.
pub fn lookup_distance(distance: u16) -> (&'static DistanceCode, u16) {
    debug_assert!(
        (1..=MAX_DISTANCE as u32).contains(&(distance as u32)),
        "Distance out of range: {}",
        distance
    );

    let idx = DISTANCE_CODES.partition_point(|entry| entry.base <= distance) - 1;
    let entry = &DISTANCE_CODES[idx];
    (entry, distance - entry.base)
}

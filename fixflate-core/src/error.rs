//! Error types for fixflate operations.
//!
//! Every error is fatal to the encode or decode call that produced it:
//! there is no partial-result recovery, and a decoder that fails never hands
//! back the bytes it had produced so far.

use std::fmt;
use std::io;
use thiserror::Error;

/// Which integrity field disagreed with the decoded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityField {
    /// CRC-32 of the uncompressed data (trailer).
    Crc32,
    /// Uncompressed size modulo 2^32 (trailer).
    Size,
    /// Header CRC-16 (present when FHCRC is set).
    HeaderCrc16,
}

impl fmt::Display for IntegrityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crc32 => write!(f, "CRC-32"),
            Self::Size => write!(f, "size"),
            Self::HeaderCrc16 => write!(f, "header CRC-16"),
        }
    }
}

/// The main error type for fixflate operations.
#[derive(Debug, Error)]
pub enum FlateError {
    /// I/O error while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Bad magic, compression method, flags or header layout.
    #[error("Malformed header: {message}")]
    MalformedHeader {
        /// Description of the header error.
        message: String,
    },

    /// A block uses an encoding other than fixed Huffman codes.
    #[error("Unsupported block type {btype:#04b} (only fixed Huffman blocks are supported)")]
    UnsupportedBlockType {
        /// The 2-bit BTYPE value read from the stream.
        btype: u8,
    },

    /// The stream ended where more bits were required.
    #[error("Truncated stream at bit position {bit_position}")]
    TruncatedStream {
        /// Bit position at which the read was attempted.
        bit_position: u64,
    },

    /// Decoded data disagrees with a stored checksum or size.
    #[error("Integrity mismatch in {field}: expected {expected:#x}, computed {computed:#x}")]
    IntegrityMismatch {
        /// The field that failed verification.
        field: IntegrityField,
        /// Value stored in the container.
        expected: u32,
        /// Value computed from the decoded data.
        computed: u32,
    },

    /// A bit pattern that is not a usable fixed Huffman code.
    #[error("Invalid symbol at bit position {bit_position}")]
    InvalidSymbol {
        /// Bit position where the code started.
        bit_position: u64,
    },

    /// A back-reference that points before the start of the output.
    #[error("Invalid back-reference distance: {distance} exceeds {available} bytes of output")]
    InvalidDistance {
        /// The distance read from the stream.
        distance: usize,
        /// Number of bytes produced so far.
        available: usize,
    },

    /// A file name that cannot be stored in the header.
    #[error("Invalid file name: {message}")]
    InvalidFileName {
        /// Description of the problem.
        message: String,
    },
}

/// Result type alias for fixflate operations.
pub type Result<T> = std::result::Result<T, FlateError>;

impl FlateError {
    /// Create a malformed header error.
    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            message: message.into(),
        }
    }

    /// Create an unsupported block type error.
    pub fn unsupported_block_type(btype: u8) -> Self {
        Self::UnsupportedBlockType { btype }
    }

    /// Create a truncated stream error.
    pub fn truncated(bit_position: u64) -> Self {
        Self::TruncatedStream { bit_position }
    }

    /// Create an integrity mismatch error.
    pub fn integrity_mismatch(field: IntegrityField, expected: u32, computed: u32) -> Self {
        Self::IntegrityMismatch {
            field,
            expected,
            computed,
        }
    }

    /// Create an invalid symbol error.
    pub fn invalid_symbol(bit_position: u64) -> Self {
        Self::InvalidSymbol { bit_position }
    }

    /// Create an invalid distance error.
    pub fn invalid_distance(distance: usize, available: usize) -> Self {
        Self::InvalidDistance {
            distance,
            available,
        }
    }

    /// Create an invalid file name error.
    pub fn invalid_file_name(message: impl Into<String>) -> Self {
        Self::InvalidFileName {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlateError::malformed_header("bad magic");
        assert!(err.to_string().contains("bad magic"));

        let err = FlateError::integrity_mismatch(IntegrityField::Crc32, 0x12345678, 0xDEADBEEF);
        let text = err.to_string();
        assert!(text.contains("CRC-32"));
        assert!(text.contains("0x12345678"));

        let err = FlateError::unsupported_block_type(2);
        assert!(err.to_string().contains("0b10"));

        let err = FlateError::invalid_distance(40, 12);
        assert!(err.to_string().contains("40"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing.gz");
        let err: FlateError = io_err.into();
        assert!(matches!(err, FlateError::Io(_)));
        assert!(err.to_string().contains("missing.gz"));
    }

    #[test]
    fn test_integrity_field_display() {
        assert_eq!(IntegrityField::Size.to_string(), "size");
        assert_eq!(IntegrityField::HeaderCrc16.to_string(), "header CRC-16");
    }
}

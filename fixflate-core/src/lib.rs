//! # fixflate Core
//!
//! Core components for the fixflate gzip codec.
//!
//! This crate provides the building blocks shared by the encoder and the
//! decoder:
//!
//! - [`bitstream`]: LSB-first bit packing and unpacking
//! - [`crc`]: CRC-32 (ISO 3309) checksum
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Container                                           │
//! │     GZIP header, trailer, integrity checks              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     LZ77 match finder + fixed Huffman blocks            │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, CRC-32, errors                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use fixflate_core::bitstream::{BitReader, BitWriter};
//! use fixflate_core::crc::Crc32;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//!
//! assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::{Crc32, crc32};
pub use error::{FlateError, IntegrityField, Result};

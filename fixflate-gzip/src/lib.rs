//! # fixflate-gzip
//!
//! GZIP (RFC 1952) framing around the fixed-Huffman DEFLATE codec.
//!
//! A member is laid out as
//!
//! ```text
//! 1F 8B 08 FLG MTIME[4] XFL OS [EXTRA] [NAME 00] [COMMENT 00] [HCRC[2]]
//! payload ... CRC32[4] ISIZE[4]
//! ```
//!
//! with all multi-byte integers little-endian. Decoding checks the trailer
//! against the decoded data and fails with
//! [`FlateError::IntegrityMismatch`](fixflate_core::FlateError::IntegrityMismatch)
//! on any disagreement.
//!
//! ## Example
//!
//! ```rust
//! use fixflate_gzip::{EncodeOptions, decode, encode};
//!
//! let data = b"Hello, World!";
//! let gz = encode(data, &EncodeOptions::new()).unwrap();
//! assert_eq!(&gz[..3], &[0x1F, 0x8B, 0x08]);
//!
//! let decoded = decode(&gz).unwrap();
//! assert_eq!(decoded.data, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod header;

pub use codec::{Decoded, EncodeOptions, MIN_MEMBER_LEN, decode, encode};
pub use header::{CM_DEFLATE, GZIP_MAGIC, GzipHeader, flags};

//! # fixflate-deflate
//!
//! DEFLATE (RFC 1951) restricted to fixed Huffman blocks.
//!
//! ## Features
//!
//! - **Compression**: greedy LZ77 over a 32 KiB window, encoded with the
//!   fixed literal/length and distance codes
//!   - Blocks cover at most 65536 uncompressed bytes
//!   - No dynamic code construction, no stored blocks
//! - **Decompression**: fixed-code blocks only
//!   - Stored and dynamic blocks are rejected with
//!     [`FlateError::UnsupportedBlockType`](fixflate_core::FlateError::UnsupportedBlockType)
//!
//! ## Example
//!
//! ```rust
//! use fixflate_deflate::{deflate, inflate};
//!
//! let original = b"Hello, World! Hello, World!";
//! let compressed = deflate(original);
//!
//! let decompressed = inflate(&compressed).unwrap();
//! assert_eq!(&decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod deflate;
pub mod huffman;
pub mod inflate;
pub mod lz77;
pub mod tables;

// Re-exports
pub use deflate::{BLOCK_SIZE, Deflater, deflate, partition_blocks};
pub use inflate::{BlockSummary, Inflater, inflate};
pub use lz77::{MatchFinder, Token};

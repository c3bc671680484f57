//! DEFLATE decompression for fixed Huffman blocks.
//!
//! Decoding is an explicit state machine over the block structure:
//!
//! ```text
//! BlockStart -> ReadingSymbols -> BlockEnd -+-> Done
//!     ^                                     |
//!     +------------- not final -------------+
//! ```
//!
//! Only BTYPE=01 (fixed codes) is accepted; stored and dynamic blocks are
//! reported as [`FlateError::UnsupportedBlockType`].

use crate::huffman::{LitLen, decode_distance_symbol, decode_litlen};
use crate::tables::{BTYPE_FIXED, DISTANCE_CODES, END_OF_BLOCK};
use fixflate_core::BitReader;
use fixflate_core::error::{FlateError, Result};
use tracing::{debug, trace};

/// Decoder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a block header.
    BlockStart,
    /// Decoding symbols of the current block.
    ReadingSymbols { is_final: bool },
    /// The end of block marker is next.
    BlockEnd { is_final: bool },
    /// The final block has been decoded.
    Done,
}

/// Summary of one decoded block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSummary {
    /// Whether the block had BFINAL set.
    pub is_final: bool,
    /// Number of bytes the block produced.
    pub output_len: usize,
}

/// Fixed-Huffman DEFLATE decompressor.
#[derive(Debug, Default)]
pub struct Inflater {
    /// Blocks decoded by the last successful call.
    blocks: Vec<BlockSummary>,
    /// Input bytes consumed by the last successful call.
    bytes_consumed: usize,
}

impl Inflater {
    /// Create a new decompressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks decoded by the last successful [`Inflater::inflate`] call.
    pub fn blocks(&self) -> &[BlockSummary] {
        &self.blocks
    }

    /// Input bytes consumed by the last successful call, including the
    /// padding bits of the final byte.
    pub fn bytes_consumed(&self) -> usize {
        self.bytes_consumed
    }

    /// Decompress a raw DEFLATE stream.
    ///
    /// Bytes after the end of the final block are ignored. On error nothing
    /// is returned and the block summaries are cleared.
    pub fn inflate(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.blocks.clear();
        self.bytes_consumed = 0;

        let mut reader = BitReader::new(data);
        let mut output = Vec::with_capacity(data.len().saturating_mul(3));

        match self.run(&mut reader, &mut output) {
            Ok(()) => {
                self.bytes_consumed = reader.bytes_consumed();
                debug!(
                    blocks = self.blocks.len(),
                    input_len = self.bytes_consumed,
                    output_len = output.len(),
                    "inflate finished"
                );
                Ok(output)
            }
            Err(e) => {
                self.blocks.clear();
                Err(e)
            }
        }
    }

    fn run(&mut self, reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
        let mut state = State::BlockStart;
        let mut block_start = 0;

        loop {
            state = match state {
                State::BlockStart => {
                    let is_final = reader.read_bit()?;
                    let btype = reader.read_bits(2)? as u8;
                    if btype != BTYPE_FIXED {
                        return Err(FlateError::unsupported_block_type(btype));
                    }
                    trace!(
                        index = self.blocks.len(),
                        is_final,
                        bit_position = reader.bit_position(),
                        "block header"
                    );
                    block_start = output.len();
                    State::ReadingSymbols { is_final }
                }
                State::ReadingSymbols { is_final } => {
                    // The marker is all zeros, so bit order does not matter here.
                    if reader.peek_bits(END_OF_BLOCK.len)? == END_OF_BLOCK.bits as u32 {
                        State::BlockEnd { is_final }
                    } else {
                        decode_symbol(reader, output)?;
                        State::ReadingSymbols { is_final }
                    }
                }
                State::BlockEnd { is_final } => {
                    reader.skip_bits(END_OF_BLOCK.len)?;
                    self.blocks.push(BlockSummary {
                        is_final,
                        output_len: output.len() - block_start,
                    });
                    if is_final {
                        State::Done
                    } else {
                        State::BlockStart
                    }
                }
                State::Done => return Ok(()),
            };
        }
    }
}

/// Decode one literal or back-reference into `output`.
fn decode_symbol(reader: &mut BitReader<'_>, output: &mut Vec<u8>) -> Result<()> {
    let entry = match decode_litlen(reader)? {
        LitLen::Literal(byte) => {
            output.push(byte);
            return Ok(());
        }
        LitLen::Length(entry) => entry,
        // Handled by the caller's peek; a 7-bit zero code is the only EOB.
        LitLen::EndOfBlock => return Err(FlateError::invalid_symbol(reader.bit_position() - 7)),
    };

    let length = entry.base as usize + reader.read_bits(entry.extra_bits)? as usize;

    let dist_entry = &DISTANCE_CODES[decode_distance_symbol(reader)?];
    let distance = dist_entry.base as usize + reader.read_bits(dist_entry.extra_bits)? as usize;

    if distance > output.len() {
        return Err(FlateError::invalid_distance(distance, output.len()));
    }

    // Source and destination overlap when length > distance.
    let start = output.len() - distance;
    output.reserve(length);
    for i in 0..length {
        let byte = output[start + i % distance];
        output.push(byte);
    }

    Ok(())
}

/// Decompress a raw fixed-Huffman DEFLATE stream.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    Inflater::new().inflate(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deflate::deflate;

    #[test]
    fn test_inflate_zlib_streams() {
        // Produced by zlib with Z_FIXED.
        assert_eq!(inflate(&[0x03, 0x00]).unwrap(), b"");
        assert_eq!(inflate(&[0x4B, 0x04, 0x00]).unwrap(), b"a");
        assert_eq!(
            inflate(&[0x4B, 0x4C, 0x4C, 0x4C, 0x04, 0x00]).unwrap(),
            b"aaaa"
        );
        assert_eq!(
            inflate(&[0xCB, 0x48, 0xCD, 0xC9, 0xC9, 0x57, 0xC8, 0x40, 0x27, 0x01]).unwrap(),
            b"hello hello hello hello"
        );
    }

    #[test]
    fn test_inflate_zlib_pangram() {
        let stream = [
            0x0B, 0xC9, 0x48, 0x55, 0x28, 0x2C, 0xCD, 0x4C, 0xCE, 0x56, 0x48, 0x2A, 0xCA, 0x2F,
            0xCF, 0x53, 0x48, 0xCB, 0xAF, 0x50, 0xC8, 0x2A, 0xCD, 0x2D, 0x28, 0x56, 0xC8, 0x2F,
            0x4B, 0x2D, 0x52, 0x28, 0x01, 0x4A, 0xE7, 0x24, 0x56, 0x55, 0x2A, 0xA4, 0xE4, 0xA7,
            0x03, 0x00,
        ];
        assert_eq!(
            inflate(&stream).unwrap(),
            b"The quick brown fox jumps over the lazy dog"
        );
    }

    #[test]
    fn test_overlapping_copy() {
        // 'a' then <length 3, distance 1>.
        assert_eq!(inflate(&[0x4B, 0x04, 0x02, 0x00]).unwrap(), b"aaaa");
    }

    #[test]
    fn test_stored_block_rejected() {
        // zlib level 0 output for "abc".
        let stream = [0x01, 0x03, 0x00, 0xFC, 0xFF, 0x61, 0x62, 0x63];
        assert!(matches!(
            inflate(&stream),
            Err(FlateError::UnsupportedBlockType { btype: 0 })
        ));
    }

    #[test]
    fn test_dynamic_block_rejected() {
        // BFINAL=1, BTYPE=10.
        assert!(matches!(
            inflate(&[0x05, 0x00]),
            Err(FlateError::UnsupportedBlockType { btype: 2 })
        ));
    }

    #[test]
    fn test_reserved_block_type_rejected() {
        // BFINAL=1, BTYPE=11.
        assert!(matches!(
            inflate(&[0x07, 0x00]),
            Err(FlateError::UnsupportedBlockType { btype: 3 })
        ));
    }

    #[test]
    fn test_distance_before_start() {
        // BFINAL=1 BTYPE=01, then <length 3, distance 1> with empty output.
        let mut writer = fixflate_core::BitWriter::new();
        writer.write_bit(true);
        writer.write_bits(1, 2);
        writer.write_code(1, 7);
        writer.write_code(0, 5);
        writer.write_code(0, 7);
        let stream = writer.finish();

        assert!(matches!(
            inflate(&stream),
            Err(FlateError::InvalidDistance {
                distance: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn test_truncated_stream() {
        let compressed = deflate(b"The quick brown fox jumps over the lazy dog");
        for cut in 0..compressed.len() {
            assert!(
                matches!(
                    inflate(&compressed[..cut]),
                    Err(FlateError::TruncatedStream { .. })
                ),
                "cut at {} should be truncated",
                cut
            );
        }
    }

    #[test]
    fn test_block_summaries() {
        let mut inflater = Inflater::new();
        let data = b"abcabcabcabc";
        let compressed = deflate(data);
        let output = inflater.inflate(&compressed).unwrap();

        assert_eq!(output, data);
        assert_eq!(
            inflater.blocks(),
            &[BlockSummary {
                is_final: true,
                output_len: data.len()
            }]
        );
        assert_eq!(inflater.bytes_consumed(), compressed.len());
    }

    #[test]
    fn test_trailing_bytes_not_consumed() {
        let mut stream = deflate(b"payload");
        let len = stream.len();
        stream.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

        let mut inflater = Inflater::new();
        assert_eq!(inflater.inflate(&stream).unwrap(), b"payload");
        assert_eq!(inflater.bytes_consumed(), len);
    }

    #[test]
    fn test_failure_clears_summaries() {
        let mut inflater = Inflater::new();
        inflater.inflate(&deflate(b"first")).unwrap();
        assert_eq!(inflater.blocks().len(), 1);

        assert!(inflater.inflate(&[0x07, 0x00]).is_err());
        assert!(inflater.blocks().is_empty());
        assert_eq!(inflater.bytes_consumed(), 0);
    }
}

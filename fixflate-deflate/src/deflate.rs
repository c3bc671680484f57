//! DEFLATE compression with fixed Huffman codes.
//!
//! The input is tokenized by the greedy match finder, the tokens are split
//! into blocks of at most [`BLOCK_SIZE`] uncompressed bytes, and every block
//! is written as a fixed-code block:
//!
//! ```text
//! BFINAL(1) BTYPE(2) = 01 | token codes ... | END_OF_BLOCK (0000000)
//! ```
//!
//! Only the last block carries BFINAL=1. The stream is zero-padded to a byte
//! boundary.

use crate::lz77::{MatchFinder, Token};
use crate::tables::{
    BTYPE_FIXED, DISTANCE_CODE_BITS, END_OF_BLOCK, literal_code, lookup_distance, lookup_length,
};
use fixflate_core::BitWriter;
use tracing::{debug, trace};

/// Maximum number of uncompressed bytes covered by one block.
pub const BLOCK_SIZE: usize = 65536;

/// Split `tokens` into blocks of at most [`BLOCK_SIZE`] uncompressed bytes.
///
/// A token that would push the running total past the bound starts a new
/// block. An empty token list yields a single empty block, so every stream
/// has a final block.
pub fn partition_blocks(tokens: &[Token]) -> Vec<&[Token]> {
    let mut blocks = Vec::new();
    let mut start = 0;
    let mut size = 0;

    for (i, token) in tokens.iter().enumerate() {
        let len = token.literal_len();
        if size + len > BLOCK_SIZE && i > start {
            blocks.push(&tokens[start..i]);
            start = i;
            size = 0;
        }
        size += len;
    }

    blocks.push(&tokens[start..]);
    blocks
}

/// Write one token through the fixed code tables.
fn write_token(writer: &mut BitWriter, token: &Token) {
    match *token {
        Token::Literal(byte) => {
            let code = literal_code(byte);
            writer.write_code(code.bits, code.len);
        }
        Token::Match { length, distance } => {
            let (len_entry, len_extra) = lookup_length(length);
            writer.write_code(len_entry.code.bits, len_entry.code.len);
            if len_entry.extra_bits > 0 {
                writer.write_bits(len_extra as u32, len_entry.extra_bits);
            }

            let (dist_entry, dist_extra) = lookup_distance(distance);
            writer.write_code(dist_entry.symbol as u16, DISTANCE_CODE_BITS);
            if dist_entry.extra_bits > 0 {
                writer.write_bits(dist_extra as u32, dist_entry.extra_bits);
            }
        }
    }
}

/// Write a complete fixed-code block.
fn write_block(writer: &mut BitWriter, tokens: &[Token], is_final: bool) {
    writer.write_bit(is_final);
    writer.write_bits(BTYPE_FIXED as u32, 2);
    for token in tokens {
        write_token(writer, token);
    }
    writer.write_code(END_OF_BLOCK.bits, END_OF_BLOCK.len);
}

/// Fixed-Huffman DEFLATE compressor.
///
/// Holds the match finder between calls, so compressing many inputs with
/// one `Deflater` avoids reallocating its hash tables.
#[derive(Debug, Default)]
pub struct Deflater {
    /// Match finder.
    finder: MatchFinder,
    /// Blocks written by the last call to [`Deflater::deflate`].
    blocks_written: usize,
}

impl Deflater {
    /// Create a new compressor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks written by the last [`Deflater::deflate`] call.
    pub fn blocks_written(&self) -> usize {
        self.blocks_written
    }

    /// Compress `data` into a raw DEFLATE stream.
    pub fn deflate(&mut self, data: &[u8]) -> Vec<u8> {
        let tokens = self.finder.find_tokens(data);
        let matches = tokens.iter().filter(|t| t.is_match()).count();
        debug!(
            input_len = data.len(),
            tokens = tokens.len(),
            matches,
            "tokenized input"
        );

        let blocks = partition_blocks(&tokens);
        let mut writer = BitWriter::with_capacity(data.len() / 2 + 16);
        let last = blocks.len() - 1;

        for (index, block) in blocks.iter().enumerate() {
            let start_bit = writer.bits_written();
            write_block(&mut writer, block, index == last);
            trace!(
                index,
                tokens = block.len(),
                bits = writer.bits_written() - start_bit,
                is_final = index == last,
                "wrote fixed block"
            );
        }

        self.blocks_written = blocks.len();
        let output = writer.finish();
        debug!(
            blocks = self.blocks_written,
            output_len = output.len(),
            "deflate finished"
        );
        output
    }
}

/// Compress `data` into a raw fixed-Huffman DEFLATE stream.
pub fn deflate(data: &[u8]) -> Vec<u8> {
    Deflater::new().deflate(data)
}

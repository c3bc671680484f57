//! Bit-level I/O for the DEFLATE bit stream.
//!
//! This module provides `BitWriter` and `BitReader` for packing and
//! unpacking bits into bytes.
//!
//! # Bit Ordering
//!
//! DEFLATE fills every byte starting from its least significant bit. Plain
//! fields (block header bits, extra bits) are stored least significant bit
//! first. Huffman codes are the exception: they are stored starting with
//! their most significant bit, which is what [`BitWriter::write_code`] and
//! [`BitReader::read_code`] handle.
//!
//! # Example
//!
//! ```
//! use fixflate_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b1100, 4);
//! let output = writer.finish();
//!
//! let mut reader = BitReader::new(&output);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{FlateError, Result};

/// Reverse the low `length` bits of `value`.
#[inline]
pub fn reverse_bits(mut value: u32, length: u8) -> u32 {
    let mut result = 0u32;
    for _ in 0..length {
        result = (result << 1) | (value & 1);
        value >>= 1;
    }
    result
}

/// A bit-level reader over a byte slice.
///
/// Bits are handed out in the order a [`BitWriter`] stored them. Running
/// out of input is reported as [`FlateError::TruncatedStream`].
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source bytes.
    data: &'a [u8],
    /// Index of the next byte to load into the buffer.
    pos: usize,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits consumed (for error reporting).
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a new `BitReader` over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Get the current bit position.
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of bits that can still be read.
    pub fn bits_remaining(&self) -> u64 {
        (self.data.len() - self.pos) as u64 * 8 + self.bits_in_buffer as u64
    }

    /// Number of input bytes touched so far, counting a partially read byte.
    pub fn bytes_consumed(&self) -> usize {
        self.total_bits_read.div_ceil(8) as usize
    }

    /// Ensure at least `count` bits are available in the buffer.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        debug_assert!(count <= 32, "Cannot fill more than 32 bits at once");

        while self.bits_in_buffer < count {
            let Some(&byte) = self.data.get(self.pos) else {
                return Err(FlateError::truncated(self.total_bits_read));
            };
            self.buffer |= (byte as u64) << self.bits_in_buffer;
            self.bits_in_buffer += 8;
            self.pos += 1;
        }

        Ok(())
    }

    /// Read up to 32 bits from the stream.
    ///
    /// The first bit read lands in the least significant position of the
    /// result.
    #[inline]
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        let value = self.peek_bits(count)?;
        self.consume(count);
        Ok(value)
    }

    /// Peek at up to 32 bits without consuming them.
    #[inline]
    pub fn peek_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot peek more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let mask = (1u64 << count).wrapping_sub(1);
        Ok((self.buffer & mask) as u32)
    }

    /// Skip a number of bits.
    pub fn skip_bits(&mut self, count: u8) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        self.fill_buffer(count)?;
        self.consume(count);

        Ok(())
    }

    #[inline]
    fn consume(&mut self, count: u8) {
        self.buffer >>= count;
        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Read a `length`-bit Huffman code stored most significant bit first.
    #[inline]
    pub fn read_code(&mut self, length: u8) -> Result<u16> {
        let raw = self.read_bits(length)?;
        Ok(reverse_bits(raw, length) as u16)
    }

    /// Align to the next byte boundary by discarding partial bits.
    pub fn align_to_byte(&mut self) {
        let remainder = (self.total_bits_read % 8) as u8;
        if remainder > 0 {
            // The partial byte is always fully loaded into the buffer.
            self.consume(8 - remainder);
        }
    }
}

/// A bit-level writer that packs bits into an owned byte buffer.
///
/// Bytes are filled from the least significant bit upward and moved to the
/// output as soon as 8 bits have accumulated. [`finish`](Self::finish)
/// zero-pads the final partial byte.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Packed output.
    output: Vec<u8>,
    /// Bit buffer (LSB-first).
    buffer: u64,
    /// Number of bits in buffer.
    bits_in_buffer: u8,
    /// Total bits written.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create a new, empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `BitWriter` with room for `capacity` output bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Get the total number of bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Move complete bytes from the buffer to the output.
    #[inline]
    fn flush_bytes(&mut self) {
        if self.bits_in_buffer >= 32 {
            let word = (self.buffer & 0xFFFF_FFFF) as u32;
            self.output.extend_from_slice(&word.to_le_bytes());
            self.buffer >>= 32;
            self.bits_in_buffer -= 32;
        }

        while self.bits_in_buffer >= 8 {
            self.output.push((self.buffer & 0xFF) as u8);
            self.buffer >>= 8;
            self.bits_in_buffer -= 8;
        }
    }

    /// Write the low `count` bits of `value` (0-32), least significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        if count == 0 {
            return;
        }

        let mask = if count == 32 {
            u32::MAX
        } else {
            (1u32 << count).wrapping_sub(1)
        };

        self.buffer |= ((value & mask) as u64) << self.bits_in_buffer;
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        self.flush_bytes();
    }

    /// Write a single bit.
    #[inline(always)]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u32, 1);
    }

    /// Write a `length`-bit Huffman code, most significant bit first.
    #[inline]
    pub fn write_code(&mut self, code: u16, length: u8) {
        self.write_bits(reverse_bits(code as u32, length), length);
    }

    /// Pad to byte boundary with zeros.
    pub fn align_to_byte(&mut self) {
        if self.bits_in_buffer % 8 != 0 {
            let padding = 8 - (self.bits_in_buffer % 8);
            self.write_bits(0, padding);
        }
    }

    /// Zero-pad the last partial byte and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.flush_bytes();
        self.output
    }
}

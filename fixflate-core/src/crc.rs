//! CRC-32 (ISO 3309) as used by the GZIP trailer.
//!
//! - Polynomial: 0x04C11DB7 (reflected: 0xEDB88320)
//! - Initial value: 0xFFFFFFFF
//! - Final XOR: 0xFFFFFFFF
//!
//! ## Performance Optimization
//!
//! Inputs of 16 bytes or more are processed with the "slicing-by-8"
//! technique: eight lookup tables derived from the base table let the loop
//! consume 8 bytes per step. Shorter inputs use the byte-at-a-time loop.
//! Both produce identical values.

/// Reflected CRC-32 polynomial.
pub const CRC32_POLYNOMIAL: u32 = 0xEDB88320;

/// Accumulator start value; also XORed into the result.
const CRC32_INIT: u32 = 0xFFFFFFFF;

/// Build the 256-entry CRC-32 lookup table.
///
/// Entry `i` is `i` run through eight rounds of
/// `crc = (crc >> 1) ^ (POLY if crc & 1 else 0)`.
pub const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;
        while j < 8 {
            crc = (crc >> 1) ^ if crc & 1 != 0 { CRC32_POLYNOMIAL } else { 0 };
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// CRC-32 lookup table (polynomial 0xEDB88320, reflected).
pub const CRC32_TABLE: [u32; 256] = make_table();

/// Slicing-by-8 tables: `SLICES[k][b]` is the CRC of byte `b` followed by
/// `k` zero bytes.
const SLICES: [[u32; 256]; 8] = {
    let mut slices = [CRC32_TABLE; 8];
    let mut k = 1;
    while k < 8 {
        let mut b = 0usize;
        while b < 256 {
            let prev = slices[k - 1][b];
            slices[k][b] = (prev >> 8) ^ CRC32_TABLE[(prev & 0xFF) as usize];
            b += 1;
        }
        k += 1;
    }
    slices
};

/// CRC-32 accumulator.
///
/// # Example
///
/// ```
/// use fixflate_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.finalize(), 0xEC4AC3D0);
/// ```
#[derive(Debug, Clone)]
pub struct Crc32 {
    crc: u32,
}

impl Crc32 {
    /// Create a new CRC-32 calculator.
    pub fn new() -> Self {
        Self { crc: CRC32_INIT }
    }

    /// Reset the CRC to its initial state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Update the CRC with more data.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.crc = match data.len() {
            0..16 => update_bytewise(self.crc, data),
            _ => update_slice8(self.crc, data),
        };
    }

    /// Get the current CRC value (without finalizing).
    #[inline(always)]
    pub fn value(&self) -> u32 {
        self.crc ^ CRC32_INIT
    }

    /// Finalize and return the CRC value.
    #[inline(always)]
    pub fn finalize(self) -> u32 {
        self.crc ^ CRC32_INIT
    }

    /// Compute CRC-32 for a slice in one call.
    #[inline]
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the CRC-32 of `data`.
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    Crc32::compute(data)
}

/// Byte-at-a-time CRC-32 update.
#[inline]
fn update_bytewise(crc: u32, data: &[u8]) -> u32 {
    data.iter().fold(crc, |acc, &byte| {
        (acc >> 8) ^ CRC32_TABLE[((acc ^ byte as u32) & 0xFF) as usize]
    })
}

/// Slicing-by-8 CRC-32 update.
#[inline]
fn update_slice8(crc: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(8);
    let mut acc = crc;

    for chunk in &mut chunks {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        let word = u64::from_le_bytes(word) ^ acc as u64;

        acc = (0..8).fold(0, |sum, k| {
            sum ^ SLICES[7 - k][((word >> (8 * k)) & 0xFF) as usize]
        });
    }

    update_bytewise(acc, chunks.remainder())
}

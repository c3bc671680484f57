//! GZIP member header parsing and writing (RFC 1952 section 2.3).

use fixflate_core::Crc32;
use fixflate_core::error::{FlateError, IntegrityField, Result};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// GZIP magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// GZIP compression method: DEFLATE.
pub const CM_DEFLATE: u8 = 8;

/// Size of the fixed part of the header.
pub const FIXED_HEADER_LEN: usize = 10;

/// Size of the CRC-32 + ISIZE trailer.
pub const TRAILER_LEN: usize = 8;

/// OS byte for "unknown".
pub const OS_UNKNOWN: u8 = 255;

/// GZIP header flags.
pub mod flags {
    /// Text file.
    pub const FTEXT: u8 = 0x01;
    /// Header CRC present.
    pub const FHCRC: u8 = 0x02;
    /// Extra field present.
    pub const FEXTRA: u8 = 0x04;
    /// Original filename present.
    pub const FNAME: u8 = 0x08;
    /// Comment present.
    pub const FCOMMENT: u8 = 0x10;
    /// Bits that must be zero.
    pub const RESERVED: u8 = 0xE0;
}

/// GZIP member header.
///
/// The FNAME, FCOMMENT and FEXTRA bits of `flags` are derived from the
/// optional fields when the header is written; only FTEXT and FHCRC are
/// taken from `flags` as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzipHeader {
    /// Compression method (8 for DEFLATE).
    pub method: u8,
    /// Flag byte.
    pub flags: u8,
    /// Modification time (Unix timestamp, 0 if unknown).
    pub mtime: u32,
    /// Extra flags.
    pub xfl: u8,
    /// Operating system.
    pub os: u8,
    /// Extra field payload (FEXTRA).
    pub extra: Option<Vec<u8>>,
    /// Original file name (FNAME).
    pub file_name: Option<String>,
    /// Comment (FCOMMENT).
    pub comment: Option<String>,
    /// Header CRC-16 (FHCRC), as stored or as written.
    pub header_crc: Option<u16>,
}

impl Default for GzipHeader {
    fn default() -> Self {
        Self {
            method: CM_DEFLATE,
            flags: 0,
            mtime: 0,
            xfl: 0,
            os: OS_UNKNOWN,
            extra: None,
            file_name: None,
            comment: None,
            header_crc: None,
        }
    }
}

impl GzipHeader {
    /// Create a header with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a header carrying a file name.
    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            ..Self::default()
        }
    }

    /// Set the modification time.
    pub fn with_mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    /// Set the modification time to now.
    pub fn with_mtime_now(mut self) -> Self {
        self.mtime = unix_now();
        self
    }

    /// Request a header CRC-16 when writing.
    pub fn with_header_crc(mut self) -> Self {
        self.flags |= flags::FHCRC;
        self
    }

    /// Flag byte as it will be written.
    pub fn effective_flags(&self) -> u8 {
        let mut flg = self.flags & (flags::FTEXT | flags::FHCRC);
        if self.extra.is_some() {
            flg |= flags::FEXTRA;
        }
        if self.file_name.is_some() {
            flg |= flags::FNAME;
        }
        if self.comment.is_some() {
            flg |= flags::FCOMMENT;
        }
        flg
    }

    /// Append the encoded header to `out`.
    ///
    /// Fails with [`FlateError::InvalidFileName`] if the name contains a NUL
    /// byte, and with [`FlateError::MalformedHeader`] for a comment with a
    /// NUL byte or an extra field longer than 65535 bytes.
    pub fn write(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        let flg = self.effective_flags();

        out.extend_from_slice(&GZIP_MAGIC);
        out.push(self.method);
        out.push(flg);
        out.extend_from_slice(&self.mtime.to_le_bytes());
        out.push(self.xfl);
        out.push(self.os);

        if let Some(extra) = &self.extra {
            let xlen = u16::try_from(extra.len()).map_err(|_| {
                FlateError::malformed_header(format!(
                    "extra field is {} bytes, at most 65535 allowed",
                    extra.len()
                ))
            })?;
            out.extend_from_slice(&xlen.to_le_bytes());
            out.extend_from_slice(extra);
        }

        if let Some(name) = &self.file_name {
            if name.as_bytes().contains(&0) {
                return Err(FlateError::invalid_file_name(format!(
                    "{:?} contains a NUL byte",
                    name
                )));
            }
            out.extend_from_slice(name.as_bytes());
            out.push(0);
        }

        if let Some(comment) = &self.comment {
            if comment.as_bytes().contains(&0) {
                return Err(FlateError::malformed_header("comment contains a NUL byte"));
            }
            out.extend_from_slice(comment.as_bytes());
            out.push(0);
        }

        if flg & flags::FHCRC != 0 {
            let crc16 = Crc32::compute(&out[start..]) as u16;
            out.extend_from_slice(&crc16.to_le_bytes());
            self.header_crc = Some(crc16);
        }

        self.flags = flg;
        Ok(())
    }

    /// Parse a header from the start of `data`.
    ///
    /// Returns the header and its length in bytes.
    pub fn parse(data: &[u8]) -> Result<(Self, usize)> {
        if data.len() < FIXED_HEADER_LEN {
            return Err(FlateError::malformed_header(format!(
                "{} bytes is too short for a GZIP header",
                data.len()
            )));
        }

        if data[0..2] != GZIP_MAGIC {
            return Err(FlateError::malformed_header(format!(
                "bad magic {:02X} {:02X}, expected 1F 8B",
                data[0], data[1]
            )));
        }

        let method = data[2];
        if method != CM_DEFLATE {
            return Err(FlateError::malformed_header(format!(
                "compression method {} is not DEFLATE",
                method
            )));
        }

        let flg = data[3];
        if flg & flags::RESERVED != 0 {
            return Err(FlateError::malformed_header(format!(
                "reserved flag bits set: {:#04x}",
                flg & flags::RESERVED
            )));
        }

        let mut header = Self {
            method,
            flags: flg,
            mtime: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            xfl: data[8],
            os: data[9],
            ..Self::default()
        };
        let mut pos = FIXED_HEADER_LEN;

        if flg & flags::FEXTRA != 0 {
            let xlen_bytes = data
                .get(pos..pos + 2)
                .ok_or_else(|| FlateError::malformed_header("truncated extra field length"))?;
            let xlen = u16::from_le_bytes([xlen_bytes[0], xlen_bytes[1]]) as usize;
            pos += 2;
            let extra = data
                .get(pos..pos + xlen)
                .ok_or_else(|| FlateError::malformed_header("truncated extra field"))?;
            header.extra = Some(extra.to_vec());
            pos += xlen;
        }

        if flg & flags::FNAME != 0 {
            let (name, next) = read_zero_terminated(data, pos, "file name")?;
            header.file_name = Some(name);
            pos = next;
        }

        if flg & flags::FCOMMENT != 0 {
            let (comment, next) = read_zero_terminated(data, pos, "comment")?;
            header.comment = Some(comment);
            pos = next;
        }

        if flg & flags::FHCRC != 0 {
            let stored = data
                .get(pos..pos + 2)
                .ok_or_else(|| FlateError::malformed_header("truncated header CRC"))?;
            let stored = u16::from_le_bytes([stored[0], stored[1]]);
            let computed = Crc32::compute(&data[..pos]) as u16;
            if stored != computed {
                return Err(FlateError::integrity_mismatch(
                    IntegrityField::HeaderCrc16,
                    stored as u32,
                    computed as u32,
                ));
            }
            header.header_crc = Some(stored);
            pos += 2;
        }

        trace!(
            flags = flg,
            mtime = header.mtime,
            os = header.os,
            header_len = pos,
            "parsed gzip header"
        );

        Ok((header, pos))
    }
}

/// Read a zero-terminated string starting at `pos`.
///
/// Returns the string and the position just past the terminator.
fn read_zero_terminated(data: &[u8], pos: usize, what: &str) -> Result<(String, usize)> {
    let rest = &data[pos.min(data.len())..];
    let len = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| FlateError::malformed_header(format!("unterminated {}", what)))?;
    Ok((
        String::from_utf8_lossy(&rest[..len]).into_owned(),
        pos + len + 1,
    ))
}

/// Current time as a 32-bit Unix timestamp, or 0 if the clock is unusable.
pub(crate) fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| u32::try_from(d.as_secs()).ok())
        .unwrap_or(0)
}

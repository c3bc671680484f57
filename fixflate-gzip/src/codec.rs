//! Whole-buffer GZIP encode and decode.

use crate::header::{FIXED_HEADER_LEN, GzipHeader, TRAILER_LEN, unix_now};
use fixflate_core::Crc32;
use fixflate_core::error::{FlateError, IntegrityField, Result};
use fixflate_deflate::{BlockSummary, Deflater, Inflater};
use tracing::{debug, warn};

/// Smallest possible member: fixed header, empty final block, trailer.
pub const MIN_MEMBER_LEN: usize = FIXED_HEADER_LEN + 2 + TRAILER_LEN;

/// Options for [`encode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Store `file_name` in the header (FNAME).
    pub store_filename: bool,
    /// Name to store when `store_filename` is set.
    pub file_name: String,
    /// Modification time written to the header.
    pub mtime: u32,
    /// Optional comment (FCOMMENT).
    pub comment: Option<String>,
}

impl EncodeOptions {
    /// Create options with nothing stored and MTIME 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `file_name` in the header.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.store_filename = true;
        self.file_name = file_name.into();
        self
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

    /// Store a comment in the header.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    fn header(&self) -> GzipHeader {
        GzipHeader {
            mtime: self.mtime,
            file_name: self.store_filename.then(|| self.file_name.clone()),
            comment: self.comment.clone(),
            ..GzipHeader::default()
        }
    }
}

/// Result of a successful [`decode`].
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Decompressed bytes.
    pub data: Vec<u8>,
    /// Parsed member header.
    pub header: GzipHeader,
    /// Size of the DEFLATE payload in bytes.
    pub payload_len: usize,
    /// Blocks of the DEFLATE payload.
    pub blocks: Vec<BlockSummary>,
}

impl Decoded {
    /// Stored file name, or `""` when none was stored.
    pub fn file_name(&self) -> &str {
        self.header.file_name.as_deref().unwrap_or("")
    }

    /// Split into the data and the stored file name.
    pub fn into_parts(self) -> (Vec<u8>, String) {
        (self.data, self.header.file_name.unwrap_or_default())
    }
}

/// Compress `raw` into a complete GZIP member.
///
/// # Example
///
/// ```
/// use fixflate_gzip::{EncodeOptions, decode, encode};
///
/// let options = EncodeOptions::new().with_file_name("hello.txt");
/// let gz = encode(b"hello, hello, hello", &options).unwrap();
///
/// let (data, name) = decode(&gz).unwrap().into_parts();
/// assert_eq!(data, b"hello, hello, hello");
/// assert_eq!(name, "hello.txt");
/// ```
pub fn encode(raw: &[u8], options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut header = options.header();
    let mut out = Vec::with_capacity(raw.len() / 2 + 64);
    header.write(&mut out)?;
    let header_len = out.len();

    let mut deflater = Deflater::new();
    out.extend_from_slice(&deflater.deflate(raw));
    let payload_len = out.len() - header_len;

    let crc = Crc32::compute(raw);
    out.extend_from_slice(&crc.to_le_bytes());
    // ISIZE is the length modulo 2^32.
    out.extend_from_slice(&(raw.len() as u32).to_le_bytes());

    debug!(
        input_len = raw.len(),
        header_len,
        payload_len,
        blocks = deflater.blocks_written(),
        crc,
        "encoded gzip member"
    );

    Ok(out)
}

/// Decompress a GZIP member and verify its trailer.
///
/// Nothing is returned unless the CRC-32 and ISIZE fields match the
/// decoded data.
pub fn decode(bytes: &[u8]) -> Result<Decoded> {
    let (header, header_len) = GzipHeader::parse(bytes)?;

    if bytes.len() < header_len + TRAILER_LEN {
        return Err(FlateError::truncated(bytes.len() as u64 * 8));
    }

    let trailer_start = bytes.len() - TRAILER_LEN;
    let payload = &bytes[header_len..trailer_start];

    let mut inflater = Inflater::new();
    let data = inflater.inflate(payload)?;

    let consumed = inflater.bytes_consumed();
    if consumed < payload.len() {
        warn!(
            unused = payload.len() - consumed,
            "ignoring bytes between the DEFLATE stream and the trailer"
        );
    }

    let trailer = &bytes[trailer_start..];
    let expected_crc = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let expected_size = u32::from_le_bytes([trailer[4], trailer[5], trailer[6], trailer[7]]);

    let computed_crc = Crc32::compute(&data);
    if computed_crc != expected_crc {
        return Err(FlateError::integrity_mismatch(
            IntegrityField::Crc32,
            expected_crc,
            computed_crc,
        ));
    }

    let computed_size = data.len() as u32;
    if computed_size != expected_size {
        return Err(FlateError::integrity_mismatch(
            IntegrityField::Size,
            expected_size,
            computed_size,
        ));
    }

    debug!(
        output_len = data.len(),
        payload_len = payload.len(),
        blocks = inflater.blocks().len(),
        file_name = header.file_name.as_deref().unwrap_or(""),
        "decoded gzip member"
    );

    Ok(Decoded {
        data,
        header,
        payload_len: payload.len(),
        blocks: inflater.blocks().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single_byte() {
        let gz = encode(b"a", &EncodeOptions::new()).unwrap();
        assert_eq!(
            gz,
            [
                0x1F, 0x8B, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, // header
                0x4B, 0x04, 0x00, // payload
                0x43, 0xBE, 0xB7, 0xE8, // CRC-32
                0x01, 0x00, 0x00, 0x00, // ISIZE
            ]
        );
    }

    #[test]
    fn test_empty_member() {
        let gz = encode(b"", &EncodeOptions::new()).unwrap();
        assert_eq!(gz.len(), MIN_MEMBER_LEN);

        let decoded = decode(&gz).unwrap();
        assert!(decoded.data.is_empty());
        assert_eq!(decoded.file_name(), "");
        assert_eq!(decoded.payload_len, 2);
    }

    #[test]
    fn test_options_builders() {
        let options = EncodeOptions::new()
            .with_file_name("report.csv")
            .with_mtime(1_700_000_000)
            .with_comment("quarterly");
        assert!(options.store_filename);

        let decoded = decode(&encode(b"a,b,c\n1,2,3\n", &options).unwrap()).unwrap();
        assert_eq!(decoded.file_name(), "report.csv");
        assert_eq!(decoded.header.mtime, 1_700_000_000);
        assert_eq!(decoded.header.comment.as_deref(), Some("quarterly"));
        assert_eq!(decoded.blocks.len(), 1);
    }

    #[test]
    fn test_mtime_now_is_set() {
        let options = EncodeOptions::new().with_mtime_now();
        assert!(options.mtime > 0);
    }

    #[test]
    fn test_name_not_stored_without_flag() {
        let options = EncodeOptions {
            file_name: "ignored.txt".to_string(),
            ..EncodeOptions::default()
        };
        let gz = encode(b"data", &options).unwrap();
        assert_eq!(gz[3], 0);
        assert_eq!(decode(&gz).unwrap().file_name(), "");
    }

    #[test]
    fn test_trailing_garbage_before_trailer_is_tolerated() {
        let mut gz = encode(b"payload", &EncodeOptions::new()).unwrap();
        let trailer = gz.split_off(gz.len() - TRAILER_LEN);
        gz.extend_from_slice(&[0xAA, 0xBB]);
        gz.extend_from_slice(&trailer);

        let decoded = decode(&gz).unwrap();
        assert_eq!(decoded.data, b"payload");
    }

    #[test]
    fn test_too_short_for_trailer() {
        let gz = encode(b"abc", &EncodeOptions::new()).unwrap();
        assert!(matches!(
            decode(&gz[..FIXED_HEADER_LEN + 4]),
            Err(FlateError::TruncatedStream { .. })
        ));
    }
}

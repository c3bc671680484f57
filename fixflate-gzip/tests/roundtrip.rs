//! Round trips and integrity checks for whole GZIP members.

use fixflate_core::{FlateError, IntegrityField};
use fixflate_gzip::{EncodeOptions, decode, encode};

fn roundtrip(data: &[u8], options: &EncodeOptions) -> (Vec<u8>, String) {
    let gz = encode(data, options).unwrap();
    decode(&gz).unwrap().into_parts()
}

#[test]
fn test_roundtrip_inputs() {
    let mut long_runs = vec![b'x'; 40_000];
    long_runs.extend(std::iter::repeat_n(b'y', 40_000));
    long_runs.extend_from_slice(b"tail");

    let inputs: Vec<Vec<u8>> = vec![
        Vec::new(),
        vec![0x00],
        vec![0xFF],
        (0..=255).collect(),
        long_runs,
        b"Hello, GZIP World! This is a test of compression.".repeat(100),
    ];

    for input in &inputs {
        let (data, name) = roundtrip(input, &EncodeOptions::new());
        assert_eq!(&data, input, "roundtrip failed for {} bytes", input.len());
        assert_eq!(name, "");
    }
}

#[test]
fn test_roundtrip_with_filename() {
    let options = EncodeOptions::new().with_file_name("data.txt").with_mtime_now();
    let (data, name) = roundtrip(b"Test data with filename", &options);
    assert_eq!(data, b"Test data with filename");
    assert_eq!(name, "data.txt");
}

#[test]
fn test_roundtrip_unicode_filename() {
    let options = EncodeOptions::new().with_file_name("résumé-日本.txt");
    let (_, name) = roundtrip(b"cv", &options);
    assert_eq!(name, "résumé-日本.txt");
}

#[test]
fn test_repeated_data_compresses() {
    let original = vec![b'A'; 10000];
    let gz = encode(&original, &EncodeOptions::new()).unwrap();
    assert!(gz.len() < original.len() / 10);
    assert_eq!(decode(&gz).unwrap().data, original);
}

#[test]
fn test_multi_block_member() {
    let original: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
    let gz = encode(&original, &EncodeOptions::new()).unwrap();
    let decoded = decode(&gz).unwrap();

    assert_eq!(decoded.data, original);
    assert!(decoded.blocks.len() > 1);
    assert_eq!(decoded.blocks.iter().filter(|b| b.is_final).count(), 1);
    assert!(decoded.blocks.last().is_some_and(|b| b.is_final));
}

#[test]
fn test_every_crc_bit_flip_detected() {
    let gz = encode(b"integrity matters", &EncodeOptions::new()).unwrap();
    let crc_start = gz.len() - 8;

    for byte in 0..4 {
        for bit in 0..8 {
            let mut corrupted = gz.clone();
            corrupted[crc_start + byte] ^= 1 << bit;
            assert!(
                matches!(
                    decode(&corrupted),
                    Err(FlateError::IntegrityMismatch {
                        field: IntegrityField::Crc32,
                        ..
                    })
                ),
                "flip of bit {} in CRC byte {} not detected",
                bit,
                byte
            );
        }
    }
}

#[test]
fn test_every_isize_bit_flip_detected() {
    let gz = encode(b"integrity matters", &EncodeOptions::new()).unwrap();
    let size_start = gz.len() - 4;

    for byte in 0..4 {
        for bit in 0..8 {
            let mut corrupted = gz.clone();
            corrupted[size_start + byte] ^= 1 << bit;
            assert!(matches!(
                decode(&corrupted),
                Err(FlateError::IntegrityMismatch {
                    field: IntegrityField::Size,
                    ..
                })
            ));
        }
    }
}

#[test]
fn test_bad_magic() {
    let mut gz = encode(b"abc", &EncodeOptions::new()).unwrap();
    gz[0] = 0x1E;
    assert!(matches!(decode(&gz), Err(FlateError::MalformedHeader { .. })));
}

#[test]
fn test_bad_method() {
    let mut gz = encode(b"abc", &EncodeOptions::new()).unwrap();
    gz[2] = 0x07;
    assert!(matches!(decode(&gz), Err(FlateError::MalformedHeader { .. })));
}

#[test]
fn test_stored_payload_rejected() {
    // Header, stored block "abc", trailer.
    let mut gz = vec![0x1F, 0x8B, 0x08, 0x00, 0, 0, 0, 0, 0x00, 0xFF];
    gz.extend_from_slice(&[0x01, 0x03, 0x00, 0xFC, 0xFF, b'a', b'b', b'c']);
    gz.extend_from_slice(&fixflate_core::crc32(b"abc").to_le_bytes());
    gz.extend_from_slice(&3u32.to_le_bytes());

    assert!(matches!(
        decode(&gz),
        Err(FlateError::UnsupportedBlockType { btype: 0 })
    ));
}

#[test]
fn test_cut_payload_is_truncated() {
    let gz = encode(
        b"a reasonably long sentence that spans several payload bytes",
        &EncodeOptions::new(),
    )
    .unwrap();

    // Drop the middle of the payload but keep a plausible trailer.
    let mut cut = gz[..14].to_vec();
    cut.extend_from_slice(&gz[gz.len() - 8..]);
    assert!(matches!(
        decode(&cut),
        Err(FlateError::TruncatedStream { .. })
    ));
}

#[test]
fn test_name_with_nul_rejected() {
    let options = EncodeOptions::new().with_file_name("a\0b");
    assert!(matches!(
        encode(b"x", &options),
        Err(FlateError::InvalidFileName { .. })
    ));
}

//! Info command implementation.

use crate::utils::space_savings;
use fixflate_gzip::{Decoded, decode};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Member description for `--json` output.
#[derive(Debug, Serialize)]
struct MemberInfo {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    mtime: u32,
    os: u8,
    flags: u8,
    compressed_size: usize,
    payload_size: usize,
    uncompressed_size: usize,
    savings_percent: f64,
    blocks: Vec<BlockInfo>,
}

#[derive(Debug, Serialize)]
struct BlockInfo {
    is_final: bool,
    output_len: usize,
}

impl MemberInfo {
    fn new(path: &Path, compressed_size: usize, decoded: &Decoded) -> Self {
        Self {
            file: path.display().to_string(),
            original_name: decoded.header.file_name.clone(),
            comment: decoded.header.comment.clone(),
            mtime: decoded.header.mtime,
            os: decoded.header.os,
            flags: decoded.header.flags,
            compressed_size,
            payload_size: decoded.payload_len,
            uncompressed_size: decoded.data.len(),
            savings_percent: space_savings(decoded.data.len() as u64, compressed_size as u64),
            blocks: decoded
                .blocks
                .iter()
                .map(|b| BlockInfo {
                    is_final: b.is_final,
                    output_len: b.output_len,
                })
                .collect(),
        }
    }
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(file)?;
    let decoded = decode(&bytes)?;
    let info = MemberInfo::new(file, bytes.len(), &decoded);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("GZIP Member Information");
    println!("=======================");
    println!("File: {}", info.file);
    println!("Compressed size: {} bytes", info.compressed_size);
    println!("Uncompressed size: {} bytes", info.uncompressed_size);
    if info.uncompressed_size > 0 {
        println!("Space savings: {:.1}%", info.savings_percent);
    }

    println!();
    println!("Header:");
    if let Some(name) = &info.original_name {
        println!("  Original filename: {}", name);
    }
    if let Some(comment) = &info.comment {
        println!("  Comment: {}", comment);
    }
    if info.mtime > 0 {
        println!("  Modification time: {} (Unix timestamp)", info.mtime);
    }
    println!("  Flags: {:#04x}", info.flags);
    println!("  OS: {}", info.os);

    println!();
    println!("DEFLATE payload: {} bytes", info.payload_size);
    for (index, block) in info.blocks.iter().enumerate() {
        println!(
            "  Block {}: {} bytes{}",
            index,
            block.output_len,
            if block.is_final { " (final)" } else { "" }
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixflate_gzip::{EncodeOptions, encode};

    #[test]
    fn test_member_info_json() {
        let options = EncodeOptions::new()
            .with_file_name("a.txt")
            .with_mtime(1_600_000_000);
        let gz = encode(&b"abc".repeat(100), &options).unwrap();
        let decoded = decode(&gz).unwrap();

        let info = MemberInfo::new(Path::new("a.txt.gz"), gz.len(), &decoded);
        let value = serde_json::to_value(&info).unwrap();

        assert_eq!(value["original_name"], "a.txt");
        assert_eq!(value["mtime"], 1_600_000_000);
        assert_eq!(value["uncompressed_size"], 300);
        assert_eq!(value["os"], 255);
        assert_eq!(value["blocks"][0]["is_final"], true);
        assert!(value.get("comment").is_none());
    }
}

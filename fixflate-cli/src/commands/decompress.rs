//! Decompress command implementation.

use crate::utils::{create_progress_bar, decompressed_path, restore_mtime, write_output};
use fixflate_gzip::decode;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for the decompress command.
#[derive(Debug, Clone, Default)]
pub struct DecompressOptions {
    /// Explicit output path (single input only).
    pub output: Option<PathBuf>,
    /// Overwrite existing output files.
    pub force: bool,
    /// Show a progress bar across inputs.
    pub progress: bool,
    /// Print per-file results.
    pub verbose: bool,
}

pub fn cmd_decompress(
    files: &[PathBuf],
    options: &DecompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if options.output.is_some() && files.len() > 1 {
        return Err("--output can only be used with a single input file".into());
    }

    let pb = create_progress_bar(files.len() as u64, options.progress);

    for file in files {
        pb.set_message(file.display().to_string());

        let (target, written) = decompress_file(file, options)?;
        if options.verbose {
            pb.suspend(|| {
                println!(
                    "{} -> {} ({} bytes)",
                    file.display(),
                    target.display(),
                    written
                );
            });
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}

fn decompress_file(
    input: &Path,
    options: &DecompressOptions,
) -> Result<(PathBuf, usize), Box<dyn std::error::Error>> {
    let bytes = fs::read(input)?;
    let decoded = decode(&bytes).map_err(|e| format!("{}: {}", input.display(), e))?;

    let target = options
        .output
        .clone()
        .unwrap_or_else(|| decompressed_path(input, decoded.file_name()));

    write_output(&target, &decoded.data, options.force)?;
    if let Err(e) = restore_mtime(&target, decoded.header.mtime) {
        warn!(path = %target.display(), error = %e, "could not restore modification time");
    }

    info!(
        input = %input.display(),
        output = %target.display(),
        size = decoded.data.len(),
        "decompressed"
    );

    Ok((target, decoded.data.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::compress::{CompressOptions, cmd_compress};
    use tempfile::tempdir;

    #[test]
    fn test_compress_then_decompress_restores_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        let content = b"one two three, one two three, one two three\n".repeat(20);
        fs::write(&input, &content).unwrap();

        cmd_compress(std::slice::from_ref(&input), &CompressOptions::default()).unwrap();
        let gz = dir.path().join("notes.txt.gz");
        assert!(gz.exists());

        // The stored name points back at the original, which already exists.
        let err = cmd_decompress(std::slice::from_ref(&gz), &DecompressOptions::default());
        assert!(err.is_err());

        fs::remove_file(&input).unwrap();
        cmd_decompress(std::slice::from_ref(&gz), &DecompressOptions::default()).unwrap();
        assert_eq!(fs::read(&input).unwrap(), content);
    }

    #[test]
    fn test_no_name_strips_suffix() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("data.bin");
        fs::write(&input, [0u8, 1, 2, 3, 255]).unwrap();

        let options = CompressOptions {
            output: Some(dir.path().join("renamed.gz")),
            no_name: true,
            ..CompressOptions::default()
        };
        cmd_compress(std::slice::from_ref(&input), &options).unwrap();

        let gz = dir.path().join("renamed.gz");
        let decoded = fixflate_gzip::decode(&fs::read(&gz).unwrap()).unwrap();
        assert_eq!(decoded.file_name(), "");
        assert_eq!(decoded.header.mtime, 0);

        cmd_decompress(std::slice::from_ref(&gz), &DecompressOptions::default()).unwrap();
        assert_eq!(
            fs::read(dir.path().join("renamed")).unwrap(),
            [0u8, 1, 2, 3, 255]
        );
    }

    #[test]
    fn test_output_requires_single_input() {
        let options = DecompressOptions {
            output: Some(PathBuf::from("out")),
            ..DecompressOptions::default()
        };
        let files = [PathBuf::from("a.gz"), PathBuf::from("b.gz")];
        assert!(cmd_decompress(&files, &options).is_err());
    }

    #[test]
    fn test_corrupt_input_writes_nothing() {
        let dir = tempdir().unwrap();
        let gz = dir.path().join("bad.gz");
        let mut bytes = fixflate_gzip::encode(b"payload", &Default::default()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        fs::write(&gz, &bytes).unwrap();

        assert!(cmd_decompress(std::slice::from_ref(&gz), &DecompressOptions::default()).is_err());
        assert!(!dir.path().join("bad").exists());
    }
}

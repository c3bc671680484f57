//! Compress command implementation.

use crate::utils::{compressed_path, create_progress_bar, space_savings, stored_name, write_output};
use fixflate_gzip::{EncodeOptions, encode};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for the compress command.
#[derive(Debug, Clone, Default)]
pub struct CompressOptions {
    /// Explicit output path (single input only).
    pub output: Option<PathBuf>,
    /// Do not store the file name or modification time.
    pub no_name: bool,
    /// Overwrite existing output files.
    pub force: bool,
    /// Show a progress bar across inputs.
    pub progress: bool,
    /// Print per-file statistics.
    pub verbose: bool,
}

pub fn cmd_compress(
    files: &[PathBuf],
    options: &CompressOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    if options.output.is_some() && files.len() > 1 {
        return Err("--output can only be used with a single input file".into());
    }

    let pb = create_progress_bar(files.len() as u64, options.progress);

    for file in files {
        pb.set_message(file.display().to_string());

        let target = options
            .output
            .clone()
            .unwrap_or_else(|| compressed_path(file));
        let (original, compressed) = compress_file(file, &target, options)?;

        if options.verbose {
            pb.suspend(|| {
                println!(
                    "{} -> {} ({} -> {} bytes, {:.1}% saved)",
                    file.display(),
                    target.display(),
                    original,
                    compressed,
                    space_savings(original, compressed)
                );
            });
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    Ok(())
}

fn compress_file(
    input: &Path,
    target: &Path,
    options: &CompressOptions,
) -> Result<(u64, u64), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;

    let encode_options = if options.no_name {
        EncodeOptions::new()
    } else {
        EncodeOptions::new()
            .with_file_name(stored_name(input))
            .with_mtime_now()
    };

    let gz = encode(&data, &encode_options)?;
    write_output(target, &gz, options.force)?;

    info!(
        input = %input.display(),
        output = %target.display(),
        original = data.len(),
        compressed = gz.len(),
        "compressed"
    );

    Ok((data.len() as u64, gz.len() as u64))
}

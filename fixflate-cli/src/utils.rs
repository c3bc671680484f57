//! Utility functions for the CLI.

use filetime::FileTime;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix appended by `compress`.
pub const GZ_SUFFIX: &str = "gz";

/// Suffix used by `decompress` when no better name is known.
pub const FALLBACK_SUFFIX: &str = "ungz";

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb
}

/// Append `.suffix` to the full file name of `path`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Default output path for compressing `input`: `<input>.gz`.
pub fn compressed_path(input: &Path) -> PathBuf {
    with_suffix(input, GZ_SUFFIX)
}

/// Name stored in the header when compressing `input`.
pub fn stored_name(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Default output path for decompressing `input`.
///
/// Uses the stored name, reduced to its final component and placed next to
/// the input. Otherwise strips a `.gz` suffix, and as a last resort appends
/// `.ungz`. Never returns `input` itself.
pub fn decompressed_path(input: &Path, stored_name: &str) -> PathBuf {
    let from_header = Path::new(stored_name)
        .file_name()
        .map(|base| input.with_file_name(base))
        .filter(|candidate| candidate != input);
    if let Some(path) = from_header {
        return path;
    }

    let has_gz_suffix = input.extension().is_some_and(|ext| ext == GZ_SUFFIX)
        && input.file_stem().is_some_and(|stem| !stem.is_empty());
    if has_gz_suffix {
        return input.with_extension("");
    }

    with_suffix(input, FALLBACK_SUFFIX)
}

/// Write `data` to `path`, refusing to replace an existing file unless
/// `force` is set.
pub fn write_output(path: &Path, data: &[u8], force: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            io::Error::new(
                e.kind(),
                format!("{} already exists (use --force to overwrite)", path.display()),
            )
        } else {
            e
        }
    })?;
    file.write_all(data)?;
    file.flush()
}

/// Set the modification time of `path` from a GZIP MTIME value.
///
/// An MTIME of 0 means "unknown" and leaves the file untouched.
pub fn restore_mtime(path: &Path, mtime: u32) -> io::Result<()> {
    if mtime == 0 {
        return Ok(());
    }
    filetime::set_file_mtime(path, FileTime::from_unix_time(mtime as i64, 0))
}

/// Percentage of space saved by compression.
pub fn space_savings(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - compressed as f64 / original as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn file_mtime(path: &Path) -> i64 {
        let meta = fs::metadata(path).unwrap();
        FileTime::from_last_modification_time(&meta).unix_seconds()
    }

    #[test]
    fn test_compressed_path() {
        assert_eq!(
            compressed_path(Path::new("dir/report.txt")),
            PathBuf::from("dir/report.txt.gz")
        );
        assert_eq!(compressed_path(Path::new("noext")), PathBuf::from("noext.gz"));
    }

    #[test]
    fn test_stored_name_is_base_name() {
        assert_eq!(stored_name(Path::new("/tmp/some/file.bin")), "file.bin");
        assert_eq!(stored_name(Path::new("plain")), "plain");
    }

    #[test]
    fn test_decompressed_path_prefers_stored_name() {
        assert_eq!(
            decompressed_path(Path::new("in/archive.gz"), "original.txt"),
            PathBuf::from("in/original.txt")
        );
    }

    #[test]
    fn test_decompressed_path_strips_directories() {
        assert_eq!(
            decompressed_path(Path::new("in/x.gz"), "../../etc/passwd"),
            PathBuf::from("in/passwd")
        );
        // ".." has no final component; fall back to stripping .gz
        assert_eq!(
            decompressed_path(Path::new("in/x.gz"), ".."),
            PathBuf::from("in/x")
        );
    }

    #[test]
    fn test_decompressed_path_fallbacks() {
        assert_eq!(
            decompressed_path(Path::new("data.txt.gz"), ""),
            PathBuf::from("data.txt")
        );
        assert_eq!(
            decompressed_path(Path::new("data.bin"), ""),
            PathBuf::from("data.bin.ungz")
        );
        assert_eq!(
            decompressed_path(Path::new(".gz"), ""),
            PathBuf::from(".gz.ungz")
        );
        // A stored name equal to the input never overwrites it.
        assert_eq!(
            decompressed_path(Path::new("same.gz"), "same.gz"),
            PathBuf::from("same")
        );
    }

    #[test]
    fn test_write_output_respects_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        write_output(&path, b"first", false).unwrap();
        let err = write_output(&path, b"second", false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"first");

        write_output(&path, b"third", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"third");
    }

    #[test]
    fn test_restore_mtime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stamped");
        fs::write(&path, b"x").unwrap();

        restore_mtime(&path, 1_600_000_000).unwrap();
        assert_eq!(file_mtime(&path), 1_600_000_000);

        // Zero leaves the time alone.
        restore_mtime(&path, 0).unwrap();
        assert_eq!(file_mtime(&path), 1_600_000_000);
    }

    #[test]
    fn test_space_savings() {
        assert_eq!(space_savings(0, 20), 0.0);
        assert!((space_savings(100, 25) - 75.0).abs() < 1e-9);
    }
}

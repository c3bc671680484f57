//! fixflate CLI
//!
//! Compresses and decompresses single files as GZIP members using fixed
//! Huffman DEFLATE blocks.

mod commands;
mod utils;

use clap::{Parser, Subcommand};
use commands::compress::CompressOptions;
use commands::decompress::DecompressOptions;
use commands::{cmd_compress, cmd_decompress, cmd_info, cmd_test};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fixflate")]
#[command(author, version, about = "Fixed-Huffman GZIP compressor")]
#[command(long_about = "
fixflate writes GZIP files whose DEFLATE payload uses only fixed Huffman
blocks, and reads files produced that way.

Examples:
  fixflate compress notes.txt
  fixflate compress --no-name -o out.gz notes.txt
  fixflate decompress notes.txt.gz
  fixflate test notes.txt.gz
  fixflate info --json notes.txt.gz
")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files to <FILE>.gz
    #[command(alias = "c")]
    Compress {
        /// Files to compress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output path (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not store the original file name and time
        #[arg(short = 'n', long)]
        no_name: bool,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress GZIP files
    #[command(alias = "d")]
    Decompress {
        /// Files to decompress
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output path (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Verify GZIP files without writing output
    #[command(alias = "t")]
    Test {
        /// Files to test
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Show header fields and sizes of a GZIP file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            no_name,
            force,
            progress,
        } => cmd_compress(
            &files,
            &CompressOptions {
                output,
                no_name,
                force,
                progress,
                verbose: cli.verbose,
            },
        ),
        Commands::Decompress {
            files,
            output,
            force,
            progress,
        } => cmd_decompress(
            &files,
            &DecompressOptions {
                output,
                force,
                progress,
                verbose: cli.verbose,
            },
        ),
        Commands::Test { files } => cmd_test(&files, cli.verbose),
        Commands::Info { file, json } => cmd_info(&file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Command-line interface definition for dump-cleaner

use crate::config::DEFAULT_CONFIG_FILE;
use clap::Parser;
use std::path::PathBuf;

/// Batch line filter for gzip-compressed database dumps
///
/// Selects dated dump files, strips configured line prefixes and generated
/// trigger blocks, and writes a cleaned `parsed_*` copy of each.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dump-cleaner",
    version,
    about = "Batch line filter for gzip-compressed database dumps",
    long_about = r#"
Reads a JSON configuration (config.json by default):

    { "Files": ["shop", "audit"], "Remove": ["-- ", "LOCK TABLES"], "FilesDir": "./dumps" }

Every file in FilesDir named <Files entry>_YYYY-MM-DD... is decompressed, lines
starting with any Remove entry are dropped, generated trigger blocks are
suppressed, and the result is written as parsed_<name> (gzip) to the output
directory.

EXAMPLES:
    # Clean with ./config.json, outputs in the working directory
    dump-cleaner

    # Alternate config, outputs elsewhere, at most 4 files at a time
    dump-cleaner --config nightly.json --output-dir cleaned -t 4

    # Show what would be processed
    dump-cleaner --dry-run
"#
)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Input directory (overrides FilesDir)
    #[arg(long, value_name = "DIR")]
    pub files_dir: Option<PathBuf>,

    /// Output directory (default: current directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Maximum files processed at once (default: number of CPUs)
    #[arg(short = 't', long, value_name = "NUM", value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Select each file at most once even if several patterns match
    #[arg(long, default_value_t = false)]
    pub dedup: bool,

    /// Exit with status 2 if any file failed or was only partially written
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Dry run - list selected files without writing anything
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Get output directory, defaulting to current directory
    pub fn get_output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Worker pool size, ignoring a zero request
    pub fn get_threads(&self) -> Option<usize> {
        self.threads.filter(|&n| n > 0)
    }
}

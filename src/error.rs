//! Error types
//!
//! Every failure a single run can hit, grouped the way the tool reacts to them:
//! configuration problems fall back to defaults, selection problems stop the run,
//! and per-file problems only ever affect the file they belong to.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for library operations
pub type Result<T> = std::result::Result<T, CleanerError>;

#[derive(Error, Debug)]
pub enum CleanerError {
    /// Configuration file could not be read
    #[error("cannot read configuration '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid JSON for the expected schema
    #[error("malformed configuration '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Input directory could not be listed
    #[error("cannot read directory '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A file name pattern could not be compiled
    #[error("invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Input file could not be opened
    #[error("cannot open input '{path}': {source}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be created
    #[error("cannot create output '{path}': {source}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or decompressing the input stream failed mid-way
    #[error("read failed after {line} lines: {source}")]
    Read {
        line: u64,
        #[source]
        source: io::Error,
    },

    /// Writing or finalizing the compressed output failed
    #[error("write to '{path}' failed: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A pipeline worker stopped without reporting
    #[error("pipeline for '{name}' terminated without a result")]
    Aborted { name: String },
}

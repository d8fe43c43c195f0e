//! Output management module
//!
//! Writes cleaned lines into a gzip-compressed output file.

use crate::error::{CleanerError, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prefix added to every output file name
pub const OUTPUT_PREFIX: &str = "parsed_";

/// Buffer size for the file under the encoder (256KB)
const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Compressed output writer
pub struct GzOutputWriter {
    encoder: GzEncoder<BufWriter<File>>,
    path: PathBuf,
}

impl GzOutputWriter {
    /// Create (or truncate) the output file
    pub fn create(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| CleanerError::CreateOutput {
                path: path.clone(),
                source,
            })?;

        let writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);

        Ok(Self {
            encoder: GzEncoder::new(writer, Compression::default()),
            path,
        })
    }

    /// Write a line verbatim, delimiter included
    pub fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.encoder
            .write_all(line)
            .map_err(|source| CleanerError::Write {
                path: self.path.clone(),
                source,
            })
    }

    /// Flush the gzip trailer and the file buffer
    pub fn finish(self) -> Result<PathBuf> {
        let Self { encoder, path } = self;

        let finished = encoder
            .finish()
            .and_then(|mut writer| writer.flush().map(|_| writer));
        match finished {
            Ok(_) => Ok(path),
            Err(source) => Err(CleanerError::Write { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Generate the output file name for an input file name
pub fn output_name(input: &str) -> String {
    format!("{}{}", OUTPUT_PREFIX, input)
}

/// Ensure output directory exists
pub fn ensure_output_dir(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::TempDir;

    fn gunzip(path: &Path) -> String {
        let mut out = String::new();
        GzDecoder::new(File::open(path).unwrap())
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_output_writer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.gz");

        let mut writer = GzOutputWriter::create(path.clone()).unwrap();
        writer.write_line(b"hello\n").unwrap();
        writer.write_line(b"world").unwrap();

        let written = writer.finish().unwrap();
        assert_eq!(written, path);
        assert_eq!(gunzip(&path), "hello\nworld");
    }

    #[test]
    fn test_empty_output_is_valid_gzip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.gz");

        GzOutputWriter::create(path.clone()).unwrap().finish().unwrap();
        assert_eq!(gunzip(&path), "");
    }

    #[test]
    fn test_create_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.gz");
        std::fs::write(&path, vec![b'x'; 4096]).unwrap();

        let mut writer = GzOutputWriter::create(path.clone()).unwrap();
        writer.write_line(b"new\n").unwrap();
        writer.finish().unwrap();
        assert_eq!(gunzip(&path), "new\n");
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = GzOutputWriter::create(temp_dir.path().join("nope").join("out.gz"));
        assert!(matches!(result, Err(CleanerError::CreateOutput { .. })));
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("dump_2024-01-01.sql.gz"), "parsed_dump_2024-01-01.sql.gz");
    }
}

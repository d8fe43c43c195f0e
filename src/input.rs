//! Compressed input reading
//!
//! Opens gzip dumps and hands out their lines as raw bytes, delimiter included.

use crate::error::{CleanerError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Read buffer for decompressed data (256KB)
pub const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered reader over a decompressed gzip file
pub type GzInput = BufReader<MultiGzDecoder<File>>;

/// Open a gzip file for line reading.
///
/// Only opening can fail here; a bad gzip header surfaces on the first read.
pub fn open_gz(path: &Path) -> Result<GzInput> {
    let file = File::open(path).map_err(|source| CleanerError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(BufReader::with_capacity(
        READ_BUFFER_SIZE,
        MultiGzDecoder::new(file),
    ))
}

/// Line reader that keeps the trailing `\n` and reuses one buffer
pub struct LineReader<R: BufRead> {
    reader: R,
    line_buffer: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_buffer: Vec::with_capacity(4096),
        }
    }

    /// Next line, `None` at end of stream.
    ///
    /// A final line without a delimiter is returned as is.
    pub fn next_line(&mut self) -> Option<io::Result<&[u8]>> {
        self.line_buffer.clear();

        match self.reader.read_until(b'\n', &mut self.line_buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(self.line_buffer.as_slice())),
            Err(e) => Some(Err(e)),
        }
    }
}

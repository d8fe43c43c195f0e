//! Per-file cleaning pipeline
//!
//! Decompresses one dump, runs every line through the section skipper and the
//! prefix filter, and recompresses the survivors into `parsed_<name>`.
//!
//! A mid-stream failure still finalizes whatever was written so far. The
//! partial file is left in place; there is no temp-file-then-rename step.
//!
//! A final line without a trailing `\n` is filtered like any other line and,
//! when kept, written as is. It is not dropped, and no newline is appended.

use crate::error::{CleanerError, Result};
use crate::filter::{LineDecision, LineFilter, LineProcessor, SkipState};
use crate::input::{open_gz, LineReader};
use crate::output::{output_name, GzOutputWriter};
use std::io::BufRead;
use std::path::PathBuf;

/// Read-only settings shared by every pipeline of a run
#[derive(Debug, Clone)]
pub struct PipelineContext {
    /// Directory holding the inputs
    pub input_dir: PathBuf,
    /// Directory receiving `parsed_*` outputs
    pub output_dir: PathBuf,
    pub filter: LineFilter,
}

impl PipelineContext {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf, filter: LineFilter) -> Self {
        Self {
            input_dir,
            output_dir,
            filter,
        }
    }

    pub fn input_path(&self, name: &str) -> PathBuf {
        self.input_dir.join(name)
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(output_name(name))
    }
}

/// Line counters for one file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub read: u64,
    pub written: u64,
    pub removed: u64,
    pub skipped: u64,
}

/// Result of streaming one input through the filters
#[derive(Debug)]
pub struct StreamOutcome {
    pub counts: LineCounts,
    /// Error that ended the stream early, if any
    pub error: Option<CleanerError>,
}

/// How a file that was opened successfully ended up
#[derive(Debug)]
pub enum FileOutcome {
    /// Whole input consumed, output finalized
    Completed,
    /// Stopped early; the output holds what was written before the error
    Partial(CleanerError),
}

/// Report for a file whose input and output could both be opened
#[derive(Debug)]
pub struct FileReport {
    pub name: String,
    pub output: PathBuf,
    pub counts: LineCounts,
    /// Generated blocks encountered
    pub blocks: u64,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_complete(&self) -> bool {
        matches!(self.outcome, FileOutcome::Completed)
    }
}

/// Stream lines from `reader` through `processor`, handing kept lines to `writer`.
///
/// Lines are visited strictly in input order. Reading stops at end of stream,
/// on the first read error, or on the first write error.
pub fn filter_stream<R, F>(reader: R, processor: &mut LineProcessor<'_>, mut writer: F) -> StreamOutcome
where
    R: BufRead,
    F: FnMut(&[u8]) -> Result<()>,
{
    let mut lines = LineReader::new(reader);
    let mut counts = LineCounts::default();

    while let Some(line) = lines.next_line() {
        let line = match line {
            Ok(line) => line,
            Err(source) => {
                return StreamOutcome {
                    counts,
                    error: Some(CleanerError::Read {
                        line: counts.read,
                        source,
                    }),
                };
            }
        };
        counts.read += 1;

        match processor.decide(line) {
            LineDecision::Keep => {
                if let Err(e) = writer(line) {
                    return StreamOutcome {
                        counts,
                        error: Some(e),
                    };
                }
                counts.written += 1;
            }
            LineDecision::Skipped => counts.skipped += 1,
            LineDecision::Removed => counts.removed += 1,
        }
    }

    StreamOutcome {
        counts,
        error: None,
    }
}

/// Clean a single file end to end.
///
/// Returns `Err` only when the input or the output could not be opened; in
/// that case no output exists for this file. Every other failure is reported
/// as [`FileOutcome::Partial`].
pub fn process_file(ctx: &PipelineContext, name: &str) -> Result<FileReport> {
    let input_path = ctx.input_path(name);
    log::debug!("Opening {:?}", input_path);
    let input = open_gz(&input_path)?;

    let mut output = GzOutputWriter::create(ctx.output_path(name))?;
    let output_path = output.path().to_path_buf();

    let mut processor = LineProcessor::new(&ctx.filter);
    let stream = filter_stream(input, &mut processor, |line| output.write_line(line));
    let blocks = processor.skipper().blocks();
    if stream.error.is_none() && processor.skipper().state() == SkipState::Inside {
        log::warn!("{}: generated block not closed before end of input", name);
    }

    let finished = output.finish();

    let outcome = match (stream.error, finished) {
        (None, Ok(_)) => FileOutcome::Completed,
        (Some(e), finished) => {
            if let Err(finish_err) = finished {
                log::error!("{}: {}", name, finish_err);
            }
            FileOutcome::Partial(e)
        }
        (None, Err(e)) => FileOutcome::Partial(e),
    };

    match &outcome {
        FileOutcome::Completed => log::info!(
            "{} -> {:?}: {} of {} lines kept",
            name,
            output_path,
            stream.counts.written,
            stream.counts.read
        ),
        FileOutcome::Partial(e) => log::warn!("{} left partial output {:?}: {}", name, output_path, e),
    }

    Ok(FileReport {
        name: name.to_string(),
        output: output_path,
        counts: stream.counts,
        blocks,
        outcome,
    })
}

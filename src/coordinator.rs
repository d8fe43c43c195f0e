//! Batch coordination
//!
//! Fans out one pipeline per selected file onto a bounded worker pool and
//! waits until every pipeline has reported back.

use crate::error::{CleanerError, Result};
use crate::pipeline::{process_file, FileOutcome, FileReport, LineCounts, PipelineContext};
use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one pipeline, tagged with its position in the selection
#[derive(Debug)]
pub struct FileResult {
    pub index: usize,
    pub name: String,
    pub result: Result<FileReport>,
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        matches!(&self.result, Ok(report) if report.is_complete())
    }
}

/// Aggregated results of a batch run, in selection order
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub results: Vec<FileResult>,
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Files fully processed
    pub fn completed(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Files with a partial output left behind
    pub fn partial(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(&r.result, Ok(report) if !report.is_complete()))
            .count()
    }

    /// Files that produced no output at all
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_err()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.completed() != self.results.len()
    }

    /// Line counters summed over every file that was opened
    pub fn totals(&self) -> LineCounts {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .fold(LineCounts::default(), |acc, report| LineCounts {
                read: acc.read + report.counts.read,
                written: acc.written + report.counts.written,
                removed: acc.removed + report.counts.removed,
                skipped: acc.skipped + report.counts.skipped,
            })
    }

    /// Generated blocks skipped over every file that was opened
    pub fn blocks(&self) -> u64 {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .map(|report| report.blocks)
            .sum()
    }

    /// Failure messages per file, for the end-of-run report
    pub fn failures(&self) -> Vec<(String, String)> {
        self.results
            .iter()
            .filter_map(|r| match &r.result {
                Err(e) => Some((r.name.clone(), e.to_string())),
                Ok(FileReport {
                    outcome: FileOutcome::Partial(e),
                    ..
                }) => Some((r.name.clone(), format!("partial output: {}", e))),
                Ok(_) => None,
            })
            .collect()
    }
}

/// Progress message sent from a worker to the coordinating thread
enum PipelineEvent {
    Started(String),
    Finished(FileResult),
}

/// Runs pipelines concurrently
pub struct Coordinator {
    ctx: Arc<PipelineContext>,
    threads: usize,
}

impl Coordinator {
    /// Create a coordinator; `threads` of `None` uses one worker per CPU
    pub fn new(ctx: PipelineContext, threads: Option<usize>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            threads: threads.unwrap_or_else(num_cpus::get).max(1),
        }
    }

    /// Process every file and block until all of them are done.
    ///
    /// `on_start` and `on_done` are called on the calling thread when a worker
    /// picks a file up and when it finishes, in the order the events arrive.
    /// A failing file never stops the others.
    pub fn run<S, F>(
        &self,
        files: &[String],
        mut on_start: S,
        mut on_done: F,
    ) -> anyhow::Result<BatchSummary>
    where
        S: FnMut(&str),
        F: FnMut(&FileResult),
    {
        let start = Instant::now();
        if files.is_empty() {
            return Ok(BatchSummary::default());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads.min(files.len()))
            .thread_name(|i| format!("pipeline-{}", i))
            .panic_handler(|_| log::error!("pipeline worker panicked"))
            .build()?;

        let (tx, rx) = unbounded::<PipelineEvent>();

        for (index, name) in files.iter().enumerate() {
            let tx = tx.clone();
            let ctx = Arc::clone(&self.ctx);
            let name = name.clone();

            pool.spawn(move || {
                log::debug!("Starting pipeline for {}", name);
                // receiver outlives every worker
                let _ = tx.send(PipelineEvent::Started(name.clone()));
                let result = process_file(&ctx, &name);
                if let Err(ref e) = result {
                    log::error!("{}: {}", name, e);
                }
                let _ = tx.send(PipelineEvent::Finished(FileResult {
                    index,
                    name,
                    result,
                }));
            });
        }
        drop(tx);

        // Every sender is dropped once its pipeline ends, even on panic, so the
        // loop ends exactly when all pipelines have terminated.
        let mut slots: Vec<Option<FileResult>> = files.iter().map(|_| None).collect();
        for event in rx {
            match event {
                PipelineEvent::Started(name) => on_start(&name),
                PipelineEvent::Finished(result) => {
                    on_done(&result);
                    let index = result.index;
                    slots[index] = Some(result);
                }
            }
        }

        let results = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| FileResult {
                    index,
                    name: files[index].clone(),
                    result: Err(CleanerError::Aborted {
                        name: files[index].clone(),
                    }),
                })
            })
            .collect();

        Ok(BatchSummary {
            results,
            elapsed: start.elapsed(),
        })
    }
}

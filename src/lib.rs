//! # Dump Cleaner
//!
//! Batch line filter for gzip-compressed database dumps.
//!
//! ## Features
//!
//! - **File selection**: picks `<name>_YYYY-MM-DD*` files for each configured name
//! - **Prefix removal**: drops lines starting with any configured prefix
//! - **Generated blocks**: suppresses MySQL trigger bodies between
//!   `/*!50003 CREATE*/ /*!50017` and `END */;;`
//! - **Streaming**: gzip in, gzip out, one line in memory at a time
//! - **Parallel processing**: one pipeline per file on a bounded worker pool
//!
//! ## Example
//!
//! ```rust,no_run
//! use dump_cleaner::coordinator::Coordinator;
//! use dump_cleaner::filter::LineFilter;
//! use dump_cleaner::pipeline::PipelineContext;
//! use dump_cleaner::selector::{list_dir, FileSelector};
//! use std::path::PathBuf;
//!
//! let selector = FileSelector::new(&["shop"]).unwrap();
//! let files = selector.select(list_dir(&PathBuf::from("./dumps")).unwrap());
//!
//! let ctx = PipelineContext::new(
//!     PathBuf::from("./dumps"),
//!     PathBuf::from("."),
//!     LineFilter::new(["-- ", "LOCK TABLES"]),
//! );
//! let summary = Coordinator::new(ctx, None).run(&files, |_| {}, |_| {}).unwrap();
//! println!("{} files cleaned", summary.completed());
//! ```

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod selector;

pub use cli::Args;
pub use config::Configuration;
pub use coordinator::{BatchSummary, Coordinator};
pub use error::CleanerError;
pub use pipeline::{process_file, FileReport, PipelineContext};

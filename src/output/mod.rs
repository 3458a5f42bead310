//! Output module for run reports and dataset statistics
//!
//! This module handles:
//! - Generating markdown summaries of a run
//! - Printing run reports and snapshot statistics to stdout

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use stats::{print_run_report, print_snapshot_history, print_statistics, SnapshotStatistics};

use thiserror::Error;

/// Errors that can occur while producing reports
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

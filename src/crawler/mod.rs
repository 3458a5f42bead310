//! Scraping pipeline
//!
//! This module contains the extraction logic, including:
//! - HTTP fetching with a bounded timeout
//! - Listing and detail page parsing
//! - Detail link recovery from comment markup
//! - Request pacing and bounded-parallel scheduling
//! - Per-category orchestration and the overall run

mod comment;
mod coordinator;
mod detail;
mod fetcher;
mod listing;
mod parser;
mod runner;
mod scheduler;

pub use comment::DetailLinkPattern;
pub use coordinator::{CategoryOutcome, CategoryStats, Coordinator};
pub use detail::{parse_detail_page, ParsedDetailPage, OPENINGS_LABEL};
pub use fetcher::{build_http_client, Fetcher};
pub use listing::{parse_listing_page, ParsedListingPage};
pub use parser::stripped_text;
pub use runner::{finalize_listings, RunReport, Runner, SnapshotRecord};
pub use scheduler::{Pacer, Schedule};

use crate::config::Config;
use crate::output::generate_markdown_summary;
use crate::storage::open_stores;
use crate::ScrapeError;
use std::path::Path;

/// Runs a complete scrape
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client and pacing from the configuration
/// 2. Open the configured dataset stores
/// 3. Scrape every category
/// 4. Write one snapshot to each store
/// 5. Write the markdown run summary if configured
///
/// # Arguments
///
/// * `config` - The scraper configuration
/// * `config_hash` - Hash of the configuration file, recorded with the snapshot
///
/// # Returns
///
/// * `Ok(RunReport)` - Run completed; `retained` is the final record count
/// * `Err(ScrapeError)` - Startup or a dataset store write failed
pub async fn run_pipeline(
    config: &Config,
    config_hash: Option<&str>,
) -> Result<RunReport, ScrapeError> {
    let mut runner = Runner::new(config)?;
    if let Some(hash) = config_hash {
        runner = runner.with_config_hash(hash);
    }

    let mut stores = open_stores(&config.output, config_hash)?;
    let mut report = runner.run(&mut stores).await?;

    // The dataset is already replaced; a summary failure only shows up in the report
    if let Some(summary_path) = &config.output.summary_path {
        match generate_markdown_summary(&report, Path::new(summary_path)) {
            Ok(()) => tracing::info!("Run summary written to {}", summary_path),
            Err(e) => {
                tracing::warn!("Could not write run summary: {}", e);
                report.summary_error = Some(e.to_string());
            }
        }
    }

    Ok(report)
}

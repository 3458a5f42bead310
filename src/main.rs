//! JobYaari scraper main entry point
//!
//! This is the command-line interface for the job-listing scraper.

use anyhow::Context;
use clap::Parser;
use jobyaari_scraper::config::{load_config_with_hash, Config, ExecutionMode};
use jobyaari_scraper::crawler::{run_pipeline, Runner};
use jobyaari_scraper::output::{
    print_run_report, print_snapshot_history, print_statistics, SnapshotStatistics,
};
use jobyaari_scraper::storage::{CsvStore, DatasetStore, SqliteStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// JobYaari scraper: a polite job-listing extractor
///
/// Fetches the configured category pages, enriches every listing from its
/// detail page and writes the result as a CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "jobyaari-scraper")]
#[command(version)]
#[command(about = "A polite job-listing scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Fetch detail pages one at a time regardless of the configured mode
    #[arg(long)]
    sequential: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics of the latest dataset and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.sequential {
        config.scraper.mode = ExecutionMode::Sequential;
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        handle_scrape(&config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jobyaari_scraper=info,warn"),
            1 => EnvFilter::new("jobyaari_scraper=debug,info"),
            2 => EnvFilter::new("jobyaari_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let runner = Runner::new(config).context("Failed to prepare scraper")?;

    println!("=== JobYaari Scraper Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);
    println!("  Detail delay: {}ms", config.scraper.detail_delay_ms);
    println!("  Category delay: {}ms", config.scraper.category_delay_ms);
    match config.scraper.mode {
        ExecutionMode::Sequential => println!("  Mode: sequential"),
        ExecutionMode::Parallel => println!(
            "  Mode: parallel ({} concurrent detail fetches)",
            config.scraper.max_concurrent_details
        ),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nDetail links:");
    println!("  Prefix: {}", config.site.detail_url_prefix);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);
    if let Some(db) = &config.output.database_path {
        println!("  Database: {}", db);
    }
    if let Some(summary) = &config.output.summary_path {
        println!("  Summary: {}", summary);
    }

    println!("\nCategories ({}):", config.categories.len());
    for (name, url) in runner.category_urls() {
        println!("  - {} -> {}", name, url);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --stats mode: shows statistics of the latest stored dataset
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let store = CsvStore::new(&config.output.csv_path);
    println!("Dataset: {}\n", store.location());

    let snapshot = store
        .load_latest()
        .with_context(|| format!("Failed to read {}", store.location()))?;

    match snapshot {
        Some(snapshot) => {
            let stats = SnapshotStatistics::from_snapshot(&snapshot);
            print_statistics(&snapshot, &stats);
        }
        None => println!("No dataset has been written yet"),
    }

    if let Some(db_path) = &config.output.database_path {
        let history = SqliteStore::new(Path::new(db_path))
            .and_then(|db| db.list_snapshots())
            .with_context(|| format!("Failed to read snapshot history from {}", db_path))?;
        print_snapshot_history(&history);
    }

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: &Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Scraping {} categories ({:?} mode)",
        config.categories.len(),
        config.scraper.mode
    );

    let report = run_pipeline(config, Some(config_hash))
        .await
        .context("Scrape failed")?;

    print_run_report(&report);
    Ok(())
}

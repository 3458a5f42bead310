//! Statistics over runs and stored snapshots
//!
//! This module provides functionality for summarizing a persisted dataset
//! and for printing run reports to stdout.

use crate::crawler::RunReport;
use crate::record::{is_not_found, JobListing, COLUMNS};
use crate::storage::{Snapshot, SnapshotInfo};

/// Dataset statistics summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStatistics {
    /// Total number of listings in the snapshot
    pub total_listings: usize,

    /// Listings per category, in order of first appearance
    pub by_category: Vec<(String, usize)>,

    /// Sentinel values per column, in column order
    pub not_found_by_column: Vec<(&'static str, usize)>,
}

impl SnapshotStatistics {
    pub fn from_listings(listings: &[JobListing]) -> Self {
        let mut by_category: Vec<(String, usize)> = Vec::new();
        for listing in listings {
            match by_category.iter_mut().find(|(name, _)| *name == listing.category) {
                Some((_, count)) => *count += 1,
                None => by_category.push((listing.category.clone(), 1)),
            }
        }

        let not_found_by_column = COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let missing = listings
                    .iter()
                    .filter(|listing| is_not_found(listing.fields()[idx]))
                    .count();
                (*column, missing)
            })
            .collect();

        Self {
            total_listings: listings.len(),
            by_category,
            not_found_by_column,
        }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self::from_listings(&snapshot.listings)
    }

    /// Share of listings with a value in `column`, as a percentage
    pub fn coverage(&self, column: &str) -> Option<f64> {
        let (_, missing) = self
            .not_found_by_column
            .iter()
            .find(|(name, _)| *name == column)?;

        if self.total_listings == 0 {
            return Some(0.0);
        }
        Some((self.total_listings - missing) as f64 / self.total_listings as f64 * 100.0)
    }
}

/// Prints snapshot statistics to stdout in a formatted manner
pub fn print_statistics(snapshot: &Snapshot, stats: &SnapshotStatistics) {
    println!("=== Dataset Statistics ===\n");

    println!("Snapshot {} written {}", snapshot.id, snapshot.created_at);
    println!("  Total listings: {}", stats.total_listings);
    println!();

    println!("Listings by Category:");
    for (category, count) in &stats.by_category {
        println!("  {}: {}", category, count);
    }
    println!();

    println!("Field Coverage:");
    for (column, missing) in &stats.not_found_by_column {
        let coverage = stats.coverage(column).unwrap_or(0.0);
        println!("  {}: {:.1}% ({} not found)", column, coverage, missing);
    }
}

/// Prints the stored snapshot history, newest first
pub fn print_snapshot_history(history: &[SnapshotInfo]) {
    println!("\nSnapshot History ({}):", history.len());
    for info in history {
        println!(
            "  {} {} - {} listings{}",
            info.id,
            info.created_at,
            info.record_count,
            info.config_hash
                .as_deref()
                .map(|hash| format!(" (config {})", short_hash(hash)))
                .unwrap_or_default()
        );
    }
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(12).collect()
}

/// Prints the outcome of a run to stdout
pub fn print_run_report(report: &RunReport) {
    println!("=== Run Report ===\n");

    println!(
        "Started {} / finished {} ({}s)",
        report.started_at.to_rfc3339(),
        report.finished_at.to_rfc3339(),
        report.duration_seconds()
    );
    println!();

    println!("Categories:");
    for stats in &report.categories {
        println!(
            "  {}: {} listings, {} detail pages ({} failed, {} without openings)",
            stats.name,
            stats.fragments,
            stats.details_fetched,
            stats.detail_failures,
            stats.openings_missing
        );
    }
    for failed in &report.failed_categories {
        println!("  {}: FAILED ({})", failed.category, failed.source.kind);
    }
    println!();

    println!("Listings:");
    println!("  Collected: {}", report.collected);
    println!("  Dropped (no organization): {}", report.dropped);
    println!("  Duplicates removed: {}", report.duplicates);
    println!("  Retained: {}", report.retained);

    if !report.snapshots.is_empty() {
        println!();
        println!("Snapshots:");
        for snapshot in &report.snapshots {
            println!("  {} -> {}", snapshot.id, snapshot.location);
        }
    }

    if let Some(error) = &report.summary_error {
        println!();
        println!("Summary not written: {}", error);
    }
}

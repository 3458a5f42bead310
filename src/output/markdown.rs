//! Markdown summary generation
//!
//! This module generates human-readable markdown summaries of a run,
//! including per-category counters, failed categories and snapshot ids.

use crate::crawler::RunReport;
use crate::output::{OutputError, OutputResult};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Generates a markdown summary of a run
///
/// # Arguments
///
/// * `report` - The report of the finished run
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &RunReport, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)
        .map_err(|e| OutputError::Write(format!("{}: {}", output_path.display(), e)))?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a run report as markdown
pub fn format_markdown_summary(report: &RunReport) -> String {
    let mut md = String::new();

    md.push_str("# JobYaari Scrape Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    md.push_str("## Dataset\n\n");
    md.push_str(&format!("- **Collected**: {}\n", report.collected));
    md.push_str(&format!(
        "- **Dropped (no organization)**: {}\n",
        report.dropped
    ));
    md.push_str(&format!("- **Duplicates Removed**: {}\n", report.duplicates));
    md.push_str(&format!("- **Retained**: {}\n", report.retained));
    md.push_str(&format!(
        "- **Detail Pages Failed**: {}\n",
        report.detail_failures()
    ));
    md.push_str(&format!(
        "- **Openings Row Missing**: {}\n\n",
        report.openings_missing()
    ));

    if !report.categories.is_empty() {
        md.push_str("## Categories\n\n");
        md.push_str("| Category | Containers | Listings | Detail Links | Fetched | Failed | No Openings |\n");
        md.push_str("|----------|------------|----------|--------------|---------|--------|-------------|\n");

        for stats in &report.categories {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                stats.name,
                stats.containers,
                stats.fragments,
                stats.detail_links,
                stats.details_fetched,
                stats.detail_failures,
                stats.openings_missing
            ));
        }
        md.push('\n');
    }

    if !report.failed_categories.is_empty() {
        md.push_str("## Failed Categories\n\n");
        for failed in &report.failed_categories {
            md.push_str(&format!(
                "- **{}**: {} ({})\n",
                failed.category, failed.source.kind, failed.source.url
            ));
        }
        md.push('\n');
    }

    if !report.snapshots.is_empty() {
        md.push_str("## Snapshots\n\n");
        for snapshot in &report.snapshots {
            md.push_str(&format!("- {} `{}`\n", snapshot.id, snapshot.location));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CategoryStats, SnapshotRecord};
    use crate::storage::SnapshotId;
    use crate::{CategoryError, FetchError, FetchErrorKind};
    use chrono::{TimeZone, Utc};

    fn create_test_report() -> RunReport {
        RunReport {
            started_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            finished_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 1, 30).unwrap(),
            config_hash: Some("abc123".to_string()),
            categories: vec![CategoryStats {
                name: "Engineering".to_string(),
                url: "https://jobyaari.com/category/engineering".to_string(),
                containers: 12,
                fragments: 11,
                detail_links: 10,
                details_fetched: 9,
                detail_failures: 1,
                openings_missing: 2,
            }],
            failed_categories: vec![],
            collected: 11,
            dropped: 1,
            duplicates: 0,
            retained: 10,
            snapshots: vec![SnapshotRecord {
                location: "jobs.csv".to_string(),
                id: SnapshotId(42),
            }],
            summary_error: None,
        }
    }

    #[test]
    fn test_format_markdown_summary() {
        let report = create_test_report();
        let markdown = format_markdown_summary(&report);

        assert!(markdown.contains("# JobYaari Scrape Summary"));
        assert!(markdown.contains("- **Duration**: 90 seconds"));
        assert!(markdown.contains("- **Config Hash**: abc123"));
        assert!(markdown.contains("- **Retained**: 10"));
        assert!(markdown.contains("| Engineering | 12 | 11 | 10 | 9 | 1 | 2 |"));
        assert!(markdown.contains("- #42 `jobs.csv`"));
        assert!(!markdown.contains("Failed Categories"));
    }

    #[test]
    fn test_markdown_lists_failed_categories() {
        let mut report = create_test_report();
        report.failed_categories.push(CategoryError {
            category: "Science".to_string(),
            source: FetchError {
                url: "https://jobyaari.com/category/science".to_string(),
                kind: FetchErrorKind::Status(503),
            },
        });

        let markdown = format_markdown_summary(&report);

        assert!(markdown.contains("## Failed Categories"));
        assert!(markdown.contains("- **Science**: HTTP status 503"));
    }

    #[test]
    fn test_generate_markdown_summary_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.md");

        generate_markdown_summary(&create_test_report(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, format_markdown_summary(&create_test_report()));
    }

    #[test]
    fn test_generate_markdown_summary_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("summary.md");

        let result = generate_markdown_summary(&create_test_report(), &path);
        assert!(matches!(result, Err(OutputError::Write(_))));
    }
}

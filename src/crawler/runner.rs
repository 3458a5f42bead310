//! Pipeline runner
//!
//! Runs every configured category through the coordinator, finalizes the
//! collected listings and hands them to the dataset stores. Scraping problems
//! only shrink the result; the store write is the one failure that reaches the
//! caller.

use crate::config::{CategoryConfig, Config};
use crate::crawler::comment::DetailLinkPattern;
use crate::crawler::coordinator::{CategoryStats, Coordinator};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::scheduler::{Pacer, Schedule};
use crate::record::JobListing;
use crate::storage::{DatasetStore, SnapshotId};
use crate::{CategoryError, ScrapeError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Where a snapshot of this run was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    pub location: String,
    pub id: SnapshotId,
}

/// Observable outcome of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub config_hash: Option<String>,

    /// Per-category counters, in configuration order (failed categories excluded)
    pub categories: Vec<CategoryStats>,

    /// Categories whose listing page could not be fetched
    pub failed_categories: Vec<CategoryError>,

    /// Listings emitted by all categories
    pub collected: usize,

    /// Listings dropped for lacking an organization name
    pub dropped: usize,

    /// Exact duplicate listings removed
    pub duplicates: usize,

    /// Listings in the final dataset
    pub retained: usize,

    pub snapshots: Vec<SnapshotRecord>,

    /// Why the markdown summary could not be written, if it failed
    pub summary_error: Option<String>,
}

impl RunReport {
    fn started() -> Self {
        let now = Utc::now();
        Self {
            started_at: now,
            finished_at: now,
            config_hash: None,
            categories: Vec::new(),
            failed_categories: Vec::new(),
            collected: 0,
            dropped: 0,
            duplicates: 0,
            retained: 0,
            snapshots: Vec::new(),
            summary_error: None,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    pub fn detail_failures(&self) -> usize {
        self.categories.iter().map(|c| c.detail_failures).sum()
    }

    pub fn openings_missing(&self) -> usize {
        self.categories.iter().map(|c| c.openings_missing).sum()
    }
}

/// Applies the retention rule and removes exact duplicates
///
/// Order is preserved; the first occurrence of a duplicate wins.
///
/// # Returns
///
/// `(listings, dropped, duplicates)`
pub fn finalize_listings(listings: Vec<JobListing>) -> (Vec<JobListing>, usize, usize) {
    let mut dropped = 0;
    let mut duplicates = 0;
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(listings.len());

    for listing in listings {
        if !listing.is_retained() {
            dropped += 1;
            continue;
        }
        if !seen.insert(listing.clone()) {
            duplicates += 1;
            continue;
        }
        kept.push(listing);
    }

    (kept, dropped, duplicates)
}

/// Owns everything a run needs
pub struct Runner {
    categories: Vec<(CategoryConfig, String)>,
    fetcher: Fetcher,
    pacer: Pacer,
    pattern: DetailLinkPattern,
    schedule: Schedule,
    config_hash: Option<String>,
}

impl Runner {
    /// Builds the HTTP client, pacing and detail link pattern for `config`
    pub fn new(config: &Config) -> Result<Self, ScrapeError> {
        let fetcher = Fetcher::new(&config.user_agent, config.scraper.request_timeout())?;
        let pattern = DetailLinkPattern::new(&config.site.detail_url_prefix)?;

        let categories = config
            .categories
            .iter()
            .map(|category| {
                let url = config.site.category_url(category)?;
                Ok((category.clone(), url.to_string()))
            })
            .collect::<Result<Vec<_>, ScrapeError>>()?;

        Ok(Self {
            categories,
            fetcher,
            pacer: Pacer::from_config(&config.scraper),
            pattern,
            schedule: Schedule::from_config(&config.scraper),
            config_hash: None,
        })
    }

    /// Records the configuration hash in the run report
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Overrides the configured schedule
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Category names and listing URLs, in run order
    pub fn category_urls(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories
            .iter()
            .map(|(category, url)| (category.name.as_str(), url.as_str()))
    }

    /// Scrapes every category and finalizes the listings without persisting
    ///
    /// Never fails: unreachable categories are recorded in the report.
    pub async fn scrape(&self) -> (Vec<JobListing>, RunReport) {
        let mut report = RunReport::started();
        report.config_hash = self.config_hash.clone();

        let coordinator = Coordinator::new(&self.fetcher, &self.pacer, &self.pattern, self.schedule);

        let mut collected = Vec::new();
        for (idx, (category, url)) in self.categories.iter().enumerate() {
            match coordinator.scrape_category(category, url).await {
                Ok(outcome) => {
                    tracing::info!(
                        "{}: {} listings ({} detail pages, {} failed)",
                        category.name,
                        outcome.listings.len(),
                        outcome.stats.details_fetched,
                        outcome.stats.detail_failures
                    );
                    collected.extend(outcome.listings);
                    report.categories.push(outcome.stats);
                }
                Err(e) => {
                    tracing::error!("Error scraping {}: {}", url, e);
                    report.failed_categories.push(e);
                }
            }

            if idx + 1 < self.categories.len() {
                self.pacer.after_category().await;
            }
        }

        report.collected = collected.len();
        let (listings, dropped, duplicates) = finalize_listings(collected);
        report.dropped = dropped;
        report.duplicates = duplicates;
        report.retained = listings.len();
        report.finished_at = Utc::now();

        (listings, report)
    }

    /// Scrapes, then writes one snapshot to every store
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - Run finished and every store holds the new snapshot
    /// * `Err(ScrapeError::Store)` - A store write failed
    pub async fn run(
        &self,
        stores: &mut [Box<dyn DatasetStore>],
    ) -> Result<RunReport, ScrapeError> {
        let (listings, mut report) = self.scrape().await;

        for store in stores.iter_mut() {
            let id = store.save(&listings)?;
            tracing::info!("Saved snapshot {} to {}", id, store.location());
            report.snapshots.push(SnapshotRecord {
                location: store.location(),
                id,
            });
        }

        tracing::info!(
            "Scraping complete! Total jobs collected: {} ({} dropped, {} duplicates, {} categories failed)",
            report.retained,
            report.dropped,
            report.duplicates,
            report.failed_categories.len()
        );

        Ok(report)
    }
}

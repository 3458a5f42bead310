//! Category orchestration
//!
//! For one category: fetch the listing page, parse its fragments, enrich each
//! fragment that carries a detail link from its detail page, and emit the
//! listings in document order. Failures are contained: a detail page that
//! cannot be fetched blanks two fields of one listing, and a listing page that
//! cannot be fetched yields a [`CategoryError`] the runner absorbs.

use crate::config::CategoryConfig;
use crate::crawler::comment::DetailLinkPattern;
use crate::crawler::detail::{parse_detail_page, ParsedDetailPage};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::listing::parse_listing_page;
use crate::crawler::scheduler::{Pacer, Schedule};
use crate::record::{DetailFields, JobListing, ListingFragment};
use crate::CategoryError;
use futures::stream::{self, StreamExt};

/// Counters for one category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    pub name: String,
    pub url: String,

    /// Listing containers on the page, including ones without a card
    pub containers: usize,

    /// Fragments extracted (containers with a card)
    pub fragments: usize,

    /// Fragments carrying a detail link
    pub detail_links: usize,

    /// Detail pages fetched and parsed
    pub details_fetched: usize,

    /// Detail pages that could not be fetched
    pub detail_failures: usize,

    /// Detail pages fetched but without a `Job Openings` row
    pub openings_missing: usize,
}

/// Listings and counters produced for one category
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub listings: Vec<JobListing>,
    pub stats: CategoryStats,
}

/// What happened to a fragment's detail page
#[derive(Debug, Clone, PartialEq, Eq)]
enum DetailOutcome {
    /// The fragment carried no detail link
    NoLink,
    Parsed(ParsedDetailPage),
    Failed,
}

/// Drives the listing → detail sequence for categories
pub struct Coordinator<'a> {
    fetcher: &'a Fetcher,
    pacer: &'a Pacer,
    pattern: &'a DetailLinkPattern,
    schedule: Schedule,
}

impl<'a> Coordinator<'a> {
    pub fn new(
        fetcher: &'a Fetcher,
        pacer: &'a Pacer,
        pattern: &'a DetailLinkPattern,
        schedule: Schedule,
    ) -> Self {
        Self {
            fetcher,
            pacer,
            pattern,
            schedule,
        }
    }

    /// Scrapes one category from its listing page URL
    ///
    /// # Returns
    ///
    /// * `Ok(CategoryOutcome)` - Listings in document order (possibly empty)
    /// * `Err(CategoryError)` - The listing page itself could not be fetched
    pub async fn scrape_category(
        &self,
        category: &CategoryConfig,
        url: &str,
    ) -> Result<CategoryOutcome, CategoryError> {
        tracing::info!("Scraping {} jobs from {}", category.name, url);

        let html = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| CategoryError {
                category: category.name.clone(),
                source,
            })?;

        let page = parse_listing_page(&html, self.pattern);
        tracing::info!(
            "Found {} job posts in {} ({} with a card)",
            page.containers,
            category.name,
            page.fragments.len()
        );

        let mut stats = CategoryStats {
            name: category.name.clone(),
            url: url.to_string(),
            containers: page.containers,
            fragments: page.fragments.len(),
            ..CategoryStats::default()
        };

        let enriched = match self.schedule {
            Schedule::Sequential => self.enrich_sequential(&category.name, page.fragments).await,
            Schedule::Parallel { workers } => {
                self.enrich_parallel(&category.name, page.fragments, workers)
                    .await
            }
        };

        let mut listings = Vec::with_capacity(enriched.len());
        for (listing, outcome) in enriched {
            match &outcome {
                DetailOutcome::NoLink => {}
                DetailOutcome::Parsed(parsed) => {
                    stats.detail_links += 1;
                    stats.details_fetched += 1;
                    if !parsed.openings_row_found {
                        stats.openings_missing += 1;
                    }
                }
                DetailOutcome::Failed => {
                    stats.detail_links += 1;
                    stats.detail_failures += 1;
                }
            }
            listings.push(listing);
        }

        Ok(CategoryOutcome { listings, stats })
    }

    /// One detail request at a time, pausing after each
    async fn enrich_sequential(
        &self,
        category: &str,
        fragments: Vec<ListingFragment>,
    ) -> Vec<(JobListing, DetailOutcome)> {
        let total = fragments.len();
        let mut enriched = Vec::with_capacity(total);

        for (idx, fragment) in fragments.into_iter().enumerate() {
            tracing::debug!("Processing job {}/{} in {}", idx + 1, total, category);

            let detail_url = fragment.post_url.clone();
            let mut listing = JobListing::from_fragment(category, fragment);

            let outcome = match detail_url {
                Some(url) => {
                    let outcome = self.fetch_detail(&url).await;
                    self.pacer.after_detail().await;
                    outcome
                }
                None => DetailOutcome::NoLink,
            };

            apply_detail(&mut listing, &outcome);
            enriched.push((listing, outcome));
        }

        enriched
    }

    /// Up to `workers` detail requests in flight; output keeps document order
    async fn enrich_parallel(
        &self,
        category: &str,
        fragments: Vec<ListingFragment>,
        workers: usize,
    ) -> Vec<(JobListing, DetailOutcome)> {
        let this = self;

        let mut enriched: Vec<(usize, JobListing, DetailOutcome)> = stream::iter(fragments)
            .map(|fragment| async move {
                let position = fragment.position;
                let detail_url = fragment.post_url.clone();
                let mut listing = JobListing::from_fragment(category, fragment);

                let outcome = match detail_url {
                    Some(url) => {
                        this.pacer.detail_slot().await;
                        this.fetch_detail(&url).await
                    }
                    None => DetailOutcome::NoLink,
                };

                apply_detail(&mut listing, &outcome);
                (position, listing, outcome)
            })
            .buffer_unordered(workers.max(1))
            .collect()
            .await;

        // Completion order is arbitrary; restore document order
        enriched.sort_by_key(|(position, _, _)| *position);

        enriched
            .into_iter()
            .map(|(_, listing, outcome)| (listing, outcome))
            .collect()
    }

    async fn fetch_detail(&self, url: &str) -> DetailOutcome {
        tracing::debug!("Fetching details from {}", url);

        match self.fetcher.fetch(url).await {
            Ok(html) => {
                let parsed = parse_detail_page(&html);
                if !parsed.openings_row_found {
                    tracing::warn!("No '{}' row on {}", crate::crawler::detail::OPENINGS_LABEL, url);
                }
                DetailOutcome::Parsed(parsed)
            }
            Err(e) => {
                tracing::warn!("Could not fetch details: {}", e);
                DetailOutcome::Failed
            }
        }
    }
}

fn apply_detail(listing: &mut JobListing, outcome: &DetailOutcome) {
    match outcome {
        DetailOutcome::NoLink => {}
        DetailOutcome::Parsed(parsed) => listing.merge_detail(parsed.fields.clone()),
        DetailOutcome::Failed => listing.merge_detail(DetailFields::not_found()),
    }
}

//! JobYaari scraper: a polite job-listing extractor
//!
//! This crate fetches category listing pages from a job board, recovers the
//! per-listing detail links hidden in comment markup, enriches each listing
//! from its detail page and persists the result as a tabular snapshot.

pub mod config;
pub mod crawler;
pub mod output;
pub mod record;
pub mod storage;

use thiserror::Error;

/// Main error type for scraper operations
///
/// Scraping failures (unreachable pages, missing markup) never surface here;
/// they are absorbed per field, per listing or per category. What remains is
/// startup failure and the dataset write itself.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Dataset store error: {0}")]
    Store(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid detail link pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Why a single fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request did not complete within the configured timeout
    Timeout,

    /// The server answered with a non-success status code
    Status(u16),

    /// Connection, TLS or protocol failure
    Transport(String),

    /// The response body could not be read
    Body(String),
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "request timed out"),
            Self::Status(code) => write!(f, "HTTP status {}", code),
            Self::Transport(msg) => write!(f, "transport error: {}", msg),
            Self::Body(msg) => write!(f, "failed to read body: {}", msg),
        }
    }
}

/// A failed GET against a single URL
#[derive(Debug, Clone, Error)]
#[error("Fetch failed for {url}: {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

/// A whole category contributed nothing because its listing page was unreachable
#[derive(Debug, Clone, Error)]
#[error("Category '{category}' unavailable: {source}")]
pub struct CategoryError {
    pub category: String,
    pub source: FetchError,
}

/// Result type alias for scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_pipeline, RunReport};
pub use record::{JobListing, NOT_FOUND};
pub use storage::{DatasetStore, SnapshotId};

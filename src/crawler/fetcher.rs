//! HTTP fetcher implementation
//!
//! Every listing and detail page goes through [`Fetcher::fetch`]. A fetch
//! either yields the page body or a typed [`FetchError`]; nothing here retries
//! and nothing here panics past the caller.

use crate::config::UserAgentConfig;
use crate::{FetchError, FetchErrorKind};
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout applied to every GET
///
/// # Example
///
/// ```no_run
/// use jobyaari_scraper::config::UserAgentConfig;
/// use jobyaari_scraper::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Single-request page fetcher
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with its own client
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Issues a GET and returns the body of a successful response
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx | `Ok(body)` |
    /// | Other status | `FetchErrorKind::Status` |
    /// | Timeout | `FetchErrorKind::Timeout` |
    /// | Connect/TLS/protocol failure | `FetchErrorKind::Transport` |
    /// | Body read failure | `FetchErrorKind::Body` |
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let fail = |kind| FetchError {
            url: url.to_string(),
            kind,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fail(classify(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fail(FetchErrorKind::Status(status.as_u16())));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                fail(FetchErrorKind::Timeout)
            } else {
                fail(FetchErrorKind::Body(e.to_string()))
            }
        })
    }
}

fn classify(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else if error.is_connect() {
        FetchErrorKind::Transport(format!("connection failed: {}", error))
    } else {
        FetchErrorKind::Transport(error.to_string())
    }
}

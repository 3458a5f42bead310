use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for the scraper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(rename = "category", default = "default_categories")]
    pub categories: Vec<CategoryConfig>,
}

/// How detail pages within a category are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One request at a time with sleep-based pacing
    Sequential,
    /// Bounded number of in-flight detail requests behind a shared rate limiter
    Parallel,
}

/// Fetching and pacing behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Timeout for every GET request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay after each detail page fetch (milliseconds)
    #[serde(rename = "detail-delay-ms", default = "default_detail_delay_ms")]
    pub detail_delay_ms: u64,

    /// Delay after each category before the next one starts (milliseconds)
    #[serde(rename = "category-delay-ms", default = "default_category_delay_ms")]
    pub category_delay_ms: u64,

    #[serde(default = "default_mode")]
    pub mode: ExecutionMode,

    /// Upper bound on in-flight detail requests in parallel mode
    #[serde(
        rename = "max-concurrent-details",
        default = "default_max_concurrent_details"
    )]
    pub max_concurrent_details: u32,
}

impl ScraperConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    pub fn category_delay(&self) -> Duration {
        Duration::from_millis(self.category_delay_ms)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout_secs(),
            detail_delay_ms: default_detail_delay_ms(),
            category_delay_ms: default_category_delay_ms(),
            mode: default_mode(),
            max_concurrent_details: default_max_concurrent_details(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: Name/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "JobYaariScraper".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// Source site layout
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Category listing pages live at `<category-base-url><path>`
    #[serde(rename = "category-base-url", default = "default_category_base_url")]
    pub category_base_url: String,

    /// Detail pages live at `<detail-url-prefix><id>`
    #[serde(rename = "detail-url-prefix", default = "default_detail_url_prefix")]
    pub detail_url_prefix: String,
}

impl SiteConfig {
    /// Resolves the listing page URL for a category
    pub fn category_url(&self, category: &CategoryConfig) -> Result<Url, url::ParseError> {
        let mut base = self.category_base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)?.join(&category.path)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            category_base_url: default_category_base_url(),
            detail_url_prefix: default_detail_url_prefix(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV dataset handed to consumers
    #[serde(rename = "csv-path")]
    pub csv_path: String,

    /// Path to the SQLite snapshot history (optional)
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,

    /// Path to the markdown run summary (optional)
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<String>,
}

/// One category to scrape
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryConfig {
    /// Name written into the Category column
    pub name: String,

    /// URL path segment appended to the category base URL
    pub path: String,
}

impl CategoryConfig {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_detail_delay_ms() -> u64 {
    500
}

fn default_category_delay_ms() -> u64 {
    1000
}

fn default_mode() -> ExecutionMode {
    ExecutionMode::Sequential
}

fn default_max_concurrent_details() -> u32 {
    4
}

fn default_category_base_url() -> String {
    "https://jobyaari.com/category/".to_string()
}

fn default_detail_url_prefix() -> String {
    "https://jobyaari.com/jobdetails/".to_string()
}

/// The four categories the job board exposes
pub fn default_categories() -> Vec<CategoryConfig> {
    vec![
        CategoryConfig::new("Engineering", "engineering"),
        CategoryConfig::new("Science", "science"),
        CategoryConfig::new("Commerce", "commerce"),
        CategoryConfig::new("Education", "education"),
    ]
}

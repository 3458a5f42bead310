//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use jobyaari_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("jobyaari.toml")).unwrap();
//! println!("Scraping {} categories", config.categories.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_categories, CategoryConfig, Config, ExecutionMode, OutputConfig, ScraperConfig,
    SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

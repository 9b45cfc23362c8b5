//! Bolig-Scrape: apartment listings from boligportal.dk
//!
//! This crate paginates the portal's search results, collects detail-page
//! links, fetches every detail page under a concurrency cap and extracts a
//! flat label/value record per apartment. Both stages are cached as JSON files.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Bolig-Scrape operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Pagination error on {url}: {source}")]
    Pagination {
        url: String,
        source: PaginationError,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
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

    #[error("Invalid selector for {name}: {selector}")]
    InvalidSelector { name: String, selector: String },
}

/// The pager on a listing page held no numeric page indicator
#[derive(Debug, Error)]
#[error("no numeric page indicator found in pager")]
pub struct PaginationError;

/// Errors from a single page fetch, after retries are exhausted
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Request failed for {url}: {source}")]
    Request { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Status { .. } | FetchError::Timeout { .. })
    }
}

/// Result type alias for Bolig-Scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ApartmentRecord, HttpFetcher, PageSource, Scraper};

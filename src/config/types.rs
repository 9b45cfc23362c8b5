use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Bolig-Scrape
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// values that match the live portal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub scraper: ScraperConfig,
    pub selectors: SelectorConfig,
    pub cache: CacheConfig,
}

/// Where and what to scrape
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Portal root, without trailing slash
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// City path segment used in the listing URL
    pub city: String,

    /// Room filter path segment. Accepted but not applied to the listing URL.
    #[serde(rename = "room-filter")]
    pub room_filter: String,

    /// Number of apartments per listing page, used for the offset parameter
    #[serde(rename = "page-size")]
    pub page_size: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.boligportal.dk".to_string(),
            city: "københavn".to_string(),
            room_filter: "2-værelser".to_string(),
            page_size: 18,
        }
    }
}

/// HTTP client and retry settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Timeout applied to each individual attempt
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Total attempts per URL, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Backoff before attempt n+1 is `n * backoff-base-ms`
    #[serde(rename = "backoff-base-ms")]
    pub backoff_base_ms: u64,
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)".to_string(),
            accept_language: "da-DK,da;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            request_timeout_secs: 10,
            max_attempts: 3,
            backoff_base_ms: 1500,
        }
    }
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Maximum number of detail pages in flight at once
    #[serde(rename = "max-concurrent-details")]
    pub max_concurrent_details: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            max_concurrent_details: 10,
        }
    }
}

/// CSS selectors for the portal's page templates
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Apartment card anchors on a listing page
    #[serde(rename = "listing-link")]
    pub listing_link: String,

    /// Pager items on a listing page
    pub pager: String,

    /// Field labels on a detail page
    #[serde(rename = "detail-label")]
    pub detail_label: String,

    /// Field values on a detail page
    #[serde(rename = "detail-value")]
    pub detail_value: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_link: "a.AdCardSrp__Link.css-1jlpfr4".to_string(),
            pager: "span.css-176v3d".to_string(),
            detail_label: "span.css-1td16zm".to_string(),
            detail_value: "span.css-1f8murc".to_string(),
        }
    }
}

/// Cache file locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(rename = "links-path")]
    pub links_path: PathBuf,

    #[serde(rename = "details-path")]
    pub details_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            links_path: PathBuf::from("data").join("apartment_links.json"),
            details_path: PathBuf::from("data").join("apartmentdetails.json"),
        }
    }
}

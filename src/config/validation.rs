use crate::config::types::{CacheConfig, Config, HttpConfig, ScraperConfig, SelectorConfig, SiteConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_http_config(&config.http)?;
    validate_scraper_config(&config.scraper)?;
    validate_selectors(&config.selectors)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates the portal location and paging settings
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    // Links are built as base + href, so a trailing slash would double up
    if config.base_url.ends_with('/') {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must not end with '/'",
            config.base_url
        )));
    }

    if config.city.trim().is_empty() {
        return Err(ConfigError::Validation("city cannot be empty".to_string()));
    }

    if config.page_size < 1 {
        return Err(ConfigError::Validation(format!(
            "page_size must be >= 1, got {}",
            config.page_size
        )));
    }

    Ok(())
}

/// Validates HTTP client settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    Ok(())
}

/// Validates scraper behavior settings
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_details < 1 || config.max_concurrent_details > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_details must be between 1 and 100, got {}",
            config.max_concurrent_details
        )));
    }

    Ok(())
}

/// Checks that every configured selector parses
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    let selectors = [
        ("listing_link", &config.listing_link),
        ("pager", &config.pager),
        ("detail_label", &config.detail_label),
        ("detail_value", &config.detail_value),
    ];

    for (name, selector) in selectors {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector {
                name: name.to_string(),
                selector: selector.clone(),
            });
        }
    }

    Ok(())
}

fn validate_cache_config(config: &CacheConfig) -> Result<(), ConfigError> {
    if config.links_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "links_path cannot be empty".to_string(),
        ));
    }

    if config.details_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "details_path cannot be empty".to_string(),
        ));
    }

    if config.links_path == config.details_path {
        return Err(ConfigError::Validation(
            "links_path and details_path must differ".to_string(),
        ));
    }

    Ok(())
}

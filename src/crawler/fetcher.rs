//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building an HTTP client with browser-like headers
//! - GET requests with a per-attempt timeout
//! - Retry with linearly growing backoff for transient failures
//! - Error classification

use crate::config::HttpConfig;
use crate::{ConfigError, FetchError, ScrapeError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Anything that can turn a URL into a page body
///
/// The scraper pipeline is generic over this trait so tests can substitute an
/// instrumented source for the network.
pub trait PageSource: Send + Sync {
    /// Fetches `url` and returns the response body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// How often and how patiently a failed request is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Delay unit; the wait after attempt `n` is `n * base_delay`
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Returns the wait after the given (1-based) failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1500),
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.backoff_base(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Every request carries the configured `User-Agent` and `Accept-Language`
/// and is bounded by the configured request timeout.
///
/// # Example
///
/// ```no_run
/// use bolig_scrape::config::HttpConfig;
/// use bolig_scrape::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, ScrapeError> {
    let accept_language = HeaderValue::from_str(&config.accept_language).map_err(|_| {
        ConfigError::Validation(format!(
            "accept_language is not a valid header value: '{}'",
            config.accept_language
        ))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, accept_language);

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout())
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Page fetcher backed by a reqwest client
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Non-2xx status | Retry, wait `attempt * base_delay` |
/// | Timeout | Retry, wait `attempt * base_delay` |
/// | Connection refused, DNS, TLS | Fail immediately |
///
/// The error from the last attempt is returned once `max_attempts` is spent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Creates a fetcher from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            client: build_http_client(config)?,
            retry: RetryPolicy::from(config),
        })
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Performs a single GET without retrying
    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 1;

        loop {
            match self.fetch_once(url).await {
                Ok(body) => {
                    tracing::debug!("Fetched {} on attempt {}", url, attempt);
                    return Ok(body);
                }
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::debug!(
                        "Attempt {}/{} failed ({}), retrying in {:?}",
                        attempt,
                        self.retry.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(status) = error.status() {
        FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

//! Scrape coordinator - ties link collection, detail collection and caching
//!
//! The [`Scraper`] owns the configuration, the page source and the
//! concurrency gate for one scrape. Its cached entry points
//! ([`Scraper::apartment_links`], [`Scraper::apartment_details`]) consult the
//! JSON cache files before touching the network.

use crate::cache::get_or_compute;
use crate::config::Config;
use crate::crawler::details::{collect_details, ApartmentRecord};
use crate::crawler::fetcher::{HttpFetcher, PageSource};
use crate::crawler::gate::FetchGate;
use crate::crawler::links::collect_links;
use crate::ScrapeError;

/// Main scraper structure
pub struct Scraper<S> {
    config: Config,
    source: S,
    gate: FetchGate,
}

impl Scraper<HttpFetcher> {
    /// Creates a scraper that fetches over HTTP
    pub fn from_config(config: Config) -> Result<Self, ScrapeError> {
        let source = HttpFetcher::new(&config.http)?;
        Ok(Self::new(config, source))
    }
}

impl<S: PageSource> Scraper<S> {
    /// Creates a scraper around any page source
    ///
    /// The detail gate is sized from `scraper.max-concurrent-details`.
    pub fn new(config: Config, source: S) -> Self {
        let gate = FetchGate::new(config.scraper.max_concurrent_details as usize);
        Self {
            config,
            source,
            gate,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn gate(&self) -> &FetchGate {
        &self.gate
    }

    /// Collects listing links for a city, bypassing the cache
    pub async fn collect_links(
        &self,
        city: &str,
        room_filter: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        collect_links(
            &self.source,
            &self.config.site,
            &self.config.selectors,
            city,
            room_filter,
        )
        .await
    }

    /// Scrapes detail records for `links`, bypassing the cache
    pub async fn collect_details(&self, links: &[String]) -> Vec<ApartmentRecord> {
        collect_details(&self.source, &self.gate, &self.config.selectors, links).await
    }

    /// Listing links for the configured city, served from the link cache
    /// unless `refresh` is set
    pub async fn apartment_links(&self, refresh: bool) -> Result<Vec<String>, ScrapeError> {
        let site = &self.config.site;
        get_or_compute(&self.config.cache.links_path, refresh, || {
            self.collect_links(&site.city, &site.room_filter)
        })
        .await
    }

    /// Detail records, served from the detail cache unless `refresh` is set
    ///
    /// A fresh detail scrape reads its links through the link cache, which is
    /// only rebuilt when `refresh_links` is set.
    pub async fn apartment_details(
        &self,
        refresh: bool,
        refresh_links: bool,
    ) -> Result<Vec<ApartmentRecord>, ScrapeError> {
        get_or_compute(&self.config.cache.details_path, refresh, || async {
            let links = self.apartment_links(refresh_links).await?;
            Ok::<_, ScrapeError>(self.collect_details(&links).await)
        })
        .await
    }
}

/// Runs a complete scrape
///
/// Always rebuilds the detail cache; the link cache is reused unless
/// `refresh_links` is set.
///
/// # Example
///
/// ```no_run
/// use bolig_scrape::config::Config;
/// use bolig_scrape::crawler::run_scrape;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let records = run_scrape(Config::default(), false).await?;
/// println!("Scraped {} apartments", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_scrape(
    config: Config,
    refresh_links: bool,
) -> Result<Vec<ApartmentRecord>, ScrapeError> {
    let scraper = Scraper::from_config(config)?;
    scraper.apartment_details(true, refresh_links).await
}

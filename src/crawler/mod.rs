//! Crawler module for listing and detail page scraping
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching with retry logic
//! - A narrow parsed-document interface
//! - Listing link extraction and pagination
//! - Detail record extraction under a concurrency gate
//! - Overall coordination with the JSON caches

mod coordinator;
mod details;
mod fetcher;
mod gate;
mod links;
mod parser;

pub use coordinator::{run_scrape, Scraper};
pub use details::{collect_details, dedup_links, extract_details, ApartmentRecord, URL_FIELD};
pub use fetcher::{build_http_client, HttpFetcher, PageSource, RetryPolicy};
pub use gate::FetchGate;
pub use links::{
    collect_links, extract_links, extract_max_page_number, first_page_url, listing_page_urls,
    MAX_LISTING_PAGES,
};
pub use parser::{Document, HtmlDocument};

//! Listing pages: link extraction and pagination
//!
//! The first listing page is fetched on its own to read the pager. Every other
//! page is then fetched concurrently and the apartment links of all pages are
//! concatenated in page order.

use crate::config::{SelectorConfig, SiteConfig};
use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::{Document, HtmlDocument};
use crate::{PaginationError, ScrapeError};
use futures::future::join_all;

/// Extracts absolute apartment links from a listing page
///
/// Anchors without an `href` (or with an empty one) are skipped. Hrefs are
/// site-relative, so each link is `base_url + href`.
pub fn extract_links(doc: &impl Document, selector: &str, base_url: &str) -> Vec<String> {
    doc.select_attr(selector, "href")
        .into_iter()
        .flatten()
        .filter(|href| !href.is_empty())
        .map(|href| format!("{}{}", base_url, href))
        .collect()
}

/// Returns the highest page number shown in the pager
///
/// Only pager items whose text is made entirely of digits count; "next",
/// ellipses and the like are ignored.
pub fn extract_max_page_number(
    doc: &impl Document,
    selector: &str,
) -> Result<u32, PaginationError> {
    doc.select_text(selector)
        .iter()
        .filter(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|text| text.parse::<u32>().ok())
        .max()
        .ok_or(PaginationError)
}

/// Builds the URL of the first listing page for a city
///
/// `room_filter` is accepted for API stability but is not part of the URL;
/// results cover every apartment size in the city.
pub fn first_page_url(base_url: &str, city: &str, room_filter: &str) -> String {
    tracing::debug!("Room filter '{}' is not applied to listing URLs", room_filter);
    format!("{}/lejligheder/{}/", base_url, city)
}

/// Upper bound on listing pages fetched for one city
pub const MAX_LISTING_PAGES: u32 = 1000;

/// Builds the URLs of all `max_page` listing pages
///
/// Page index 0 is `first_url` itself; index `i` adds `?offset={i * page_size}`.
/// The page count comes from scraped text, so it is capped at
/// [`MAX_LISTING_PAGES`].
pub fn listing_page_urls(first_url: &str, max_page: u32, page_size: u32) -> Vec<String> {
    if max_page > MAX_LISTING_PAGES {
        tracing::warn!(
            "Pager reports {} pages, only the first {} are fetched",
            max_page,
            MAX_LISTING_PAGES
        );
    }

    (0..max_page.min(MAX_LISTING_PAGES))
        .map(|page| {
            if page == 0 {
                first_url.to_string()
            } else {
                let offset = u64::from(page) * u64::from(page_size);
                format!("{}?offset={}", first_url, offset)
            }
        })
        .collect()
}

/// Collects apartment links from every listing page of a city
///
/// # Errors
///
/// Fails if the first page cannot be fetched or shows no page numbers; without
/// a page count no other page URL can be built. Failures on later pages are
/// logged and those pages contribute no links.
pub async fn collect_links<S: PageSource>(
    source: &S,
    site: &SiteConfig,
    selectors: &SelectorConfig,
    city: &str,
    room_filter: &str,
) -> Result<Vec<String>, ScrapeError> {
    let first_url = first_page_url(&site.base_url, city, room_filter);
    let first_body = source.fetch(&first_url).await?;

    let (max_page, first_links) = {
        let doc = HtmlDocument::parse(&first_body);
        let max_page = extract_max_page_number(&doc, &selectors.pager).map_err(|source| {
            ScrapeError::Pagination {
                url: first_url.clone(),
                source,
            }
        })?;
        let links = extract_links(&doc, &selectors.listing_link, &site.base_url);
        (max_page, links)
    };

    let page_urls = listing_page_urls(&first_url, max_page, site.page_size);
    if page_urls.is_empty() {
        tracing::warn!("Pager on {} reports no pages, nothing to collect", first_url);
        return Ok(Vec::new());
    }
    let page_count = page_urls.len();
    tracing::info!("Fetching {} listing pages concurrently", page_count);

    let remaining = join_all(
        page_urls
            .iter()
            .skip(1)
            .map(|url| fetch_listing_links(source, url, selectors, &site.base_url)),
    )
    .await;

    let mut all_links = Vec::new();
    for (index, links) in std::iter::once(first_links).chain(remaining).enumerate() {
        tracing::info!(
            "Page {}/{}: found {} apartments",
            index + 1,
            page_count,
            links.len()
        );
        all_links.extend(links);
    }

    tracing::info!("Total: {} apartment links", all_links.len());
    Ok(all_links)
}

/// Fetches one listing page and extracts its links; failures yield no links
async fn fetch_listing_links<S: PageSource>(
    source: &S,
    url: &str,
    selectors: &SelectorConfig,
    base_url: &str,
) -> Vec<String> {
    match source.fetch(url).await {
        Ok(body) => {
            let doc = HtmlDocument::parse(&body);
            extract_links(&doc, &selectors.listing_link, base_url)
        }
        Err(e) => {
            tracing::warn!("Skipping listing page {}: {}", url, e);
            Vec::new()
        }
    }
}

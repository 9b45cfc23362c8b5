//! Statistics generation from the cache files
//!
//! This module provides functionality for summarizing what the link and
//! detail caches currently hold, without touching the network.

use crate::cache::read_cache;
use crate::config::CacheConfig;
use crate::crawler::{dedup_links, ApartmentRecord, URL_FIELD};
use crate::ScrapeError;
use std::collections::HashMap;

/// Number of field labels listed by [`print_statistics`]
const TOP_LABELS: usize = 10;

/// Cache statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeStatistics {
    /// Links in the link cache, `None` if there is no link cache
    pub total_links: Option<usize>,

    /// Distinct links in the link cache
    pub unique_links: Option<usize>,

    /// Records in the detail cache, `None` if there is no detail cache
    pub total_records: Option<usize>,

    /// How many records carry each field label, most common first
    pub label_counts: Vec<(String, usize)>,
}

impl ScrapeStatistics {
    /// Share of unique links that produced a record, as a percentage
    pub fn success_rate(&self) -> Option<f64> {
        match (self.unique_links, self.total_records) {
            (Some(links), Some(records)) if links > 0 => {
                Some(records as f64 / links as f64 * 100.0)
            }
            _ => None,
        }
    }
}

/// Loads statistics from the configured cache files
///
/// Missing cache files are reported as `None`; unreadable ones are errors.
pub async fn load_statistics(cache: &CacheConfig) -> Result<ScrapeStatistics, ScrapeError> {
    let mut stats = ScrapeStatistics::default();

    if cache.links_path.exists() {
        let links: Vec<String> = read_cache(&cache.links_path).await?;
        stats.total_links = Some(links.len());
        stats.unique_links = Some(dedup_links(&links).len());
    }

    if cache.details_path.exists() {
        let records: Vec<ApartmentRecord> = read_cache(&cache.details_path).await?;
        stats.total_records = Some(records.len());
        stats.label_counts = count_labels(&records);
    }

    Ok(stats)
}

/// Counts label occurrences across records, ignoring the injected url field
fn count_labels(records: &[ApartmentRecord]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in records.iter().flat_map(|r| r.labels()) {
        if label != URL_FIELD {
            *counts.entry(label).or_default() += 1;
        }
    }

    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, count)| (label.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ScrapeStatistics) {
    println!("=== Scrape Statistics ===\n");

    println!("Link cache:");
    match (stats.total_links, stats.unique_links) {
        (Some(total), Some(unique)) => {
            println!("  Links: {}", total);
            println!("  Unique links: {}", unique);
        }
        _ => println!("  (no link cache)"),
    }
    println!();

    println!("Detail cache:");
    match stats.total_records {
        Some(records) => {
            println!("  Records: {}", records);
            if let Some(rate) = stats.success_rate() {
                println!("  Coverage of unique links: {:.1}%", rate);
            }
        }
        None => println!("  (no detail cache)"),
    }

    if !stats.label_counts.is_empty() {
        println!();
        println!("Most common fields:");
        for (label, count) in stats.label_counts.iter().take(TOP_LABELS) {
            println!("  {}: {}", label, count);
        }
    }
}

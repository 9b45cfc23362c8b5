//! Output module for reporting on scrape results
//!
//! This module handles:
//! - Summarizing the link and detail caches
//! - Printing those summaries for the command line

pub mod stats;

pub use stats::{load_statistics, print_statistics, ScrapeStatistics};

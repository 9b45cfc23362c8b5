//! On-disk JSON caches for scrape results
//!
//! Each payload type has one fixed cache file. A cache is read back verbatim
//! unless a refresh is requested, and is only ever written after the data
//! it holds has been fully computed.

mod json;

pub use json::{get_or_compute, read_cache, write_cache};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing a cache file
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

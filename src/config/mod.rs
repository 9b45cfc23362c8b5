//! Configuration module for Bolig-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A config file is optional: `Config::default()` targets the live portal.
//!
//! # Example
//!
//! ```no_run
//! use bolig_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("bolig.toml")).unwrap();
//! println!("Scraping city: {}", config.site.city);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, HttpConfig, ScraperConfig, SelectorConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;

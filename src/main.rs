//! Bolig-Scrape main entry point
//!
//! This is the command-line interface for the apartment scraper.

use bolig_scrape::config::{load_config_with_hash, validate, Config};
use bolig_scrape::crawler::{first_page_url, run_scrape};
use bolig_scrape::output::{load_statistics, print_statistics};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Bolig-Scrape: apartment listings from boligportal.dk
///
/// Collects every listing link for a city, scrapes each apartment's detail
/// page and writes the results to JSON cache files. The detail cache is
/// always rebuilt; the link cache is reused unless --refresh-links is given.
#[derive(Parser, Debug)]
#[command(name = "bolig-scrape")]
#[command(version)]
#[command(about = "Scrape apartment listings into JSON", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Rebuild the link cache as well as the detail cache
    #[arg(long)]
    refresh_links: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with_all = ["stats", "refresh_links"])]
    dry_run: bool,

    /// Show statistics from the cache files and exit
    #[arg(long, conflicts_with_all = ["dry_run", "refresh_links"])]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config_with_hash(path) {
                Ok((cfg, hash)) => {
                    tracing::info!("Configuration loaded successfully (hash: {})", hash);
                    cfg
                }
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return Err(e.into());
                }
            }
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config).await?;
    } else {
        handle_scrape(config, cli.refresh_links).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bolig_scrape=info,warn"),
            1 => EnvFilter::new("bolig_scrape=debug,info"),
            2 => EnvFilter::new("bolig_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    validate(config)?;

    println!("=== Bolig-Scrape Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  City: {}", config.site.city);
    println!("  Room filter: {} (not applied)", config.site.room_filter);
    println!("  Page size: {}", config.site.page_size);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Request timeout: {}s", config.http.request_timeout_secs);
    println!(
        "  Attempts: {} (backoff base {}ms)",
        config.http.max_attempts, config.http.backoff_base_ms
    );

    println!("\nScraper:");
    println!(
        "  Max concurrent detail fetches: {}",
        config.scraper.max_concurrent_details
    );

    println!("\nCache:");
    println!("  Links: {}", config.cache.links_path.display());
    println!("  Details: {}", config.cache.details_path.display());

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start from {}",
        first_page_url(
            &config.site.base_url,
            &config.site.city,
            &config.site.room_filter
        )
    );

    Ok(())
}

/// Handles the --stats mode: summarizes the cache files
async fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let stats = load_statistics(&config.cache).await?;
    print_statistics(&stats);
    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: Config,
    refresh_links: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let details_path = config.cache.details_path.clone();

    match run_scrape(config, refresh_links).await {
        Ok(records) => {
            tracing::info!(
                "Scrape completed: {} apartments saved to {}",
                records.len(),
                details_path.display()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

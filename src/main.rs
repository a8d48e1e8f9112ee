//! Listing Harvester main entry point
//!
//! This is the command-line interface for the Listing Harvester scraper.

use anyhow::Context;
use clap::Parser;
use listing_harvester::config::{load_config_with_hash, validate_base_url, Config};
use listing_harvester::crawler::harvest;
use listing_harvester::output::{print_statistics, save_csv};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Listing Harvester: a polite classifieds scraper
///
/// Walks the paginated index under BASE_URL, visits every listing's detail
/// page and saves the collected attributes as a CSV table.
#[derive(Parser, Debug)]
#[command(name = "listing-harvester")]
#[command(version)]
#[command(about = "A polite classifieds scraper", long_about = None)]
struct Cli {
    /// Index root to crawl, e.g. https://auto.drom.ru/toyota/camry
    #[arg(value_name = "BASE_URL")]
    base_url: String,

    /// CSV file to save the results to
    #[arg(value_name = "SAVE_FILE")]
    save_file: PathBuf,

    /// Upper bound on index pages; pages 1 to N-1 are visited
    #[arg(long = "n_pages", value_name = "N")]
    n_pages: Option<u32>,

    /// Seconds to wait between detail page downloads
    #[arg(long, value_name = "T")]
    timeout: Option<u64>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(n_pages) = cli.n_pages {
        config.crawler.max_pages = n_pages;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.detail_delay_ms = timeout.saturating_mul(1000);
    }

    validate_base_url(&cli.base_url)?;

    let (records, mut stats) = harvest(&config, &cli.base_url)
        .await
        .with_context(|| format!("Harvest of {} failed", cli.base_url))?;

    tracing::info!("Saving results to {}", cli.save_file.display());
    stats.columns_written = save_csv(&cli.save_file, &config.output, &records)
        .with_context(|| format!("Failed to write {}", cli.save_file.display()))?;

    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listing_harvester=info,warn"),
            1 => EnvFilter::new("listing_harvester=debug,info"),
            2 => EnvFilter::new("listing_harvester=trace,debug"),
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

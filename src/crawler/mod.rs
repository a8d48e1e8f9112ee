//! Crawler module for page fetching and listing extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with fail-fast status handling
//! - Index and detail page parsing
//! - Wait strategies for rate limiting
//! - Overall harvest coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{build_page_url, Coordinator};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use parser::{
    normalize_text, parse_detail, parse_index, select_first_text, ParsedDetail, Selectors,
    PAGE_TITLE_KEY, PRICE_KEY, PUBLICATION_DATE_KEY,
};
pub use scheduler::{FixedDelay, NoDelay, WaitStrategy};

use crate::config::Config;
use crate::listing::ListingRecord;
use crate::output::HarvestStats;
use crate::HarvestError;

/// Runs a complete harvest over HTTP
///
/// This is the main entry point for a harvest. It will:
/// 1. Build the HTTP client
/// 2. Walk index pages `1..config.crawler.max_pages`
/// 3. Fetch and parse every listing's detail page
///
/// Delays between requests come from `config.crawler`.
///
/// # Returns
///
/// * `Ok((records, stats))` - Harvest completed successfully
/// * `Err(HarvestError)` - A request or extraction failed; nothing is kept
pub async fn harvest(
    config: &Config,
    base_url: &str,
) -> Result<(Vec<ListingRecord>, HarvestStats), HarvestError> {
    let fetcher = HttpFetcher::from_config(&config.user_agent, &config.crawler)?;
    let mut coordinator = Coordinator::new(
        fetcher,
        config,
        FixedDelay::from_millis(config.crawler.index_delay_ms),
        FixedDelay::from_millis(config.crawler.detail_delay_ms),
    )?;

    let records = coordinator.run(base_url, config.crawler.max_pages).await?;
    Ok((records, coordinator.stats().clone()))
}

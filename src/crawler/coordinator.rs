//! Harvest coordinator - main crawl orchestration logic
//!
//! This module drives the two sequential passes of a harvest:
//! - Discovery: walk index pages until one comes back empty or the page bound
//!   is reached, collecting listing stubs
//! - Enrichment: fetch every stub's detail page and merge its attributes
//!
//! Requests are issued strictly one at a time with a wait in between.

use crate::config::{Config, MissingFieldPolicy};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{parse_detail, parse_index, Selectors};
use crate::crawler::scheduler::WaitStrategy;
use crate::listing::{ListingRecord, ListingStub};
use crate::output::HarvestStats;
use crate::HarvestError;
use url::Url;

/// Main harvest coordinator structure
pub struct Coordinator<F, W> {
    fetcher: F,
    selectors: Selectors,
    policy: MissingFieldPolicy,
    page_path_template: String,
    index_wait: W,
    detail_wait: W,
    stats: HarvestStats,
}

impl<F: PageFetcher, W: WaitStrategy> Coordinator<F, W> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of page bodies
    /// * `config` - Selectors, extraction policy and page path template
    /// * `index_wait` - Pause after each non-empty index page
    /// * `detail_wait` - Pause after each detail page
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - A configured selector did not compile
    pub fn new(
        fetcher: F,
        config: &Config,
        index_wait: W,
        detail_wait: W,
    ) -> Result<Self, HarvestError> {
        Ok(Self {
            fetcher,
            selectors: Selectors::compile(&config.selectors)?
                .with_trim(config.extraction.trim_whitespace),
            policy: config.extraction.missing_required,
            page_path_template: config.crawler.page_path_template.clone(),
            index_wait,
            detail_wait,
            stats: HarvestStats::new(),
        })
    }

    /// Statistics collected so far
    pub fn stats(&self) -> &HarvestStats {
        &self.stats
    }

    /// Runs discovery followed by enrichment
    pub async fn run(
        &mut self,
        base_url: &str,
        max_pages: u32,
    ) -> Result<Vec<ListingRecord>, HarvestError> {
        tracing::info!("Collecting listings from {}", base_url);
        let stubs = self.discover_all(base_url, max_pages).await?;

        tracing::info!(
            "Found {} listings, fetching their detail pages",
            stubs.len()
        );
        let records = self.enrich(stubs).await?;

        self.stats.finish();
        Ok(records)
    }

    /// Collects listing stubs from sequential index pages
    ///
    /// Pages `1..max_pages` are visited, so `max_pages` itself is never
    /// requested. Iteration stops early at the first page without listings.
    pub async fn discover_all(
        &mut self,
        base_url: &str,
        max_pages: u32,
    ) -> Result<Vec<ListingStub>, HarvestError> {
        let mut stubs = Vec::new();

        for page in 1..max_pages {
            let page_url = build_page_url(base_url, &self.page_path_template, page);
            let parsed_url = Url::parse(&page_url)?;

            let body = self.fetcher.fetch(&page_url).await?;
            self.stats.index_pages_fetched += 1;

            let found = parse_index(&body, &parsed_url, &self.selectors);
            if found.is_empty() {
                tracing::info!("Index page {} has no listings, stopping", page);
                break;
            }

            tracing::debug!("Index page {}: {} listings", page, found.len());
            stubs.extend(found);
            self.stats.listings_discovered = stubs.len();

            self.index_wait.wait().await;
        }

        Ok(stubs)
    }

    /// Fetches every stub's detail page and merges its attributes
    ///
    /// Output order equals input order. The first failure aborts the pass and
    /// discards everything collected so far.
    pub async fn enrich(
        &mut self,
        stubs: Vec<ListingStub>,
    ) -> Result<Vec<ListingRecord>, HarvestError> {
        let total = stubs.len();
        let mut records = Vec::with_capacity(total);

        for (processed, stub) in stubs.into_iter().enumerate() {
            let body = self.fetcher.fetch(&stub.link).await?;
            self.stats.detail_pages_fetched += 1;

            let detail = parse_detail(&body, &self.selectors, self.policy).map_err(|e| {
                tracing::error!("Failed to extract {}: {}", stub.link, e);
                e
            })?;
            if !detail.table_found {
                tracing::warn!("No attribute table on {}", stub.link);
                self.stats.detail_pages_without_table += 1;
            }

            let mut record = ListingRecord::from_stub(stub);
            record.merge_detail(detail.attributes);
            records.push(record);

            if (processed + 1) % 10 == 0 || processed + 1 == total {
                tracing::info!("Progress: {} / {} listings enriched", processed + 1, total);
            }

            self.detail_wait.wait().await;
        }

        Ok(records)
    }
}

/// Builds the URL of index page `page`
///
/// A trailing `/` on the base URL is dropped so the template's leading `/`
/// does not double it.
pub fn build_page_url(base_url: &str, template: &str, page: u32) -> String {
    format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        template.replace("{n}", &page.to_string())
    )
}

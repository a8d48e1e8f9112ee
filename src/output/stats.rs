//! Harvest run statistics
//!
//! Counters are filled in by the coordinator and the output handler and
//! printed once the output file has been written.

use chrono::{DateTime, Utc};

/// Harvest statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStats {
    /// When the harvest started
    pub started_at: DateTime<Utc>,

    /// When the last detail page was processed
    pub finished_at: Option<DateTime<Utc>>,

    /// Index pages requested, including the terminating empty page
    pub index_pages_fetched: u32,

    /// Listing stubs collected from index pages
    pub listings_discovered: usize,

    /// Detail pages requested
    pub detail_pages_fetched: usize,

    /// Detail pages that had no attribute table
    pub detail_pages_without_table: usize,

    /// Columns in the written table, excluding the row index
    pub columns_written: usize,
}

impl HarvestStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            index_pages_fetched: 0,
            listings_discovered: 0,
            detail_pages_fetched: 0,
            detail_pages_without_table: 0,
            columns_written: 0,
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Run duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

impl Default for HarvestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &HarvestStats) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        println!("  Duration: {}s", seconds);
    }
    println!();

    println!("Pages:");
    println!("  Index pages fetched: {}", stats.index_pages_fetched);
    println!("  Listings discovered: {}", stats.listings_discovered);
    println!("  Detail pages fetched: {}", stats.detail_pages_fetched);
    println!(
        "  Detail pages without attribute table: {}",
        stats.detail_pages_without_table
    );
    println!();

    println!("Output:");
    println!("  Columns written: {}", stats.columns_written);
}

//! Output handler traits
//!
//! This module defines the trait interface for writing harvested records and
//! the errors an output handler can report.

use crate::listing::ListingRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// A handler receives the complete collection once enrichment is done; the
/// collection is not modified afterwards.
pub trait OutputHandler {
    /// Writes all records
    ///
    /// # Returns
    ///
    /// The number of data columns written, excluding any row-index column
    fn write_records(&mut self, records: &[ListingRecord]) -> OutputResult<usize>;
}

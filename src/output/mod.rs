//! Output module for persisting harvest results
//!
//! This module handles:
//! - Writing the record collection as a delimited table
//! - Recording and printing run statistics

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{collect_columns, save_csv, write_table, CsvOutputHandler};
pub use stats::{print_statistics, HarvestStats};
pub use traits::{OutputError, OutputHandler, OutputResult};

//! Delimited table output
//!
//! Records have no fixed schema, so the column set is computed at write time
//! as the union of all record keys in order of first appearance. Keys a record
//! lacks become empty cells.

use crate::config::OutputConfig;
use crate::listing::ListingRecord;
use crate::output::traits::{OutputHandler, OutputResult};
use csv::WriterBuilder;
use indexmap::IndexSet;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes records to a delimited file on disk
#[derive(Debug, Clone)]
pub struct CsvOutputHandler {
    path: PathBuf,
    delimiter: u8,
    index_column: bool,
}

impl CsvOutputHandler {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8, index_column: bool) -> Self {
        Self {
            path: path.into(),
            delimiter,
            index_column,
        }
    }

    /// Creates a handler using the delimiter and index settings of `config`
    ///
    /// The delimiter is assumed to have passed config validation; anything
    /// else falls back to a comma.
    pub fn from_config(path: impl Into<PathBuf>, config: &OutputConfig) -> Self {
        let delimiter = match config.delimiter.as_bytes() {
            [byte] => *byte,
            _ => b',',
        };
        Self::new(path, delimiter, config.index_column)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for CsvOutputHandler {
    fn write_records(&mut self, records: &[ListingRecord]) -> OutputResult<usize> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = std::fs::File::create(&self.path)?;
        let columns = write_table(file, records, self.delimiter, self.index_column)?;

        tracing::info!(
            "Wrote {} rows x {} columns to {}",
            records.len(),
            columns,
            self.path.display()
        );
        Ok(columns)
    }
}

/// Writes `records` to `path` using the `[output]` settings
///
/// Returns the number of columns written.
pub fn save_csv(
    path: impl Into<PathBuf>,
    config: &OutputConfig,
    records: &[ListingRecord],
) -> crate::Result<usize> {
    let mut handler = CsvOutputHandler::from_config(path, config);
    Ok(handler.write_records(records)?)
}

/// Union of all record keys, in order of first appearance
pub fn collect_columns(records: &[ListingRecord]) -> IndexSet<String> {
    let mut columns = IndexSet::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.insert(key.to_string());
            }
        }
    }
    columns
}

/// Writes `records` as a delimited table to any writer
///
/// With `index_column` set, the first column has an empty header and holds the
/// zero-based row number.
///
/// # Returns
///
/// The number of data columns, excluding the row-index column
pub fn write_table<W: Write>(
    writer: W,
    records: &[ListingRecord],
    delimiter: u8,
    index_column: bool,
) -> OutputResult<usize> {
    let columns = collect_columns(records);
    let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if index_column {
        header.push("");
    }
    header.extend(columns.iter().map(String::as_str));
    wtr.write_record(&header)?;

    for (i, record) in records.iter().enumerate() {
        let index = i.to_string();
        let mut row: Vec<&str> = Vec::with_capacity(columns.len() + 1);
        if index_column {
            row.push(&index);
        }
        row.extend(columns.iter().map(|column| record.get(column).unwrap_or("")));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(columns.len())
}

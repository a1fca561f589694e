//! CSV loading for input records.
//!
//! Reads a headered CSV file and extracts the configured label column
//! into [`Record`] values.

use crate::models::Record;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Options controlling how records are read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Header name of the label column.
    pub column: String,
    /// Field delimiter.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            column: "Ethnicity".to_string(),
            delimiter: b',',
        }
    }
}

impl From<&crate::config::DataConfig> for LoadOptions {
    fn from(config: &crate::config::DataConfig) -> Self {
        Self {
            column: config.column.clone(),
            delimiter: config.delimiter_byte(),
        }
    }
}

/// Errors raised while loading records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },
    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Load records from a CSV file.
pub fn load_records(path: &Path, options: &LoadOptions) -> Result<Vec<Record>, LoadError> {
    debug!("Opening {}", path.display());
    let file = std::fs::File::open(path)?;
    load_records_from_reader(file, options)
}

/// Load records from any reader producing CSV text.
pub fn load_records_from_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<Vec<Record>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    // Bytes, not strings: a stray non-UTF-8 byte must not abort the load
    let headers = rdr.byte_headers()?.clone();
    let index = column_index(&headers, &options.column).ok_or_else(|| {
        LoadError::MissingColumn {
            column: options.column.clone(),
            available: headers
                .iter()
                .map(|h| String::from_utf8_lossy(h).into_owned())
                .collect::<Vec<_>>()
                .join(", "),
        }
    })?;

    let mut records = Vec::new();
    let mut short_rows = 0usize;

    for result in rdr.byte_records() {
        let row = result?;
        let label = match row.get(index) {
            Some(value) => String::from_utf8_lossy(value).into_owned(),
            None => {
                short_rows += 1;
                String::new()
            }
        };
        records.push(Record::new(label));
    }

    if short_rows > 0 {
        warn!(
            "{} row(s) had no '{}' field; counted with an empty label",
            short_rows, options.column
        );
    }

    debug!("Loaded {} records", records.len());
    Ok(records)
}

/// Find the column index, preferring an exact header match.
fn column_index(headers: &csv::ByteRecord, column: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h == column.as_bytes())
        .or_else(|| {
            headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim() == column.trim())
        })
}

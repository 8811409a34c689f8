//! Dataset formatter - wide tables to canonical long format
//!
//! Pure reshaping: every present cell of every input becomes one
//! observation. Missing cells are dropped. The output is sorted by
//! identifier then timestamp, and keys must be unique across all inputs.

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::models::{LongTable, Observation, WideInput};

/// Errors from reading, reshaping or writing datasets
#[derive(Debug, Error)]
pub enum FormatError {
    /// File could not be read or written
    #[error("{path}: {source}")]
    Io {
        /// The file
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV
    #[error("{path}: {source}")]
    Csv {
        /// The file
        path: String,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// Malformed Parquet file
    #[error("{path}: {source}")]
    Parquet {
        /// The file
        path: String,
        /// The underlying Parquet error
        #[source]
        source: parquet::errors::ParquetError,
    },

    /// A Parquet column could not be converted
    #[error("{path}: {source}")]
    Arrow {
        /// The file
        path: String,
        /// The underlying Arrow error
        #[source]
        source: arrow::error::ArrowError,
    },

    /// A source table has no entity columns
    #[error("{0}: no entity columns")]
    EmptyTable(String),

    /// A date cell could not be parsed
    #[error("{path}: row {row}: invalid date '{value}'")]
    InvalidDate {
        /// The file
        path: String,
        /// 1-based data row
        row: usize,
        /// The raw cell
        value: String,
    },

    /// A row has more cells than the header has columns
    #[error("{path}: row {row}: {found} cells but {expected} columns")]
    RowWidth {
        /// The file
        path: String,
        /// 1-based data row
        row: usize,
        /// Number of header columns
        expected: usize,
        /// Number of cells in the row
        found: usize,
    },

    /// A value cell could not be parsed
    #[error("{path}: row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        /// The file
        path: String,
        /// 1-based data row
        row: usize,
        /// The column header
        column: String,
        /// The raw cell
        value: String,
    },

    /// The divisor is zero or not a finite number
    #[error("invalid divisor {0}")]
    InvalidDivisor(f64),

    /// Two cells map to the same identifier and date
    #[error("duplicate observation for '{identifier}' on {timestamp}")]
    DuplicateObservation {
        /// The repeated identifier
        identifier: String,
        /// The repeated date
        timestamp: NaiveDate,
    },
}

/// Reshape wide inputs into one long table
///
/// # Errors
///
/// Returns [`FormatError::DuplicateObservation`] when two cells produce the
/// same `(identifier, timestamp)` key, for example the same column appearing
/// in two inputs without distinct group labels.
pub fn melt(inputs: &[WideInput]) -> Result<LongTable, FormatError> {
    let capacity = inputs.iter().map(|i| i.table.cell_count()).sum();
    let mut rows: Vec<Observation> = Vec::with_capacity(capacity);

    for input in inputs {
        let identifiers: Vec<String> =
            input.table.columns.iter().map(|c| input.labels.identifier(c)).collect();

        for (date, values) in input.table.dates.iter().zip(&input.table.rows) {
            for (identifier, value) in identifiers.iter().zip(values) {
                if let Some(value) = value {
                    rows.push(Observation {
                        identifier: identifier.clone(),
                        timestamp: *date,
                        value: *value,
                    });
                }
            }
        }
    }

    rows.sort_by(|a, b| {
        a.identifier.cmp(&b.identifier).then_with(|| a.timestamp.cmp(&b.timestamp))
    });

    if let Some(pair) = rows
        .windows(2)
        .find(|w| w[0].identifier == w[1].identifier && w[0].timestamp == w[1].timestamp)
    {
        return Err(FormatError::DuplicateObservation {
            identifier: pair[0].identifier.clone(),
            timestamp: pair[0].timestamp,
        });
    }

    log::debug!("melted {} input(s) into {} rows", inputs.len(), rows.len());
    Ok(LongTable::from_sorted(rows))
}

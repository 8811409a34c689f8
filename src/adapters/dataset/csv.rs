//! CSV dataset files

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::{IDENTIFIER_COLUMN, TIMESTAMP_COLUMN, VALUE_COLUMN, WideOptions, parse_date};
use crate::core::models::{LongTable, WideTable};
use crate::core::services::formatter::FormatError;

const MISSING_MARKERS: [&str; 4] = ["", "NaN", "nan", "NA"];

/// Read a wide CSV file
pub fn read_wide(path: &Path, options: &WideOptions) -> Result<WideTable, FormatError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| FormatError::Io {
        path: display.clone(),
        source,
    })?;
    read_wide_from(file, &display, options)
}

/// Read a wide CSV table from any reader; `name` is used in error messages
///
/// Rows shorter than the header are padded with missing cells. Rows longer
/// than the header are an error.
pub fn read_wide_from<R: Read>(
    reader: R,
    name: &str,
    options: &WideOptions,
) -> Result<WideTable, FormatError> {
    let csv_err = |source| FormatError::Csv {
        path: name.to_string(),
        source,
    };

    let mut reader =
        csv::ReaderBuilder::new().trim(csv::Trim::All).flexible(true).from_reader(reader);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let columns: Vec<String> = headers.iter().skip(1).map(ToString::to_string).collect();
    if columns.is_empty() {
        return Err(FormatError::EmptyTable(name.to_string()));
    }

    let mut table = WideTable {
        dates: Vec::new(),
        columns,
        rows: Vec::new(),
    };

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let row = i + 1;
        if record.len() > headers.len() {
            return Err(FormatError::RowWidth {
                path: name.to_string(),
                row,
                expected: headers.len(),
                found: record.len(),
            });
        }

        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| FormatError::InvalidDate {
            path: name.to_string(),
            row,
            value: raw_date.to_string(),
        })?;

        let mut values = Vec::with_capacity(table.columns.len());
        for (column, cell) in table.columns.iter().zip(record.iter().skip(1)) {
            values.push(parse_value(cell, options).ok_or_else(|| FormatError::InvalidValue {
                path: name.to_string(),
                row,
                column: column.clone(),
                value: cell.to_string(),
            })?);
        }
        values.resize(table.columns.len(), None);

        table.dates.push(date);
        table.rows.push(values);
    }

    log::debug!("{name}: {} dates x {} columns", table.dates.len(), table.columns.len());
    Ok(table)
}

/// `Some(None)` for a missing cell, `None` for an unparseable one
fn parse_value(cell: &str, options: &WideOptions) -> Option<Option<f64>> {
    if MISSING_MARKERS.contains(&cell) {
        return Some(None);
    }
    let value: f64 = cell.parse().ok()?;
    Some(options.apply(value))
}

/// Write a long table as a CSV file
pub fn write_long(path: &Path, table: &LongTable) -> Result<(), FormatError> {
    let display = path.display().to_string();
    let file = File::create(path).map_err(|source| FormatError::Io {
        path: display.clone(),
        source,
    })?;
    write_long_to(file, &display, table)
}

/// Write a long table to any writer; `name` is used in error messages
pub fn write_long_to<W: Write>(writer: W, name: &str, table: &LongTable) -> Result<(), FormatError> {
    let csv_err = |source| FormatError::Csv {
        path: name.to_string(),
        source,
    };

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record([IDENTIFIER_COLUMN, TIMESTAMP_COLUMN, VALUE_COLUMN]).map_err(csv_err)?;
    for row in table.rows() {
        let date = row.timestamp.format("%Y-%m-%d").to_string();
        let value = row.value.to_string();
        writer.write_record([row.identifier.as_str(), date.as_str(), value.as_str()]).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| FormatError::Io {
        path: name.to_string(),
        source,
    })?;
    Ok(())
}

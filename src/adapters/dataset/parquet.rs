//! Parquet dataset files
//!
//! Wide files take their dates from the first column, or from the
//! `__index_level_0__` column when the file was written from a pandas frame
//! with a date index. Dates may be stored as `date32`, `date64`, timestamps,
//! `YYYYMMDD` integers or text. Every other column is cast to `f64`.
//!
//! Long files are written with `unique_id: utf8`, `ds: date32` and
//! `y: float64`.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::compute::{CastOptions, cast_with_options};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::{IDENTIFIER_COLUMN, TIMESTAMP_COLUMN, VALUE_COLUMN, WideOptions, parse_date};
use crate::core::models::{LongTable, WideTable};
use crate::core::services::formatter::FormatError;

const PANDAS_INDEX_COLUMN: &str = "__index_level_0__";

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_FROM_CE: i32 = 719_163;

/// Read a wide Parquet file
pub fn read_wide(path: &Path, options: &WideOptions) -> Result<WideTable, FormatError> {
    let name = path.display().to_string();
    let parquet_err = |source| FormatError::Parquet {
        path: name.clone(),
        source,
    };
    let arrow_err = |source| FormatError::Arrow {
        path: name.clone(),
        source,
    };

    let file = File::open(path).map_err(|source| FormatError::Io {
        path: name.clone(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let schema = Arc::clone(builder.schema());

    let date_index = schema.index_of(PANDAS_INDEX_COLUMN).unwrap_or(0);
    let value_indices: Vec<usize> = (0..schema.fields().len()).filter(|&i| i != date_index).collect();
    let columns: Vec<String> = value_indices.iter().map(|&i| schema.field(i).name().clone()).collect();
    if columns.is_empty() {
        return Err(FormatError::EmptyTable(name));
    }

    let mut table = WideTable {
        dates: Vec::new(),
        columns,
        rows: Vec::new(),
    };

    for batch in builder.build().map_err(parquet_err)? {
        let batch = batch.map_err(arrow_err)?;
        let first_row = table.dates.len() + 1;
        let dates = date_column(batch.column(date_index), &name, first_row)?;
        let values = value_indices
            .iter()
            .map(|&i| float_column(batch.column(i)).map_err(arrow_err))
            .collect::<Result<Vec<_>, FormatError>>()?;

        for (offset, date) in dates.into_iter().enumerate() {
            let row = values
                .iter()
                .map(|column| {
                    if column.is_null(offset) {
                        None
                    } else {
                        options.apply(column.value(offset))
                    }
                })
                .collect();
            table.dates.push(date);
            table.rows.push(row);
        }
    }

    log::debug!("{name}: {} dates x {} columns", table.dates.len(), table.columns.len());
    Ok(table)
}

/// Cast any numeric column to `f64`, failing on values that do not convert
fn float_column(array: &ArrayRef) -> Result<Float64Array, ArrowError> {
    let options = CastOptions {
        safe: false,
        ..CastOptions::default()
    };
    let cast = cast_with_options(array, &DataType::Float64, &options)?;
    cast.as_any().downcast_ref::<Float64Array>().cloned().ok_or_else(|| {
        ArrowError::CastError(format!("cannot read {} as float64", array.data_type()))
    })
}

/// Dates of one batch; `first_row` is the 1-based row number of its first row
fn date_column(array: &ArrayRef, name: &str, first_row: usize) -> Result<Vec<NaiveDate>, FormatError> {
    let arrow_err = |source| FormatError::Arrow {
        path: name.to_string(),
        source,
    };
    let invalid = |offset: usize, value: String| FormatError::InvalidDate {
        path: name.to_string(),
        row: first_row + offset,
        value,
    };

    match array.data_type() {
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(..) => {
            let days = arrow::compute::cast(array, &DataType::Date32).map_err(arrow_err)?;
            let days = days.as_any().downcast_ref::<Date32Array>().ok_or_else(|| {
                arrow_err(ArrowError::CastError("date column is not date32".to_string()))
            })?;
            (0..days.len())
                .map(|offset| {
                    if days.is_null(offset) {
                        return Err(invalid(offset, String::new()));
                    }
                    let value = days.value(offset);
                    from_epoch_days(value).ok_or_else(|| invalid(offset, value.to_string()))
                })
                .collect()
        },
        _ => {
            let text = arrow::compute::cast(array, &DataType::Utf8).map_err(arrow_err)?;
            let text = text.as_any().downcast_ref::<StringArray>().ok_or_else(|| {
                arrow_err(ArrowError::CastError("date column is not text".to_string()))
            })?;
            (0..text.len())
                .map(|offset| {
                    if text.is_null(offset) {
                        return Err(invalid(offset, String::new()));
                    }
                    let value = text.value(offset);
                    parse_date(value).ok_or_else(|| invalid(offset, value.to_string()))
                })
                .collect()
        },
    }
}

fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    days.checked_add(UNIX_EPOCH_FROM_CE).and_then(NaiveDate::from_num_days_from_ce_opt)
}

fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_FROM_CE
}

/// Arrow schema of long files
#[must_use]
pub fn long_schema() -> Schema {
    Schema::new(vec![
        Field::new(IDENTIFIER_COLUMN, DataType::Utf8, false),
        Field::new(TIMESTAMP_COLUMN, DataType::Date32, false),
        Field::new(VALUE_COLUMN, DataType::Float64, false),
    ])
}

/// Write a long table as a Parquet file
pub fn write_long(path: &Path, table: &LongTable) -> Result<(), FormatError> {
    let name = path.display().to_string();
    let parquet_err = |source| FormatError::Parquet {
        path: name.clone(),
        source,
    };

    let rows = table.rows();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.identifier.as_str()))),
        Arc::new(Date32Array::from_iter_values(rows.iter().map(|r| to_epoch_days(r.timestamp)))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
    ];
    let schema = Arc::new(long_schema());
    let batch = RecordBatch::try_new(Arc::clone(&schema), columns).map_err(|source| {
        FormatError::Arrow {
            path: name.clone(),
            source,
        }
    })?;

    let file = File::create(path).map_err(|source| FormatError::Io {
        path: name.clone(),
        source,
    })?;
    let mut writer = ArrowWriter::try_new(file, schema, None).map_err(parquet_err)?;
    writer.write(&batch).map_err(parquet_err)?;
    writer.close().map_err(parquet_err)?;
    Ok(())
}

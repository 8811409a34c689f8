//! Dataset file adapter
//!
//! Reads source-specific wide tables and writes the canonical long table,
//! as CSV or Parquet depending on the file extension.
//!
//! Wide files carry the date in the first column and one column per entity:
//!
//! ```text
//! date,SMALL LoBM,ME1 BM2,...,BIG HiBM
//! 19630701,-0.45,-0.12,...,0.21
//! ```
//!
//! Long files have exactly three columns:
//!
//! ```text
//! unique_id,ds,y
//! BIG_HiBM,1963-07-01,0.0021
//! ```
//!
//! - `csv` - comma-separated text
//! - `parquet` - Apache Parquet through Arrow record batches

pub mod csv;
pub mod parquet;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::models::{Action, EntityLabels, LongTable, WideInput, WideTable};
use crate::core::services::formatter::{FormatError, melt};

/// Name of the identifier column in long files
pub const IDENTIFIER_COLUMN: &str = "unique_id";

/// Name of the timestamp column in long files
pub const TIMESTAMP_COLUMN: &str = "ds";

/// Name of the value column in long files
pub const VALUE_COLUMN: &str = "y";

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

/// On-disk layout of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Comma-separated text
    Csv,
    /// Apache Parquet
    Parquet,
}

impl DataFormat {
    /// Pick the format from the extension: `.parquet` and `.pq` are Parquet,
    /// anything else is CSV
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq") => {
                Self::Parquet
            },
            _ => Self::Csv,
        }
    }
}

/// How to interpret the cells of a wide file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WideOptions {
    /// Multiplier applied to every value
    #[serde(default = "default_factor")]
    pub scale: f64,

    /// Divisor applied to every value (e.g. `100` for percent returns)
    #[serde(default = "default_factor")]
    pub divisor: f64,

    /// Sentinel values treated as missing (e.g. `-99.99`)
    #[serde(default)]
    pub missing: Vec<f64>,
}

const fn default_factor() -> f64 {
    1.0
}

impl Default for WideOptions {
    fn default() -> Self {
        Self {
            scale: default_factor(),
            divisor: default_factor(),
            missing: Vec::new(),
        }
    }
}

impl WideOptions {
    /// The stored value for a raw number, `None` when it counts as missing
    #[must_use]
    pub fn apply(&self, raw: f64) -> Option<f64> {
        if raw.is_nan() || self.missing.iter().any(|m| (m - raw).abs() < 1e-9) {
            return None;
        }
        Some(raw * self.scale / self.divisor)
    }
}

/// Parse a date cell in any of the accepted forms
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Read a wide CSV or Parquet file
pub fn read_wide(path: &Path, options: &WideOptions) -> Result<WideTable, FormatError> {
    match DataFormat::from_path(path) {
        DataFormat::Csv => csv::read_wide(path, options),
        DataFormat::Parquet => parquet::read_wide(path, options),
    }
}

/// Write a long table as CSV or Parquet, creating parent directories
pub fn write_long(path: &Path, table: &LongTable) -> Result<(), FormatError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| FormatError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    match DataFormat::from_path(path) {
        DataFormat::Csv => csv::write_long(path, table),
        DataFormat::Parquet => parquet::write_long(path, table),
    }
}

/// One wide source of a [`FormatJob`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatInput {
    /// Wide CSV or Parquet file
    pub path: PathBuf,

    /// Group label and column labels for this source
    #[serde(flatten)]
    pub labels: EntityLabels,
}

/// Read wide sources, reshape them, and write one long file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatJob {
    /// Wide sources
    pub inputs: Vec<FormatInput>,

    /// Long output file
    pub output: PathBuf,

    /// Cell interpretation, shared by all inputs
    #[serde(flatten)]
    pub options: WideOptions,
}

impl FormatJob {
    /// Run the job, returning the number of rows written
    pub fn run(&self) -> Result<usize, FormatError> {
        if !self.options.divisor.is_normal() {
            return Err(FormatError::InvalidDivisor(self.options.divisor));
        }

        let inputs = self
            .inputs
            .iter()
            .map(|input| {
                Ok(WideInput {
                    table: read_wide(&input.path, &self.options)?,
                    labels: input.labels.clone(),
                })
            })
            .collect::<Result<Vec<_>, FormatError>>()?;

        let long = melt(&inputs)?;
        write_long(&self.output, &long)?;
        log::info!("wrote {} rows to {}", long.len(), self.output.display());
        Ok(long.len())
    }

    /// Wrap the job as an in-process task action labelled `format`
    #[must_use]
    pub fn into_action(self) -> Action {
        Action::callable("format", move || {
            self.run()?;
            Ok(())
        })
    }
}

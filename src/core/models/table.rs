//! Tabular data models
//!
//! Source files arrive in wide format (one column per portfolio, one row per
//! date). Downstream steps consume long format: one row per observation.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A wide table: dates down the side, entities across the top
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    /// Row index
    pub dates: Vec<NaiveDate>,

    /// Entity column names, in file order
    pub columns: Vec<String>,

    /// `rows[i][j]` is the value of `columns[j]` on `dates[i]`; `None` when missing
    pub rows: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    /// Number of cells, present or missing
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.dates.len() * self.columns.len()
    }
}

/// Maps raw column names to identifiers, optionally under a group label
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLabels {
    /// Prefix joined to every identifier with `_`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Explicit identifier per raw column name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl EntityLabels {
    /// Labels under a group prefix
    pub fn grouped(group: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            labels: HashMap::new(),
        }
    }

    /// Add an explicit label for a raw column
    #[must_use]
    pub fn with_label(mut self, column: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.labels.insert(column.into(), identifier.into());
        self
    }

    /// Identifier for a raw column name
    ///
    /// Unmapped names have surrounding whitespace trimmed and inner
    /// whitespace runs replaced by `_` (`"SMALL LoBM"` becomes `"SMALL_LoBM"`).
    #[must_use]
    pub fn identifier(&self, column: &str) -> String {
        let base = self.labels.get(column).cloned().unwrap_or_else(|| {
            column.split_whitespace().collect::<Vec<_>>().join("_")
        });
        match &self.group {
            Some(group) => format!("{group}_{base}"),
            None => base,
        }
    }
}

/// One wide table and how to name its entities
#[derive(Debug, Clone, Default)]
pub struct WideInput {
    /// The table
    pub table: WideTable,
    /// Its entity labels
    pub labels: EntityLabels,
}

/// A single long-format row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Entity identifier
    pub identifier: String,
    /// Observation date
    pub timestamp: NaiveDate,
    /// Observed value
    pub value: f64,
}

/// A long-format table, sorted by identifier then timestamp with unique keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTable {
    rows: Vec<Observation>,
}

impl LongTable {
    /// Wrap rows that already satisfy the ordering and uniqueness invariant
    pub(crate) const fn from_sorted(rows: Vec<Observation>) -> Self {
        Self { rows }
    }

    /// The rows
    #[must_use]
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct identifiers, in order
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rows.iter().map(|r| r.identifier.as_str()).collect();
        ids.dedup();
        ids
    }
}

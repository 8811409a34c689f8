//! TOML parser for pipeline.toml files
//!
//! Deserializes the file as written. Placeholders, globs and relative
//! paths are left untouched here; the loader resolves them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ProjectSection;
use crate::core::models::Verbosity;

/// A pipeline.toml file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineFile {
    /// Project configuration
    #[serde(default)]
    pub project: ProjectSection,

    /// Tasks, in file order
    #[serde(default, rename = "task")]
    pub tasks: Vec<TaskEntry>,
}

/// A `[[task]]` (or `[[task.subtask]]`) entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskEntry {
    /// Task name; subtasks are registered as `parent:name`
    pub name: String,

    /// One-line description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Input files, glob patterns allowed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_dep: Vec<String>,

    /// Files this task produces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,

    /// Tasks that must complete first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub task_dep: Vec<String>,

    /// Steps, run in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionEntry>,

    /// Output verbosity for this task's commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,

    /// Whether `clean` removes this task's targets
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clean: bool,

    /// Grouped subtasks
    #[serde(default, rename = "subtask", skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<TaskEntry>,
}

/// An entry of a task's `actions` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionEntry {
    /// A shell command line
    Shell(String),

    /// The built-in dataset formatter
    Format {
        /// Formatter settings
        format: FormatEntry,
    },
}

/// Settings of a `format` action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatEntry {
    /// Long-format output file
    pub output: String,

    /// Multiplier applied to every value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,

    /// Divisor applied to every value (`100` for percent returns)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divisor: Option<f64>,

    /// Sentinel values treated as missing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<f64>,

    /// Wide source files
    pub inputs: Vec<InputEntry>,
}

/// One source of a `format` action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputEntry {
    /// Wide CSV or Parquet file
    pub path: String,

    /// Prefix for every identifier from this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Explicit identifiers per raw column name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// Parse pipeline.toml content
pub fn parse(content: &str) -> Result<PipelineFile, toml::de::Error> {
    toml::from_str(content)
}

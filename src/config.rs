//! Project configuration
//!
//! Resolved once at startup from the `[project]` table of `pipeline.toml`.
//! Every directory is absolute and normalized, so tasks never depend on the
//! process working directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::models::Verbosity;
use crate::paths::{self, DEFAULT_DATA_DIR, DEFAULT_OUTPUT_DIR};

/// The `[project]` table as written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectSection {
    /// Data directory, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Output directory, relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    /// Default verbosity for tasks that do not set one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Verbosity>,
}

/// Resolved project settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectConfig {
    /// Directory holding `pipeline.toml`
    pub root: PathBuf,

    /// Where raw and formatted datasets live
    pub data_dir: PathBuf,

    /// Where charts, notebooks and other outputs live
    pub output_dir: PathBuf,

    /// Default task verbosity
    pub verbosity: Verbosity,
}

impl ProjectConfig {
    /// Defaults for a project rooted at `root`
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self::from_section(root, &ProjectSection::default())
    }

    /// Resolve a `[project]` table against `root`
    #[must_use]
    pub fn from_section(root: &Path, section: &ProjectSection) -> Self {
        let root = paths::normalize(root);
        let data_dir = section.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR);
        let output_dir = section.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR);
        Self {
            data_dir: paths::resolve(&root, data_dir),
            output_dir: paths::resolve(&root, output_dir),
            verbosity: section.verbosity.unwrap_or_default(),
            root,
        }
    }

    /// Values for `{root}`, `{data_dir}` and `{output_dir}`
    #[must_use]
    pub fn placeholders(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("root", self.root.display().to_string()),
            ("data_dir", self.data_dir.display().to_string()),
            ("output_dir", self.output_dir.display().to_string()),
        ])
    }

    /// Resolve a path from the pipeline file against the project root
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        paths::resolve(&self.root, path)
    }

    /// Render `path` relative to the root when it lies inside it
    #[must_use]
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root).unwrap_or(path).display().to_string()
    }
}

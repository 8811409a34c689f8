//! Centralized path definitions for ffpipe
//!
//! This module provides a single source of truth for the file names ffpipe
//! looks for and for the way paths are compared.
//!
//! ## Project Layout
//!
//! ```text
//! project/
//! ├── pipeline.toml        # Task definitions
//! ├── src/                 # Scripts and notebooks run by tasks
//! ├── _data/               # Raw and formatted datasets (data_dir)
//! ├── _output/             # Charts and rendered notebooks (output_dir)
//! └── docs/                # Generated site
//! ```
//!
//! Targets and file dependencies are compared after lexical normalization,
//! so `./_data/a.csv` and `_data/a.csv` name the same artifact.

use std::path::{Component, Path, PathBuf};

/// Pipeline definition filename
pub const PIPELINE_FILE: &str = "pipeline.toml";

/// Default data directory, relative to the project root
pub const DEFAULT_DATA_DIR: &str = "_data";

/// Default output directory, relative to the project root
pub const DEFAULT_OUTPUT_DIR: &str = "_output";

/// Find `pipeline.toml` in `from` or its nearest ancestor
#[must_use]
pub fn find_pipeline_file(from: &Path) -> Option<PathBuf> {
    let mut current = Some(from);
    while let Some(dir) = current {
        let candidate = dir.join(PIPELINE_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Lexically normalize a path
///
/// Drops `.` components and folds `..` into the preceding normal component.
/// The filesystem is never consulted, so symlinks are not resolved.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                let last_is_normal =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve `path` against `root` and normalize it
#[must_use]
pub fn resolve(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    }
}

//! Target removal
//!
//! Removes the targets of resolved tasks, dependents first, so files are
//! gone before the directories that hold them are considered.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::error::PipelineError;
use crate::core::models::Task;
use crate::core::ports::FileSystem;

/// A target considered for removal
#[derive(Debug, Clone, Serialize)]
pub struct CleanedTarget {
    /// Owning task
    pub task: String,
    /// The target
    pub path: PathBuf,
    /// Whether it was removed (missing files and non-empty directories are kept)
    pub removed: bool,
}

/// Remove targets of `tasks` that are marked `clean`, or of all of them when `all`
///
/// `tasks` is expected in dependency order, as returned by `resolve`.
pub fn clean(
    tasks: &[&Task],
    fs: &dyn FileSystem,
    all: bool,
) -> Result<Vec<CleanedTarget>, PipelineError> {
    let mut cleaned = Vec::new();

    for task in tasks.iter().rev().filter(|t| all || t.clean) {
        for target in task.targets.iter().rev() {
            let removed = fs.remove(target).map_err(|source| PipelineError::Io {
                task: task.name.clone(),
                path: target.clone(),
                source,
            })?;
            if removed {
                log::info!("{}: removed {}", task.name, target.display());
            }
            cleaned.push(CleanedTarget {
                task: task.name.clone(),
                path: target.clone(),
                removed,
            });
        }
    }

    Ok(cleaned)
}

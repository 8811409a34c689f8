//! Staleness checks
//!
//! A task is up to date when every target exists and none is older than
//! any of its file dependencies. Tasks without targets always run.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::core::error::PipelineError;
use crate::core::models::Task;
use crate::core::ports::FileSystem;

/// Why a task has to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StaleReason {
    /// The task declares no targets
    NoTargets,
    /// A target does not exist
    MissingTarget {
        /// The missing target
        target: PathBuf,
    },
    /// A target is older than a dependency
    OutdatedTarget {
        /// The oldest target
        target: PathBuf,
        /// The newest dependency
        dependency: PathBuf,
    },
    /// Staleness was not consulted
    Forced,
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTargets => write!(f, "no targets"),
            Self::MissingTarget { target } => write!(f, "missing {}", target.display()),
            Self::OutdatedTarget { target, dependency } => {
                write!(f, "{} is older than {}", target.display(), dependency.display())
            },
            Self::Forced => write!(f, "forced"),
        }
    }
}

/// Result of a staleness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Staleness {
    /// Targets are fresh
    UpToDate,
    /// The task must run
    Stale(StaleReason),
}

impl Staleness {
    /// Whether the task must run
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::Stale(_))
    }
}

/// Decides whether tasks need to run, from file timestamps
#[derive(Debug)]
pub struct StalenessChecker<'a, F: FileSystem + ?Sized> {
    fs: &'a F,
}

impl<'a, F: FileSystem + ?Sized> StalenessChecker<'a, F> {
    /// Create a checker reading timestamps from `fs`
    pub const fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Whether `task` must run
    pub fn is_stale(&self, task: &Task) -> Result<bool, PipelineError> {
        Ok(self.check(task)?.is_stale())
    }

    /// Check `task`, with the reason when stale
    ///
    /// Every file dependency must exist, even for tasks without targets;
    /// a missing one means an upstream task did not produce it.
    pub fn check(&self, task: &Task) -> Result<Staleness, PipelineError> {
        let mut newest_dep: Option<(SystemTime, &PathBuf)> = None;
        for dep in &task.file_deps {
            let Some(mtime) = self.timestamp(task, dep)? else {
                return Err(PipelineError::MissingDependency {
                    task: task.name.clone(),
                    path: dep.clone(),
                });
            };
            if newest_dep.is_none_or(|(newest, _)| mtime > newest) {
                newest_dep = Some((mtime, dep));
            }
        }

        if task.is_targetless() {
            return Ok(Staleness::Stale(StaleReason::NoTargets));
        }

        let mut oldest_target: Option<(SystemTime, &PathBuf)> = None;
        for target in &task.targets {
            let Some(mtime) = self.timestamp(task, target)? else {
                return Ok(Staleness::Stale(StaleReason::MissingTarget {
                    target: target.clone(),
                }));
            };
            if oldest_target.is_none_or(|(oldest, _)| mtime < oldest) {
                oldest_target = Some((mtime, target));
            }
        }

        if let (Some((target_time, target)), Some((dep_time, dependency))) =
            (oldest_target, newest_dep)
            && target_time < dep_time
        {
            return Ok(Staleness::Stale(StaleReason::OutdatedTarget {
                target: target.clone(),
                dependency: dependency.clone(),
            }));
        }

        Ok(Staleness::UpToDate)
    }

    fn timestamp(&self, task: &Task, path: &Path) -> Result<Option<SystemTime>, PipelineError> {
        self.fs.modified(path).map_err(|source| PipelineError::Io {
            task: task.name.clone(),
            path: path.to_path_buf(),
            source,
        })
    }
}

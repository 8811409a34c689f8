//! Executor - runs resolved tasks in order
//!
//! Each task is checked for staleness just before it would run, so targets
//! produced earlier in the same run count as fresh inputs. The first failure
//! stops the run; later tasks are reported as not run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use super::staleness::{StaleReason, Staleness, StalenessChecker};
use crate::core::error::{ActionError, PipelineError};
use crate::core::models::{Action, Task, Verbosity};
use crate::core::ports::{CommandRunner, FileSystem};

/// What happened to a task during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Actions ran and succeeded
    Executed,
    /// Targets were fresh; nothing ran
    UpToDate,
    /// The task was attempted and failed
    Failed,
    /// The run stopped before reaching this task
    NotRun,
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Executed => write!(f, "executed"),
            Self::UpToDate => write!(f, "up to date"),
            Self::Failed => write!(f, "failed"),
            Self::NotRun => write!(f, "not run"),
        }
    }
}

/// Per-task entry of a [`RunReport`]
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    /// Task name
    pub task: String,
    /// What happened
    pub outcome: TaskOutcome,
    /// Why the task ran, when it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<StaleReason>,
    /// Number of actions that completed successfully
    pub actions_run: usize,
}

/// Result of a run: one entry per resolved task, plus the error that stopped it
#[derive(Debug, Default)]
pub struct RunReport {
    /// Entries in execution order
    pub tasks: Vec<TaskReport>,
    /// The error that ended the run early
    pub error: Option<PipelineError>,
}

impl RunReport {
    /// Whether every task executed or was up to date
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    /// Names of tasks with the given outcome
    #[must_use]
    pub fn with_outcome(&self, outcome: TaskOutcome) -> Vec<&str> {
        self.tasks.iter().filter(|t| t.outcome == outcome).map(|t| t.task.as_str()).collect()
    }

    /// Total actions run across all tasks
    #[must_use]
    pub fn actions_run(&self) -> usize {
        self.tasks.iter().map(|t| t.actions_run).sum()
    }

    /// The report on success, its error otherwise
    pub fn into_result(mut self) -> Result<Self, PipelineError> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// Runs tasks through a command runner, consulting file timestamps
pub struct Executor<'a> {
    fs: &'a dyn FileSystem,
    runner: &'a dyn CommandRunner,
    default_verbosity: Verbosity,
    verbosity_override: Option<Verbosity>,
    always_execute: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl std::fmt::Debug for Executor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("default_verbosity", &self.default_verbosity)
            .field("verbosity_override", &self.verbosity_override)
            .field("always_execute", &self.always_execute)
            .finish_non_exhaustive()
    }
}

impl<'a> Executor<'a> {
    /// Create an executor
    pub fn new(fs: &'a dyn FileSystem, runner: &'a dyn CommandRunner) -> Self {
        Self {
            fs,
            runner,
            default_verbosity: Verbosity::default(),
            verbosity_override: None,
            always_execute: false,
            cancel: None,
        }
    }

    /// Verbosity for tasks that do not set their own
    #[must_use]
    pub const fn default_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.default_verbosity = verbosity;
        self
    }

    /// Verbosity for every task, overriding per-task settings
    #[must_use]
    pub const fn verbosity_override(mut self, verbosity: Option<Verbosity>) -> Self {
        self.verbosity_override = verbosity;
        self
    }

    /// Run every task regardless of staleness
    #[must_use]
    pub const fn always_execute(mut self, always: bool) -> Self {
        self.always_execute = always;
        self
    }

    /// Stop before the next task once `flag` is set
    #[must_use]
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run `tasks` in the given order
    ///
    /// `tasks` must already be topologically sorted, as returned by
    /// [`TaskGraph::resolve`](super::graph::TaskGraph::resolve).
    pub fn run(&self, tasks: &[&Task]) -> RunReport {
        let checker = StalenessChecker::new(self.fs);
        let mut report = RunReport::default();

        for (position, task) in tasks.iter().enumerate() {
            if self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::SeqCst)) {
                log::warn!("run cancelled before '{}'", task.name);
                report.error = Some(PipelineError::Cancelled {
                    next: task.name.clone(),
                });
                mark_not_run(&mut report, &tasks[position..]);
                break;
            }

            let staleness = if self.always_execute {
                Ok(Staleness::Stale(StaleReason::Forced))
            } else {
                checker.check(task)
            };

            let reason = match staleness {
                Ok(Staleness::UpToDate) => {
                    log::debug!(".  {}", task.name);
                    report.tasks.push(TaskReport {
                        task: task.name.clone(),
                        outcome: TaskOutcome::UpToDate,
                        reason: None,
                        actions_run: 0,
                    });
                    continue;
                },
                Ok(Staleness::Stale(reason)) => reason,
                Err(err) => {
                    log::warn!("{err}");
                    report.tasks.push(TaskReport {
                        task: task.name.clone(),
                        outcome: TaskOutcome::Failed,
                        reason: None,
                        actions_run: 0,
                    });
                    report.error = Some(err);
                    mark_not_run(&mut report, &tasks[position + 1..]);
                    break;
                },
            };

            log::info!("-- {} ({reason})", task.name);
            let (actions_run, result) = self.run_actions(task);
            let failed = result.is_err();
            report.tasks.push(TaskReport {
                task: task.name.clone(),
                outcome: if failed { TaskOutcome::Failed } else { TaskOutcome::Executed },
                reason: Some(reason),
                actions_run,
            });

            if let Err(source) = result {
                log::warn!("task '{}' failed: {source}", task.name);
                report.error = Some(PipelineError::TaskFailed {
                    task: task.name.clone(),
                    source,
                });
                mark_not_run(&mut report, &tasks[position + 1..]);
                break;
            }
        }

        report
    }

    /// Run a task's actions in order, stopping at the first failure
    fn run_actions(&self, task: &Task) -> (usize, Result<(), ActionError>) {
        let verbosity = self
            .verbosity_override
            .or(task.verbosity)
            .unwrap_or(self.default_verbosity);

        let mut completed = 0;
        for action in &task.actions {
            log::debug!("   {}: {}", task.name, action.describe());
            let result = match action {
                Action::Shell(command) => self.runner.run(command, verbosity),
                Action::Callable(callable) => {
                    callable.call().map_err(|source| ActionError::Callable {
                        label: callable.label().to_string(),
                        source,
                    })
                },
            };
            if let Err(err) = result {
                return (completed, Err(err));
            }
            completed += 1;
        }
        (completed, Ok(()))
    }
}

fn mark_not_run(report: &mut RunReport, remaining: &[&Task]) {
    report.tasks.extend(remaining.iter().map(|task| TaskReport {
        task: task.name.clone(),
        outcome: TaskOutcome::NotRun,
        reason: None,
        actions_run: 0,
    }));
}

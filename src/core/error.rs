//! Error taxonomy for building and running a task graph

use std::path::PathBuf;

use thiserror::Error;

/// Errors from registering, resolving, checking or running tasks
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A task with this name is already registered
    #[error("task '{0}' is already registered")]
    DuplicateTask(String),

    /// Two tasks declare the same target
    #[error("task '{task}' declares target {} already produced by task '{producer}'", path.display())]
    DuplicateTarget {
        /// The task being registered
        task: String,
        /// The task that already owns the target
        producer: String,
        /// The contested target
        path: PathBuf,
    },

    /// A task violates a structural invariant
    #[error("task '{task}' is invalid: {reason}")]
    InvalidTask {
        /// The offending task
        task: String,
        /// What is wrong with it
        reason: String,
    },

    /// A requested or referenced task is not registered
    #[error("{}", unknown_task_message(name, referenced_by.as_deref()))]
    UnknownTask {
        /// The missing name
        name: String,
        /// The task that referenced it, if it was not requested directly
        referenced_by: Option<String>,
    },

    /// Task dependencies form a cycle
    #[error("dependency cycle between tasks: {}", tasks.join(" -> "))]
    CyclicDependency {
        /// Every task in the cycle
        tasks: Vec<String>,
    },

    /// A file dependency does not exist
    #[error("task '{task}' depends on missing file {}", path.display())]
    MissingDependency {
        /// The task whose dependency is missing
        task: String,
        /// The missing file
        path: PathBuf,
    },

    /// A file could not be queried or removed
    #[error("task '{task}': cannot access {}", path.display())]
    Io {
        /// The task being checked or cleaned
        task: String,
        /// The file
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An action of a task failed
    #[error("task '{task}' failed")]
    TaskFailed {
        /// The failing task
        task: String,
        /// The failing action's error
        #[source]
        source: ActionError,
    },

    /// The run was cancelled between tasks
    #[error("run cancelled before task '{next}'")]
    Cancelled {
        /// The task that would have run next
        next: String,
    },
}

impl PipelineError {
    /// The task this error is about, when there is one
    #[must_use]
    pub fn task(&self) -> Option<&str> {
        match self {
            Self::DuplicateTask(task)
            | Self::DuplicateTarget { task, .. }
            | Self::InvalidTask { task, .. }
            | Self::MissingDependency { task, .. }
            | Self::Io { task, .. }
            | Self::TaskFailed { task, .. }
            | Self::Cancelled { next: task } => Some(task),
            Self::UnknownTask { name, .. } => Some(name),
            Self::CyclicDependency { tasks } => tasks.first().map(String::as_str),
        }
    }
}

fn unknown_task_message(name: &str, referenced_by: Option<&str>) -> String {
    match referenced_by {
        Some(parent) => format!("task '{parent}' depends on unknown task '{name}'"),
        None => format!("unknown task '{name}'"),
    }
}

/// Errors from a single action
#[derive(Debug, Error)]
pub enum ActionError {
    /// The process could not be started
    #[error("could not start `{command}`")]
    Spawn {
        /// The command line
        command: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The process exited unsuccessfully
    #[error("{}", exit_message(command, *code, stderr))]
    Exit {
        /// The command line
        command: String,
        /// Exit code, `None` when killed by a signal
        code: Option<i32>,
        /// Captured stderr, empty when it was passed through
        stderr: String,
    },

    /// An in-process action returned an error
    #[error("<{label}> failed")]
    Callable {
        /// The action's label
        label: String,
        /// The returned error
        #[source]
        source: anyhow::Error,
    },
}

fn exit_message(command: &str, code: Option<i32>, stderr: &str) -> String {
    let status = code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"));
    let mut msg = format!("`{command}` exited with {status}");
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        msg.push_str(":\n");
        msg.push_str(stderr);
    }
    msg
}

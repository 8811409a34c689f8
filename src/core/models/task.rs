//! Task model
//!
//! A task is a named unit of work: the files it reads, the files it
//! produces, the steps that produce them, and the tasks that must run first.

use std::path::PathBuf;

use super::{Action, Verbosity};

/// A named unit of work
#[derive(Debug, Clone)]
pub struct Task {
    /// Unique name within a graph
    pub name: String,

    /// One-line description shown by `list`
    pub doc: Option<String>,

    /// Files that must exist before the task runs
    pub file_deps: Vec<PathBuf>,

    /// Files the task is responsible for producing
    pub targets: Vec<PathBuf>,

    /// Steps, run strictly in order
    pub actions: Vec<Action>,

    /// Tasks that must complete first, by name
    pub task_deps: Vec<String>,

    /// Output verbosity for this task's actions
    pub verbosity: Option<Verbosity>,

    /// Whether `clean` removes this task's targets
    pub clean: bool,
}

impl Task {
    /// Start building a task with the given name
    pub fn builder(name: impl Into<String>) -> TaskBuilder {
        TaskBuilder::new(name)
    }

    /// Whether this task declares no targets (and so always runs)
    #[must_use]
    pub fn is_targetless(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Builder for [`Task`]
#[derive(Debug, Clone)]
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    /// New builder with no dependencies, targets or actions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            task: Task {
                name: name.into(),
                doc: None,
                file_deps: Vec::new(),
                targets: Vec::new(),
                actions: Vec::new(),
                task_deps: Vec::new(),
                verbosity: None,
                clean: false,
            },
        }
    }

    /// Set the description
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.task.doc = Some(doc.into());
        self
    }

    /// Add a file dependency
    #[must_use]
    pub fn file_dep(mut self, path: impl Into<PathBuf>) -> Self {
        self.task.file_deps.push(path.into());
        self
    }

    /// Add several file dependencies
    #[must_use]
    pub fn file_deps<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.task.file_deps.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add a target
    #[must_use]
    pub fn target(mut self, path: impl Into<PathBuf>) -> Self {
        self.task.targets.push(path.into());
        self
    }

    /// Add several targets
    #[must_use]
    pub fn targets<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.task.targets.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Append an action
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.task.actions.push(action);
        self
    }

    /// Append a shell action
    #[must_use]
    pub fn shell(self, command: impl Into<String>) -> Self {
        self.action(Action::shell(command))
    }

    /// Add a task-level dependency
    #[must_use]
    pub fn task_dep(mut self, name: impl Into<String>) -> Self {
        self.task.task_deps.push(name.into());
        self
    }

    /// Set the output verbosity
    #[must_use]
    pub const fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.task.verbosity = Some(verbosity);
        self
    }

    /// Mark the task's targets as removable by `clean`
    #[must_use]
    pub const fn clean(mut self, clean: bool) -> Self {
        self.task.clean = clean;
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Task {
        self.task
    }
}

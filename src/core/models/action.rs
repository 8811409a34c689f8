//! Action model
//!
//! An action is one step of a task: either an external command or an
//! in-process function. The graph only cares whether it succeeded.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// How much of an action's output reaches the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Verbosity {
    /// Capture stdout and stderr
    Quiet,
    /// Capture stdout, pass stderr through
    #[default]
    Normal,
    /// Pass stdout and stderr through
    Full,
}

impl TryFrom<u8> for Verbosity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Quiet),
            1 => Ok(Self::Normal),
            2 => Ok(Self::Full),
            _ => Err(format!("Invalid verbosity: {value}. Use: 0, 1, 2")),
        }
    }
}

impl From<Verbosity> for u8 {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Quiet => 0,
            Verbosity::Normal => 1,
            Verbosity::Full => 2,
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// An external command run through the system shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// The command line, passed verbatim to the shell
    pub command: String,

    /// Working directory; the runner's root when `None`
    pub cwd: Option<PathBuf>,
}

impl ShellCommand {
    /// Create a command that runs in the runner's root directory
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: None,
        }
    }

    /// Run the command in a specific directory
    #[must_use]
    pub fn in_dir(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

type CallableFn = dyn Fn() -> anyhow::Result<()> + Send + Sync;

/// An in-process step
#[derive(Clone)]
pub struct Callable {
    label: String,
    func: Arc<CallableFn>,
}

impl Callable {
    /// Wrap a closure as an action, with a label used in logs and errors
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// The label given at construction
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Invoke the wrapped closure
    pub fn call(&self) -> anyhow::Result<()> {
        (self.func)()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("label", &self.label).finish_non_exhaustive()
    }
}

/// One step of a task
#[derive(Debug, Clone)]
pub enum Action {
    /// External process
    Shell(ShellCommand),
    /// In-process function
    Callable(Callable),
}

impl Action {
    /// Shorthand for a shell action run in the project root
    pub fn shell(command: impl Into<String>) -> Self {
        Self::Shell(ShellCommand::new(command))
    }

    /// Shorthand for an in-process action
    pub fn callable<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self::Callable(Callable::new(label, func))
    }

    /// Human-readable description for logs and listings
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Shell(cmd) => cmd.command.clone(),
            Self::Callable(callable) => format!("<{}>", callable.label()),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

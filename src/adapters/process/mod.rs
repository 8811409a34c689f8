//! Process adapter
//!
//! Implements the `CommandRunner` port by spawning the system shell.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::error::ActionError;
use crate::core::models::{ShellCommand, Verbosity};
use crate::core::ports::CommandRunner;

/// Runs commands through `sh -c` (`cmd /C` on Windows)
#[derive(Debug, Clone)]
pub struct ShellRunner {
    root: PathBuf,
}

impl ShellRunner {
    /// Runner whose commands start in `root` unless they name their own directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The default working directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn shell(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &ShellCommand, verbosity: Verbosity) -> Result<(), ActionError> {
        let mut cmd = Self::shell(&command.command);
        cmd.current_dir(command.cwd.as_deref().unwrap_or(&self.root)).stdin(Stdio::null());

        let (stdout, stderr) = match verbosity {
            Verbosity::Quiet => (Stdio::piped(), Stdio::piped()),
            Verbosity::Normal => (Stdio::piped(), Stdio::inherit()),
            Verbosity::Full => (Stdio::inherit(), Stdio::inherit()),
        };
        cmd.stdout(stdout).stderr(stderr);

        log::debug!("spawning `{}`", command.command);
        let output = cmd.output().map_err(|source| ActionError::Spawn {
            command: command.command.clone(),
            source,
        })?;

        if output.status.success() {
            return Ok(());
        }

        Err(ActionError::Exit {
            command: command.command.clone(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

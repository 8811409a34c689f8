//! Command runner port
//!
//! Defines how shell actions reach the operating system.

use crate::core::error::ActionError;
use crate::core::models::{ShellCommand, Verbosity};

/// Runs external commands to completion
pub trait CommandRunner {
    /// Run `command`, returning once it has exited
    ///
    /// A non-zero exit is an [`ActionError::Exit`].
    fn run(&self, command: &ShellCommand, verbosity: Verbosity) -> Result<(), ActionError>;
}

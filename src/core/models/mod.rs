//! Domain models for ffpipe
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Task`] - "Run these actions to turn these files into those files"
//! - [`Action`] - One step of a task (shell command or in-process function)
//! - [`WideTable`] / [`LongTable`] - Source and canonical dataset shapes

mod action;
mod table;
mod task;

pub use action::{Action, Callable, ShellCommand, Verbosity};
pub use table::{EntityLabels, LongTable, Observation, WideInput, WideTable};
pub use task::{Task, TaskBuilder};

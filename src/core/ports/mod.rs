//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the task graph logic
//! and the operating system (file timestamps, child processes).
//!
//! Implementations live in the `adapters` module.

mod command_runner;
mod filesystem;

pub use command_runner::CommandRunner;
pub use filesystem::FileSystem;

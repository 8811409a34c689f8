//! Business logic services
//!
//! Orchestration logic over domain models. Filesystem and process access
//! go through the port traits, so every service runs against mocks in tests.
//!
//! - [`graph`] - Task registration and dependency resolution
//! - [`staleness`] - Decide whether a task's targets are fresh
//! - [`executor`] - Run resolved tasks in order
//! - [`cleaner`] - Remove task targets
//! - [`formatter`] - Reshape wide tables into long format

pub mod cleaner;
pub mod executor;
pub mod formatter;
pub mod graph;
pub mod staleness;

pub use cleaner::{CleanedTarget, clean};
pub use executor::{Executor, RunReport, TaskOutcome, TaskReport};
pub use formatter::{FormatError, melt};
pub use graph::TaskGraph;
pub use staleness::{StaleReason, Staleness, StalenessChecker};

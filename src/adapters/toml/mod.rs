//! TOML-based pipeline definitions
//!
//! Loads tasks from `pipeline.toml` files.
//!
//! - [`parser`] - Read and deserialize pipeline.toml files
//! - [`loader`] - Resolve placeholders, globs and subtasks into a task graph
//! - [`writer`] - Write the starter pipeline.toml

pub mod loader;
pub mod parser;
pub mod writer;

pub use loader::{LoadError, Pipeline, build_pipeline, load_pipeline};
pub use parser::{ActionEntry, FormatEntry, InputEntry, PipelineFile, TaskEntry, parse};
pub use writer::{PIPELINE_TEMPLATE, write_pipeline_template};

//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `fs/` - Local filesystem timestamps and removal
//! - `process/` - Shell command execution
//! - `dataset/` - Wide and long dataset files (CSV and Parquet)
//! - `toml/` - `pipeline.toml` parsing, loading and writing

pub mod dataset;
pub mod fs;
pub mod process;
pub mod toml;

pub use self::dataset::{FormatInput, FormatJob, WideOptions};
pub use self::fs::LocalFileSystem;
pub use self::process::ShellRunner;
pub use self::toml::{LoadError, Pipeline, load_pipeline};

//! ffpipe - a file-based task runner for data pipelines
//!
//! Tasks declare the files they read, the files they produce and the steps
//! that produce them. ffpipe runs only the tasks whose outputs are missing
//! or older than their inputs, dependencies first. A built-in formatter
//! reshapes wide return tables into the long `unique_id,ds,y` layout.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod adapters;
pub mod config;
pub mod core;
pub mod output;
pub mod paths;

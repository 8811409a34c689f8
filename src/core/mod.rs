//! Core domain logic for ffpipe
//!
//! This module contains the task graph, staleness rules and execution
//! order. Filesystem and process access are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (Task, Action, wide and long tables)
//! - `services/` - Graph resolution, staleness, execution, formatting
//! - `ports/` - Trait definitions for external dependencies
//! - `error` - Error taxonomy shared by the services

pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{ActionError, PipelineError};

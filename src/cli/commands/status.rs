//! Report which tasks are stale

use std::path::Path;

use ffpipe::adapters::LocalFileSystem;
use ffpipe::core::PipelineError;
use ffpipe::core::services::{Staleness, StalenessChecker};
use ffpipe::output::{OutputMode, StatusResult, TaskStatus};

/// Check the named tasks and their dependencies without running anything
///
/// A missing file dependency that another task produces is reported as
/// stale rather than as an error, since a run would create it first.
pub fn status(file: Option<&Path>, tasks: &[String], mode: OutputMode) -> anyhow::Result<()> {
    let pipeline = super::load(file)?;
    let selected = pipeline.graph.resolve(tasks)?;

    let fs = LocalFileSystem::new();
    let checker = StalenessChecker::new(&fs);
    let mut statuses = Vec::with_capacity(selected.len());

    for task in selected {
        let status = match checker.check(task) {
            Ok(Staleness::UpToDate) => TaskStatus {
                name: task.name.clone(),
                stale: false,
                reason: None,
            },
            Ok(Staleness::Stale(reason)) => TaskStatus {
                name: task.name.clone(),
                stale: true,
                reason: Some(reason.to_string()),
            },
            Err(PipelineError::MissingDependency { path, .. })
                if pipeline.graph.producer_of(&path).is_some() =>
            {
                TaskStatus {
                    name: task.name.clone(),
                    stale: true,
                    reason: Some(format!("waiting for {}", pipeline.config.display_path(&path))),
                }
            },
            Err(err) => return Err(err.into()),
        };
        statuses.push(status);
    }

    StatusResult { tasks: statuses }.render(mode);
    Ok(())
}

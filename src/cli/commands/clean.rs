//! Remove task targets

use std::path::Path;

use ffpipe::adapters::LocalFileSystem;
use ffpipe::core::services::clean as clean_targets;
use ffpipe::output::{CleanResult, OutputMode};

/// Remove targets of the named tasks and their dependencies
pub fn clean(
    file: Option<&Path>,
    tasks: &[String],
    all: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let pipeline = super::load(file)?;
    let selected = pipeline.graph.resolve(tasks)?;
    let targets = clean_targets(&selected, &LocalFileSystem::new(), all)?;
    CleanResult { targets }.render(mode);
    Ok(())
}

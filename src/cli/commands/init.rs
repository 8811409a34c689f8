//! Write a starter pipeline.toml

use std::path::Path;

use anyhow::Context;

use ffpipe::adapters::toml::write_pipeline_template;
use ffpipe::output::{OperationResult, OutputMode};
use ffpipe::paths::PIPELINE_FILE;

/// Create `pipeline.toml` in the current directory
pub fn init(force: bool, mode: OutputMode) -> anyhow::Result<()> {
    let path = Path::new(PIPELINE_FILE);
    let written = write_pipeline_template(path, force)
        .with_context(|| format!("cannot write {PIPELINE_FILE}"))?;

    let message = if written {
        format!("Created {PIPELINE_FILE}\n\nNext steps:\n  ffpipe list\n  ffpipe run")
    } else {
        format!("{PIPELINE_FILE} already exists. Use --force to overwrite.")
    };
    OperationResult {
        success: written,
        message,
    }
    .render(mode);
    Ok(())
}

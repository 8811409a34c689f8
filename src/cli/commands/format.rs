//! Reshape wide CSV or Parquet files from the command line

use std::path::PathBuf;

use anyhow::Context;

use ffpipe::adapters::{FormatInput, FormatJob, WideOptions};
use ffpipe::core::models::EntityLabels;
use ffpipe::output::{FormatResult, OutputMode};

/// Melt `inputs` into a single long file at `output`
pub fn format(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    group: Option<String>,
    options: WideOptions,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let labels = EntityLabels {
        group,
        ..EntityLabels::default()
    };
    let job = FormatJob {
        inputs: inputs
            .into_iter()
            .map(|path| FormatInput {
                path,
                labels: labels.clone(),
            })
            .collect(),
        output,
        options,
    };

    let rows = job.run().with_context(|| format!("cannot format {}", job.output.display()))?;
    FormatResult {
        output: job.output.display().to_string(),
        rows,
    }
    .render(mode);
    Ok(())
}

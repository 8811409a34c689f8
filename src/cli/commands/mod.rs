//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::Context;

use ffpipe::adapters::{Pipeline, load_pipeline};
use ffpipe::paths;

mod clean;
mod format;
mod init;
mod list;
mod run;
mod status;

pub use clean::clean;
pub use format::format;
pub use init::init;
pub use list::list;
pub use run::run;
pub use status::status;

/// Locate and load the pipeline file
///
/// An explicit `file` wins; otherwise the nearest `pipeline.toml` in the
/// current directory or its ancestors is used.
fn load(file: Option<&Path>) -> anyhow::Result<Pipeline> {
    let path: PathBuf = match file {
        Some(path) => path.to_path_buf(),
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            paths::find_pipeline_file(&cwd).with_context(|| {
                format!(
                    "no {} found in {} or its parents (run 'ffpipe init' to create one)",
                    paths::PIPELINE_FILE,
                    cwd.display()
                )
            })?
        },
    };
    let pipeline = load_pipeline(&path)?;
    log::debug!("project root: {}", pipeline.config.root.display());
    Ok(pipeline)
}

//! TOML writer for pipeline.toml files
//!
//! Writes the starter pipeline used by `ffpipe init`: pull the Fama-French
//! 25 portfolio files, format them into long datasets, render the summary
//! notebook and charts, and build the documentation site.

use std::fs;
use std::io;
use std::path::Path;

/// Starter pipeline.toml content
pub const PIPELINE_TEMPLATE: &str = r#"# ffpipe pipeline

[project]
data_dir = "_data"
output_dir = "_output"

[[task]]
name = "config"
doc = "Create empty directories for data and output if they don't exist"
targets = ["{data_dir}", "{output_dir}"]
actions = ["mkdir -p {data_dir}", "mkdir -p {output_dir}"]

[[task]]
name = "pull"
doc = "Pull Fama-French portfolio data"
file_dep = ["./src/pull_fama_french_25_portfolios.py"]
targets = [
  "{data_dir}/french_portfolios_25_daily_size_and_bm.parquet",
  "{data_dir}/french_portfolios_25_daily_size_and_op.parquet",
  "{data_dir}/french_portfolios_25_daily_size_and_inv.parquet",
]
task_dep = ["config"]
actions = ["python ./src/pull_fama_french_25_portfolios.py"]

[[task]]
name = "format"
doc = "Format data into standardized datasets"
file_dep = [
  "{data_dir}/french_portfolios_25_daily_size_and_bm.parquet",
  "{data_dir}/french_portfolios_25_daily_size_and_op.parquet",
  "{data_dir}/french_portfolios_25_daily_size_and_inv.parquet",
]
targets = [
  "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_bm.parquet",
  "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_op.parquet",
  "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_inv.parquet",
]
clean = true
actions = [
  { format = { output = "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_bm.parquet", divisor = 100, missing = [-99.99, -999.0], inputs = [
    { path = "{data_dir}/french_portfolios_25_daily_size_and_bm.parquet" },
  ] } },
  { format = { output = "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_op.parquet", divisor = 100, missing = [-99.99, -999.0], inputs = [
    { path = "{data_dir}/french_portfolios_25_daily_size_and_op.parquet" },
  ] } },
  { format = { output = "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_inv.parquet", divisor = 100, missing = [-99.99, -999.0], inputs = [
    { path = "{data_dir}/french_portfolios_25_daily_size_and_inv.parquet" },
  ] } },
]

[[task]]
name = "run_notebooks"
doc = "Execute notebooks and export them for presentation"

[[task.subtask]]
name = "summary_ken_french_ipynb"
file_dep = [
  "./src/summary_ken_french_ipynb.py",
  "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_bm.parquet",
]
targets = ["{output_dir}/summary_ken_french_ipynb.html"]
clean = true
actions = [
  "ipynb-py-convert ./src/summary_ken_french_ipynb.py ./src/summary_ken_french_ipynb.ipynb",
  "jupyter nbconvert --execute --to notebook --ClearMetadataPreprocessor.enabled=True --inplace ./src/summary_ken_french_ipynb.ipynb",
  "jupyter nbconvert --to html --output-dir={output_dir} ./src/summary_ken_french_ipynb.ipynb",
  "mkdir -p {output_dir} && mv ./src/summary_ken_french_ipynb.ipynb {output_dir}",
]

[[task]]
name = "generate_charts"
doc = "Generate interactive HTML charts"
file_dep = [
  "./src/generate_chart.py",
  "{data_dir}/ftsfr_french_portfolios_25_daily_size_and_bm.parquet",
]
targets = [
  "{output_dir}/french_portfolios_replication.html",
  "{output_dir}/french_portfolios_cumulative_returns.html",
]
task_dep = ["format"]
verbosity = 2
actions = ["python ./src/generate_chart.py"]

[[task]]
name = "generate_pipeline_site"
doc = "Build the documentation site"
file_dep = [
  "chartbook.toml",
  "./src/summary_ken_french_ipynb.py",
  "{output_dir}/french_portfolios_replication.html",
  "{output_dir}/french_portfolios_cumulative_returns.html",
]
targets = ["docs/index.html"]
task_dep = ["run_notebooks", "generate_charts"]
actions = ["chartbook build -f"]
"#;

/// Write [`PIPELINE_TEMPLATE`] to `path`
///
/// Returns `false` without touching the file when it exists and `force` is
/// not set.
pub fn write_pipeline_template(path: &Path, force: bool) -> io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, PIPELINE_TEMPLATE)?;
    Ok(true)
}

//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands;
use ffpipe::adapters::WideOptions;
use ffpipe::core::models::Verbosity;
use ffpipe::output::OutputMode;

/// ffpipe - file-based task runner for data pipelines
#[derive(Parser, Debug)]
#[command(
    name = "ffpipe",
    version,
    about = "File-based task runner for data pipelines",
    long_about = "Run the tasks declared in pipeline.toml.\n\n\
                  A task runs only when one of its targets is missing or older\n\
                  than one of its file dependencies. Dependencies run first."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Pipeline file (default: nearest pipeline.toml)
    #[arg(short = 'f', long = "file", global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run tasks (all tasks when none are named)
    Run {
        /// Tasks to run, with their dependencies
        tasks: Vec<String>,

        /// Action output: 0 captures all, 1 passes stderr, 2 passes all
        #[arg(long, value_parser = parse_verbosity)]
        verbosity: Option<Verbosity>,

        /// Run tasks even when their targets are up to date
        #[arg(short, long)]
        always_execute: bool,
    },

    /// List tasks
    List {
        /// Show each task's dependencies
        #[arg(long)]
        deps: bool,
    },

    /// Show which tasks are stale, without running anything
    Status {
        /// Tasks to check, with their dependencies
        tasks: Vec<String>,
    },

    /// Remove task targets
    Clean {
        /// Tasks to clean, with their dependencies
        tasks: Vec<String>,

        /// Also clean tasks not marked `clean`
        #[arg(long)]
        all: bool,
    },

    /// Reshape wide CSV or Parquet files into one long file
    Format {
        /// Wide CSV or Parquet files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Long output file (`.parquet` writes Parquet, anything else CSV)
        #[arg(short, long)]
        output: PathBuf,

        /// Group label prefixed to every identifier
        #[arg(short, long)]
        group: Option<String>,

        /// Multiplier applied to every value
        #[arg(short, long, default_value_t = 1.0)]
        scale: f64,

        /// Divisor applied to every value (100 for percent returns)
        #[arg(short, long, default_value_t = 1.0)]
        divisor: f64,

        /// Sentinel value treated as missing (repeatable)
        #[arg(short, long, allow_negative_numbers = true)]
        missing: Vec<f64>,
    },

    /// Write a starter pipeline.toml in the current directory
    Init {
        /// Overwrite an existing pipeline.toml
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

fn parse_verbosity(raw: &str) -> Result<Verbosity, String> {
    let level: u8 = raw.parse().map_err(|_| format!("Invalid verbosity: {raw}. Use: 0, 1, 2"))?;
    Verbosity::try_from(level)
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let file = cli.file.as_deref();

    match cli.command {
        Some(Command::Run {
            tasks,
            verbosity,
            always_execute,
        }) => commands::run(file, &tasks, verbosity, always_execute, output_mode),
        Some(Command::List { deps }) => commands::list(file, deps, output_mode),
        Some(Command::Status { tasks }) => commands::status(file, &tasks, output_mode),
        Some(Command::Clean { tasks, all }) => commands::clean(file, &tasks, all, output_mode),
        Some(Command::Format {
            inputs,
            output,
            group,
            scale,
            divisor,
            missing,
        }) => commands::format(
            inputs,
            output,
            group,
            WideOptions {
                scale,
                divisor,
                missing,
            },
            output_mode,
        ),
        Some(Command::Init { force }) => commands::init(force, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": ffpipe::VERSION
                    })
                );
            } else {
                println!("ffpipe v{}", ffpipe::VERSION);
            }
            Ok(())
        },
        None => commands::run(file, &[], None, false, output_mode),
    }
}

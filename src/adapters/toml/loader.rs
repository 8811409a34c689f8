//! Pipeline loader
//!
//! Turns a parsed pipeline.toml into a [`TaskGraph`]:
//!
//! - `{root}`, `{data_dir}` and `{output_dir}` are expanded in paths and
//!   commands (`${VAR}` is left for the shell)
//! - relative paths are resolved against the project root
//! - file dependencies with glob metacharacters are expanded
//! - `[[task.subtask]]` entries become `parent:child` tasks the parent
//!   depends on

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use super::parser::{self, ActionEntry, FormatEntry, PipelineFile, TaskEntry};
use crate::adapters::dataset::{FormatInput, FormatJob, WideOptions};
use crate::config::ProjectConfig;
use crate::core::error::PipelineError;
use crate::core::models::{Action, EntityLabels, Task, TaskBuilder};
use crate::core::services::TaskGraph;
use crate::paths;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\$?)\{(\w+)\}").expect("placeholder pattern is valid")
});

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

/// Errors from loading a pipeline file
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file or a globbed path could not be read
    #[error("cannot read {}", path.display())]
    Io {
        /// The path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid pipeline TOML
    #[error("invalid pipeline file {}", path.display())]
    Parse {
        /// The file
        path: PathBuf,
        /// The TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A `{name}` placeholder has no value
    #[error("task '{task}': unknown placeholder '{{{name}}}' in \"{text}\"")]
    Placeholder {
        /// The task being loaded
        task: String,
        /// The placeholder name
        name: String,
        /// The text containing it
        text: String,
    },

    /// A file dependency pattern is not a valid glob
    #[error("task '{task}': invalid glob pattern '{pattern}'")]
    Glob {
        /// The task being loaded
        task: String,
        /// The pattern
        pattern: String,
        /// The glob error
        #[source]
        source: glob::PatternError,
    },

    /// A file dependency pattern matched no files
    #[error("task '{task}': pattern '{pattern}' matches no files")]
    NoMatches {
        /// The task being loaded
        task: String,
        /// The pattern
        pattern: String,
    },

    /// Loaded tasks do not form a valid graph
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// A loaded pipeline: resolved settings and registered tasks
#[derive(Debug)]
pub struct Pipeline {
    /// Project settings
    pub config: ProjectConfig,
    /// Task graph
    pub graph: TaskGraph,
}

/// Read, parse and load a pipeline file
///
/// The project root is the directory holding the file.
pub fn load_pipeline(path: &Path) -> Result<Pipeline, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let path = std::path::absolute(path).map_err(io_err)?;
    let content = fs::read_to_string(&path).map_err(io_err)?;
    let file = parser::parse(&content).map_err(|source| LoadError::Parse {
        path: path.clone(),
        source,
    })?;

    let root = path.parent().unwrap_or_else(|| Path::new("/"));
    log::debug!("loading {} (root {})", path.display(), root.display());
    build_pipeline(&file, root)
}

/// Load an already parsed pipeline file rooted at `root`
pub fn build_pipeline(file: &PipelineFile, root: &Path) -> Result<Pipeline, LoadError> {
    let config = ProjectConfig::from_section(root, &file.project);
    let mut graph = TaskGraph::new();
    {
        let loader = Loader::new(&config);
        for entry in &file.tasks {
            for task in loader.tasks(entry)? {
                graph.register(task)?;
            }
        }
    }
    log::debug!("loaded {} task(s)", graph.len());
    Ok(Pipeline { config, graph })
}

struct Loader<'a> {
    config: &'a ProjectConfig,
    vars: HashMap<&'static str, String>,
}

impl<'a> Loader<'a> {
    fn new(config: &'a ProjectConfig) -> Self {
        Self {
            config,
            vars: config.placeholders(),
        }
    }

    /// The task for `entry`, preceded by its subtasks
    fn tasks(&self, entry: &TaskEntry) -> Result<Vec<Task>, LoadError> {
        let mut tasks = Vec::with_capacity(entry.subtasks.len() + 1);
        let mut group = self.builder(&entry.name, entry)?;

        for sub in &entry.subtasks {
            let name = format!("{}:{}", entry.name, sub.name);
            if !sub.subtasks.is_empty() {
                return Err(PipelineError::InvalidTask {
                    task: name,
                    reason: "subtasks cannot have subtasks".to_string(),
                }
                .into());
            }

            let mut builder = self.builder(&name, sub)?;
            // Subtasks inherit the group's verbosity and clean flag.
            if sub.verbosity.is_none()
                && let Some(verbosity) = entry.verbosity
            {
                builder = builder.verbosity(verbosity);
            }
            if entry.clean {
                builder = builder.clean(true);
            }
            tasks.push(builder.build());
            group = group.task_dep(name);
        }

        tasks.push(group.build());
        Ok(tasks)
    }

    fn builder(&self, name: &str, entry: &TaskEntry) -> Result<TaskBuilder, LoadError> {
        let mut builder = Task::builder(name).clean(entry.clean);
        if let Some(doc) = &entry.doc {
            builder = builder.doc(doc.clone());
        }
        if let Some(verbosity) = entry.verbosity {
            builder = builder.verbosity(verbosity);
        }
        for pattern in &entry.file_dep {
            builder = builder.file_deps(self.file_deps(name, pattern)?);
        }
        for target in &entry.targets {
            builder = builder.target(self.path(name, target)?);
        }
        for dep in &entry.task_dep {
            builder = builder.task_dep(dep.clone());
        }
        for action in &entry.actions {
            builder = builder.action(self.action(name, action)?);
        }
        Ok(builder)
    }

    fn action(&self, task: &str, action: &ActionEntry) -> Result<Action, LoadError> {
        match action {
            ActionEntry::Shell(command) => Ok(Action::shell(self.expand(task, command)?)),
            ActionEntry::Format { format } => Ok(self.format_job(task, format)?.into_action()),
        }
    }

    fn format_job(&self, task: &str, entry: &FormatEntry) -> Result<FormatJob, LoadError> {
        let inputs = entry
            .inputs
            .iter()
            .map(|input| {
                Ok(FormatInput {
                    path: self.path(task, &input.path)?,
                    labels: EntityLabels {
                        group: input.group.clone(),
                        labels: input.labels.clone(),
                    },
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        let mut options = WideOptions {
            missing: entry.missing.clone(),
            ..WideOptions::default()
        };
        if let Some(scale) = entry.scale {
            options.scale = scale;
        }
        if let Some(divisor) = entry.divisor {
            options.divisor = divisor;
        }

        Ok(FormatJob {
            inputs,
            output: self.path(task, &entry.output)?,
            options,
        })
    }

    fn path(&self, task: &str, raw: &str) -> Result<PathBuf, LoadError> {
        Ok(self.config.resolve(self.expand(task, raw)?))
    }

    fn file_deps(&self, task: &str, raw: &str) -> Result<Vec<PathBuf>, LoadError> {
        let expanded = self.expand(task, raw)?;
        if !expanded.contains(GLOB_CHARS) {
            return Ok(vec![self.config.resolve(&expanded)]);
        }

        let pattern = if Path::new(&expanded).is_absolute() {
            expanded.clone()
        } else {
            let root = glob::Pattern::escape(&self.config.root.to_string_lossy());
            format!("{root}/{expanded}")
        };
        let entries = glob::glob(&pattern).map_err(|source| LoadError::Glob {
            task: task.to_string(),
            pattern: expanded.clone(),
            source,
        })?;

        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| LoadError::Io {
                path: err.path().to_path_buf(),
                source: err.into(),
            })?;
            if path.is_file() {
                matches.push(paths::normalize(&path));
            }
        }
        if matches.is_empty() {
            return Err(LoadError::NoMatches {
                task: task.to_string(),
                pattern: expanded,
            });
        }
        matches.sort();
        log::debug!("{task}: '{expanded}' matched {} file(s)", matches.len());
        Ok(matches)
    }

    fn expand(&self, task: &str, text: &str) -> Result<String, LoadError> {
        let mut unknown: Option<String> = None;
        let expanded = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
            if !caps[1].is_empty() {
                return caps[0].to_string();
            }
            self.vars.get(&caps[2]).cloned().unwrap_or_else(|| {
                unknown.get_or_insert_with(|| caps[2].to_string());
                String::new()
            })
        });
        match unknown {
            Some(name) => Err(LoadError::Placeholder {
                task: task.to_string(),
                name,
                text: text.to_string(),
            }),
            None => Ok(expanded.into_owned()),
        }
    }
}

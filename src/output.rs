//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use std::error::Error;
use std::fmt::Write;

use colored::Colorize;
use serde::Serialize;

use crate::core::services::{CleanedTarget, RunReport, TaskOutcome, TaskReport};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// An error and its causes, joined with `: `
fn error_chain(err: &(dyn Error + 'static)) -> String {
    std::iter::successors(Some(err), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

/// Result of a run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Whether every task executed or was up to date
    pub success: bool,
    /// Per-task outcomes, in execution order
    pub tasks: Vec<TaskReport>,
    /// Total actions run
    pub actions_run: usize,
    /// The error that stopped the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSummary {
    /// Summarize a run report
    #[must_use]
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            success: report.succeeded(),
            tasks: report.tasks.clone(),
            actions_run: report.actions_run(),
            error: report.error.as_ref().map(|err| error_chain(err)),
        }
    }

    fn count(&self, outcome: TaskOutcome) -> usize {
        self.tasks.iter().filter(|t| t.outcome == outcome).count()
    }

    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => println!("{}", to_json(self)),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        if self.tasks.is_empty() {
            out.push_str("No tasks to run.\n");
            return out;
        }

        for task in self.tasks.iter().filter(|t| t.outcome == TaskOutcome::Failed) {
            let _ = writeln!(out, "{} {}", "failed:".red().bold(), task.task);
        }
        let not_run: Vec<&str> = self
            .tasks
            .iter()
            .filter(|t| t.outcome == TaskOutcome::NotRun)
            .map(|t| t.task.as_str())
            .collect();
        if !not_run.is_empty() {
            let _ = writeln!(out, "{} {}", "not run:".yellow(), not_run.join(", "));
        }

        let summary = format!(
            "{} executed, {} up to date ({} action(s))",
            self.count(TaskOutcome::Executed),
            self.count(TaskOutcome::UpToDate),
            self.actions_run
        );
        if self.success {
            let _ = writeln!(out, "{}", summary.green());
        } else {
            let _ = writeln!(out, "{summary}");
        }
        out
    }
}

/// One entry of a task listing
#[derive(Debug, Serialize)]
pub struct TaskInfo {
    /// Task name
    pub name: String,
    /// One-line description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Direct dependencies, explicit and implied by file dependencies
    pub dependencies: Vec<String>,
    /// Targets, relative to the project root where possible
    pub targets: Vec<String>,
}

/// Result of `list`
#[derive(Debug, Serialize)]
pub struct TaskList {
    /// Tasks in registration order
    pub tasks: Vec<TaskInfo>,
    /// Whether human output shows dependencies
    #[serde(skip)]
    pub show_deps: bool,
}

impl TaskList {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => println!("{}", to_json(self)),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        if self.tasks.is_empty() {
            out.push_str("No tasks defined.\n");
            return out;
        }

        let width = self.tasks.iter().map(|t| t.name.len()).max().unwrap_or(0);
        for task in &self.tasks {
            let name = format!("{:width$}", task.name);
            match &task.doc {
                Some(doc) => {
                    let _ = writeln!(out, "{}  {doc}", name.bold());
                },
                None => {
                    let _ = writeln!(out, "{}", name.bold().to_string().trim_end());
                },
            }
            if self.show_deps && !task.dependencies.is_empty() {
                let _ = writeln!(out, "  {} {}", "<-".dimmed(), task.dependencies.join(", "));
            }
        }
        out
    }
}

/// Freshness of one task
#[derive(Debug, Serialize)]
pub struct TaskStatus {
    /// Task name
    pub name: String,
    /// Whether the task would run
    pub stale: bool,
    /// Why it would run, or what it is waiting for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Result of `status`
#[derive(Debug, Serialize)]
pub struct StatusResult {
    /// Tasks in dependency order
    pub tasks: Vec<TaskStatus>,
}

impl StatusResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => println!("{}", to_json(self)),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        for task in &self.tasks {
            let label = if task.stale {
                "stale".yellow()
            } else {
                "ok   ".green()
            };
            match &task.reason {
                Some(reason) => {
                    let _ = writeln!(out, "{label}  {} ({reason})", task.name);
                },
                None => {
                    let _ = writeln!(out, "{label}  {}", task.name);
                },
            }
        }
        let stale = self.tasks.iter().filter(|t| t.stale).count();
        let _ = writeln!(out, "\n{stale} of {} task(s) stale", self.tasks.len());
        out
    }
}

/// Result of `clean`
#[derive(Debug, Serialize)]
pub struct CleanResult {
    /// Every target considered
    pub targets: Vec<CleanedTarget>,
}

impl CleanResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => print!("{}", self.to_human()),
            OutputMode::Json => println!("{}", to_json(self)),
        }
    }

    /// Human-readable text
    #[must_use]
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        let removed: Vec<&CleanedTarget> = self.targets.iter().filter(|t| t.removed).collect();
        if removed.is_empty() {
            out.push_str("Nothing to clean.\n");
            return out;
        }
        for target in &removed {
            let _ = writeln!(out, "{} {} ({})", "removed".red(), target.path.display(), target.task);
        }
        out
    }
}

/// Result of `format`
#[derive(Debug, Serialize)]
pub struct FormatResult {
    /// Long-format output file
    pub output: String,
    /// Rows written
    pub rows: usize,
}

impl FormatResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("Wrote {} rows to {}", self.rows, self.output),
            OutputMode::Json => println!("{}", to_json(self)),
        }
    }
}

/// Generic operation result for simple commands
#[derive(Debug, Serialize)]
pub struct OperationResult {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable message
    pub message: String,
}

impl OperationResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => println!("{}", self.message),
            OutputMode::Json => println!("{}", to_json(self)),
        }
    }
}

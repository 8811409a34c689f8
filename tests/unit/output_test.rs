//! Tests for the Output module
//!
//! Output provides structured result types that can be rendered as either
//! human-readable text or machine-parseable JSON.

use std::path::PathBuf;

use ffpipe::core::services::{CleanedTarget, RunReport, StaleReason, TaskOutcome, TaskReport};
use ffpipe::core::{ActionError, PipelineError};
use ffpipe::output::{
    CleanResult, OperationResult, OutputMode, RunSummary, StatusResult, TaskInfo, TaskList,
    TaskStatus,
};

fn plain() {
    colored::control::set_override(false);
}

fn task_report(task: &str, outcome: TaskOutcome, actions_run: usize) -> TaskReport {
    TaskReport {
        task: task.to_string(),
        outcome,
        reason: None,
        actions_run,
    }
}

// =============================================================================
// OutputMode Tests
// =============================================================================

#[test]
fn output_mode_default() {
    assert_eq!(OutputMode::default(), OutputMode::Human);
}

// =============================================================================
// RunSummary Tests
// =============================================================================

#[test]
fn run_summary_counts_outcomes() {
    plain();
    let report = RunReport {
        tasks: vec![
            task_report("pull", TaskOutcome::UpToDate, 0),
            task_report("format", TaskOutcome::Executed, 2),
        ],
        error: None,
    };

    let summary = RunSummary::from_report(&report);
    assert!(summary.success);
    assert_eq!(summary.actions_run, 2);
    assert_eq!(summary.to_human(), "1 executed, 1 up to date (2 action(s))\n");
}

#[test]
fn run_summary_error_keeps_the_cause() {
    let report = RunReport {
        tasks: vec![task_report("pull", TaskOutcome::Failed, 0)],
        error: Some(PipelineError::TaskFailed {
            task: "pull".to_string(),
            source: ActionError::Exit {
                command: "python pull.py".to_string(),
                code: Some(2),
                stderr: "no network".to_string(),
            },
        }),
    };

    let summary = RunSummary::from_report(&report);
    let error = summary.error.unwrap();
    assert!(error.starts_with("task 'pull' failed: `python pull.py` exited with status 2"));
    assert!(error.contains("no network"));
}

#[test]
fn run_summary_lists_failed_and_not_run() {
    plain();
    let report = RunReport {
        tasks: vec![
            task_report("pull", TaskOutcome::Failed, 0),
            task_report("format", TaskOutcome::NotRun, 0),
            task_report("charts", TaskOutcome::NotRun, 0),
        ],
        error: Some(PipelineError::Cancelled {
            next: "pull".to_string(),
        }),
    };

    let summary = RunSummary::from_report(&report);
    let text = summary.to_human();
    assert!(text.contains("failed: pull"));
    assert!(text.contains("not run: format, charts"));

    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"success\":false"));
    assert!(json.contains("\"outcome\":\"not_run\""));
    assert!(json.contains("run cancelled before task 'pull'"));
}

#[test]
fn task_report_serializes_reason() {
    let report = TaskReport {
        task: "format".to_string(),
        outcome: TaskOutcome::Executed,
        reason: Some(StaleReason::MissingTarget {
            target: PathBuf::from("_data/long.csv"),
        }),
        actions_run: 1,
    };
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["reason"]["reason"], "missing_target");
    assert_eq!(value["reason"]["target"], "_data/long.csv");
}

// =============================================================================
// Listing and status
// =============================================================================

#[test]
fn task_list_aligns_docs_and_shows_deps() {
    plain();
    let list = TaskList {
        tasks: vec![
            TaskInfo {
                name: "pull".to_string(),
                doc: Some("Pull data".to_string()),
                dependencies: vec![],
                targets: vec![],
            },
            TaskInfo {
                name: "format".to_string(),
                doc: None,
                dependencies: vec!["pull".to_string()],
                targets: vec!["_data/long.csv".to_string()],
            },
        ],
        show_deps: true,
    };

    assert_eq!(list.to_human(), "pull    Pull data\nformat\n  <- pull\n");
    let json = serde_json::to_string(&list).unwrap();
    assert!(!json.contains("show_deps"));
}

#[test]
fn status_counts_stale_tasks() {
    plain();
    let result = StatusResult {
        tasks: vec![
            TaskStatus {
                name: "pull".to_string(),
                stale: false,
                reason: None,
            },
            TaskStatus {
                name: "format".to_string(),
                stale: true,
                reason: Some("missing _data/long.csv".to_string()),
            },
        ],
    };
    let text = result.to_human();
    assert!(text.contains("stale  format (missing _data/long.csv)"));
    assert!(text.ends_with("1 of 2 task(s) stale\n"));
}

#[test]
fn clean_reports_only_removed() {
    plain();
    let result = CleanResult {
        targets: vec![
            CleanedTarget {
                task: "format".to_string(),
                path: PathBuf::from("long.csv"),
                removed: true,
            },
            CleanedTarget {
                task: "format".to_string(),
                path: PathBuf::from("gone.csv"),
                removed: false,
            },
        ],
    };
    assert_eq!(result.to_human(), "removed long.csv (format)\n");

    let empty = CleanResult { targets: vec![] };
    assert_eq!(empty.to_human(), "Nothing to clean.\n");
}

#[test]
fn operation_result_serialization() {
    let result = OperationResult {
        success: true,
        message: "Created pipeline.toml".to_string(),
    };
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(json, r#"{"success":true,"message":"Created pipeline.toml"}"#);
}

//! Integration tests for the ffpipe CLI
//!
//! These tests run the real binary against temporary projects, with shell
//! actions that write their targets.

#[path = "../common/mod.rs"]
#[allow(dead_code)]
mod common;

use std::process::Stdio;
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::cargo;
use predicates::prelude::*;

use common::fixtures::{TestProject, WIDE_CSV};

/// Helper function to create an ffpipe command
fn ffpipe() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("ffpipe"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

const CHAIN: &str = r#"
[[task]]
name = "B"
doc = "Copy A's output"
file_dep = ["out_a.txt"]
targets = ["out_b.txt"]
actions = ["cat out_a.txt > out_b.txt"]

[[task]]
name = "A"
doc = "Write the first file"
targets = ["out_a.txt"]
actions = ["echo a > out_a.txt"]
"#;

// =============================================================================
// RUN
// =============================================================================

#[test]
fn test_run_executes_in_dependency_order() {
    let project = TestProject::new();
    project.pipeline(CHAIN);

    ffpipe()
        .args(["run", "B"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 executed, 0 up to date"));

    assert_eq!(project.read("out_b.txt"), "a\n");
}

#[test]
fn test_second_run_is_a_no_op() {
    let project = TestProject::new();
    project.pipeline(CHAIN);

    ffpipe().current_dir(project.path()).assert().success();

    ffpipe()
        .args(["--json", "run"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"actions_run\": 0"))
        .stdout(predicate::str::contains("\"outcome\": \"up_to_date\""));
}

#[test]
fn test_deleted_target_is_rebuilt_alone() {
    let project = TestProject::new();
    project.pipeline(CHAIN);
    ffpipe().arg("run").current_dir(project.path()).assert().success();

    std::fs::remove_file(project.join("out_b.txt")).unwrap();

    ffpipe()
        .arg("run")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1 executed, 1 up to date"));
    assert!(project.exists("out_b.txt"));
}

#[test]
fn test_failing_task_exits_non_zero() {
    let project = TestProject::new();
    project.pipeline(
        r#"
[[task]]
name = "broken"
targets = ["never.txt"]
actions = ["echo oops >&2; exit 3"]

[[task]]
name = "after"
file_dep = ["never.txt"]
targets = ["after.txt"]
actions = ["touch after.txt"]
"#,
    );

    ffpipe()
        .args(["run", "after", "--verbosity", "0"])
        .current_dir(project.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("not run: after"))
        .stderr(predicate::str::contains("task 'broken' failed"))
        .stderr(predicate::str::contains("exited with status 3"))
        .stderr(predicate::str::contains("oops"));

    assert!(!project.exists("after.txt"));
}

#[test]
fn test_unknown_task_is_an_error() {
    let project = TestProject::new();
    project.pipeline(CHAIN);

    ffpipe()
        .args(["run", "nope"])
        .current_dir(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown task 'nope'"));
}

#[test]
fn test_explicit_pipeline_file() {
    let project = TestProject::new();
    let path = project.write("pipelines/other.toml", CHAIN);

    ffpipe().arg("-f").arg(&path).arg("run").assert().success();
    assert!(project.exists("pipelines/out_b.txt"));
}

#[test]
fn test_missing_pipeline_file() {
    let project = TestProject::new();
    ffpipe()
        .arg("list")
        .current_dir(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pipeline.toml found"));
}

// =============================================================================
// LIST / STATUS / CLEAN
// =============================================================================

#[test]
fn test_list_shows_docs_and_dependencies() {
    let project = TestProject::new();
    project.pipeline(CHAIN);

    ffpipe()
        .args(["list", "--deps"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Copy A's output"))
        .stdout(predicate::str::contains("<- A"));
}

#[test]
fn test_status_does_not_run_anything() {
    let project = TestProject::new();
    project.pipeline(CHAIN);

    ffpipe()
        .arg("status")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 2 task(s) stale"))
        .stdout(predicate::str::contains("waiting for out_a.txt"));

    assert!(!project.exists("out_a.txt"));
}

#[test]
fn test_clean_removes_marked_targets() {
    let project = TestProject::new();
    project.pipeline(
        r#"
[[task]]
name = "keep"
targets = ["keep.txt"]
actions = ["touch keep.txt"]

[[task]]
name = "scratch"
targets = ["scratch.txt"]
clean = true
actions = ["touch scratch.txt"]
"#,
    );
    ffpipe().current_dir(project.path()).assert().success();

    ffpipe()
        .arg("clean")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));
    assert!(project.exists("keep.txt"));
    assert!(!project.exists("scratch.txt"));

    ffpipe().args(["clean", "--all"]).current_dir(project.path()).assert().success();
    assert!(!project.exists("keep.txt"));
}

#[cfg(unix)]
#[test]
fn test_interrupt_stops_before_next_task() {
    let project = TestProject::new();
    project.pipeline(
        r#"
[[task]]
name = "slow"
targets = ["slow.txt"]
actions = ["touch started.txt && sleep 1 && touch slow.txt"]

[[task]]
name = "after"
task_dep = ["slow"]
targets = ["after.txt"]
actions = ["touch after.txt"]
"#,
    );

    let child = std::process::Command::new(cargo::cargo_bin!("ffpipe"))
        .arg("run")
        .current_dir(project.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !project.exists("started.txt") {
        assert!(Instant::now() < deadline, "first task never started");
        thread::sleep(Duration::from_millis(10));
    }
    let kill = std::process::Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(kill.success());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("run cancelled before task 'after'"));
    assert!(project.exists("slow.txt"));
    assert!(!project.exists("after.txt"));
}

// =============================================================================
// FORMAT / INIT / VERSION
// =============================================================================

#[test]
fn test_format_subcommand_writes_long_file() {
    let project = TestProject::new();
    project.write("raw.csv", WIDE_CSV);

    ffpipe()
        .args(["format", "-o", "out/long.csv", "--divisor", "100", "--missing", "-99.99", "raw.csv"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 rows"));

    let content = project.read("out/long.csv");
    assert!(content.starts_with("unique_id,ds,y\nBIG_HiBM,2020-01-01,0.02\n"));
}

#[test]
fn test_format_action_in_pipeline() {
    let project = TestProject::new();
    project.write("_data/raw.csv", WIDE_CSV);
    project.pipeline(
        r#"
[[task]]
name = "format"
file_dep = ["{data_dir}/raw.csv"]
targets = ["{data_dir}/long.csv"]
actions = [
  { format = { output = "{data_dir}/long.csv", missing = [-99.99], inputs = [{ path = "{data_dir}/raw.csv", group = "bm" }] } },
]
"#,
    );

    ffpipe().current_dir(project.path()).assert().success();
    assert!(project.read("_data/long.csv").contains("bm_SMALL_LoBM,2020-01-01,1\n"));
}

#[test]
fn test_init_creates_loadable_pipeline() {
    let project = TestProject::new();

    ffpipe()
        .arg("init")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created pipeline.toml"));

    ffpipe()
        .arg("init")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    ffpipe()
        .arg("list")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("generate_pipeline_site"))
        .stdout(predicate::str::contains("run_notebooks:summary_ken_french_ipynb"));
}

#[test]
fn test_version_json() {
    ffpipe()
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

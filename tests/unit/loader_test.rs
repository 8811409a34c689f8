//! Loading pipeline.toml files from disk

use std::path::PathBuf;

use ffpipe::adapters::toml::{LoadError, load_pipeline};

use crate::common::fixtures::TestProject;

#[test]
fn root_is_directory_of_pipeline_file() {
    let project = TestProject::new();
    let path = project.pipeline("[project]\ndata_dir = \"data\"\n");

    let pipeline = load_pipeline(&path).unwrap();
    let root = ffpipe::paths::normalize(project.path());
    assert_eq!(pipeline.config.root, root);
    assert_eq!(pipeline.config.data_dir, root.join("data"));
    assert!(pipeline.graph.is_empty());
}

#[test]
fn globs_expand_to_sorted_files() {
    let project = TestProject::new();
    project.write("src/b.py", "");
    project.write("src/a.py", "");
    project.write("src/notes.txt", "");
    let path = project.pipeline("[[task]]\nname = \"lint\"\nfile_dep = [\"src/*.py\"]\nactions = [\"true\"]\n");

    let pipeline = load_pipeline(&path).unwrap();
    let task = pipeline.graph.get("lint").unwrap();
    let names: Vec<PathBuf> =
        task.file_deps.iter().map(|p| PathBuf::from(p.file_name().unwrap())).collect();
    assert_eq!(names, vec![PathBuf::from("a.py"), PathBuf::from("b.py")]);
}

#[test]
fn glob_without_matches_is_an_error() {
    let project = TestProject::new();
    let path = project.pipeline("[[task]]\nname = \"lint\"\nfile_dep = [\"src/*.py\"]\n");

    let err = load_pipeline(&path).unwrap_err();
    assert!(matches!(err, LoadError::NoMatches { ref task, .. } if task == "lint"));
}

#[test]
fn invalid_toml_reports_file() {
    let project = TestProject::new();
    let path = project.pipeline("[[task]\nname = ");

    let err = load_pipeline(&path).unwrap_err();
    assert!(matches!(err, LoadError::Parse { .. }));
    assert!(err.to_string().contains("pipeline.toml"));
}

#[test]
fn missing_file_is_io_error() {
    let project = TestProject::new();
    let err = load_pipeline(&project.join("pipeline.toml")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn unknown_dependency_surfaces_at_resolve() {
    let project = TestProject::new();
    let path = project.pipeline("[[task]]\nname = \"b\"\ntask_dep = [\"a\"]\n");

    let pipeline = load_pipeline(&path).unwrap();
    let err = pipeline.graph.resolve(&["b"]).unwrap_err();
    assert_eq!(err.to_string(), "task 'b' depends on unknown task 'a'");
}

//! List tasks

use std::path::Path;

use ffpipe::output::{OutputMode, TaskInfo, TaskList};

/// List every task in registration order
pub fn list(file: Option<&Path>, show_deps: bool, mode: OutputMode) -> anyhow::Result<()> {
    let pipeline = super::load(file)?;
    let graph = &pipeline.graph;

    let tasks = graph
        .tasks()
        .map(|task| TaskInfo {
            name: task.name.clone(),
            doc: task.doc.clone(),
            dependencies: graph.dependencies_of(task).into_iter().map(String::from).collect(),
            targets: task.targets.iter().map(|t| pipeline.config.display_path(t)).collect(),
        })
        .collect();

    TaskList { tasks, show_deps }.render(mode);
    Ok(())
}

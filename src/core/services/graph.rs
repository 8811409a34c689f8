//! Task graph - registration and dependency resolution
//!
//! A task depends on the tasks named in its `task_deps` and on whichever
//! task produces one of its file dependencies. Resolution returns the
//! transitive closure of the requested tasks in topological order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use petgraph::Direction;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::error::PipelineError;
use crate::core::models::Task;
use crate::paths::normalize;

/// Registered tasks and the targets they own
#[derive(Debug, Default)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    by_name: HashMap<String, usize>,
    producers: HashMap<PathBuf, usize>,
}

impl TaskGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task
    ///
    /// Fails if the name is taken, if a target is already produced by another
    /// task, or if a target is also one of the task's own file dependencies.
    pub fn register(&mut self, task: Task) -> Result<(), PipelineError> {
        if self.by_name.contains_key(&task.name) {
            return Err(PipelineError::DuplicateTask(task.name));
        }

        let deps: HashSet<PathBuf> = task.file_deps.iter().map(|p| normalize(p)).collect();
        let mut targets = Vec::with_capacity(task.targets.len());
        for target in &task.targets {
            let target = normalize(target);
            if deps.contains(&target) {
                return Err(PipelineError::InvalidTask {
                    task: task.name,
                    reason: format!("{} is both a target and a file dependency", target.display()),
                });
            }
            if let Some(&owner) = self.producers.get(&target) {
                return Err(PipelineError::DuplicateTarget {
                    task: task.name,
                    producer: self.tasks[owner].name.clone(),
                    path: target,
                });
            }
            targets.push(target);
        }

        let index = self.tasks.len();
        for target in targets {
            self.producers.insert(target, index);
        }
        self.by_name.insert(task.name.clone(), index);
        log::debug!("registered task '{}'", task.name);
        self.tasks.push(task);
        Ok(())
    }

    /// Look up a task by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Task> {
        self.by_name.get(name).map(|&i| &self.tasks[i])
    }

    /// All tasks, in registration order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Number of registered tasks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The task that declares `path` as a target
    #[must_use]
    pub fn producer_of(&self, path: &Path) -> Option<&Task> {
        self.producers.get(&normalize(path)).map(|&i| &self.tasks[i])
    }

    /// Names of the tasks `task` depends on directly
    ///
    /// Explicit task dependencies come first, then producers of file
    /// dependencies, without repeats.
    #[must_use]
    pub fn dependencies_of<'a>(&'a self, task: &'a Task) -> Vec<&'a str> {
        let mut deps: Vec<&str> = Vec::new();
        for name in &task.task_deps {
            if !deps.contains(&name.as_str()) {
                deps.push(name);
            }
        }
        for path in &task.file_deps {
            if let Some(producer) = self.producer_of(path)
                && producer.name != task.name
                && !deps.contains(&producer.name.as_str())
            {
                deps.push(&producer.name);
            }
        }
        deps
    }

    /// Tasks to run for `names`, dependencies first
    ///
    /// An empty `names` selects every registered task.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Task>, PipelineError> {
        let requested: Vec<usize> = if names.is_empty() {
            (0..self.tasks.len()).collect()
        } else {
            names
                .iter()
                .map(|name| {
                    let name = name.as_ref();
                    self.by_name.get(name).copied().ok_or_else(|| PipelineError::UnknownTask {
                        name: name.to_string(),
                        referenced_by: None,
                    })
                })
                .collect::<Result<_, _>>()?
        };

        let closure = self.closure(&requested)?;

        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(closure.len(), closure.len());
        let mut nodes: HashMap<usize, NodeIndex> = HashMap::with_capacity(closure.len());
        for &index in &closure {
            nodes.insert(index, graph.add_node(index));
        }
        for &index in &closure {
            for dep in self.dependencies_of(&self.tasks[index]) {
                let dep_index = self.by_name[dep];
                graph.add_edge(nodes[&dep_index], nodes[&index], ());
            }
        }

        let order = ready_order(&graph);
        if order.len() < graph.node_count() {
            return Err(PipelineError::CyclicDependency {
                tasks: self.cycle_members(&graph),
            });
        }
        Ok(order.into_iter().map(|node| &self.tasks[graph[node]]).collect())
    }

    /// Indices of `roots` and everything they depend on, sorted
    fn closure(&self, roots: &[usize]) -> Result<Vec<usize>, PipelineError> {
        let mut seen: HashSet<usize> = HashSet::new();
        let mut stack: Vec<usize> = roots.to_vec();

        while let Some(index) = stack.pop() {
            if !seen.insert(index) {
                continue;
            }
            let task = &self.tasks[index];
            for dep in self.dependencies_of(task) {
                let dep_index =
                    self.by_name.get(dep).copied().ok_or_else(|| PipelineError::UnknownTask {
                        name: dep.to_string(),
                        referenced_by: Some(task.name.clone()),
                    })?;
                if !seen.contains(&dep_index) {
                    stack.push(dep_index);
                }
            }
        }

        let mut closure: Vec<usize> = seen.into_iter().collect();
        closure.sort_unstable();
        Ok(closure)
    }

    /// Names of the tasks on one cycle, in edge order
    fn cycle_members(&self, graph: &DiGraph<usize, ()>) -> Vec<String> {
        let mut cycles: Vec<Vec<NodeIndex>> = kosaraju_scc(graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .collect();
        for scc in &mut cycles {
            scc.sort_unstable();
        }
        cycles.sort_unstable();
        let Some(component) = cycles.into_iter().next() else {
            return Vec::new();
        };

        let start = component[0];
        let mut ordered = vec![start];
        let mut current = start;
        while let Some(next) = graph
            .neighbors(current)
            .find(|n| component.contains(n) && !ordered.contains(n))
        {
            ordered.push(next);
            current = next;
        }
        for node in component {
            if !ordered.contains(&node) {
                ordered.push(node);
            }
        }

        ordered.into_iter().map(|node| self.tasks[graph[node]].name.clone()).collect()
    }
}

/// Kahn's algorithm, always taking the ready node added first
///
/// Nodes are added in registration order, so independent tasks keep the
/// order they were declared in. Nodes on or behind a cycle are left out.
fn ready_order(graph: &DiGraph<usize, ()>) -> Vec<NodeIndex> {
    let mut pending: Vec<usize> = graph
        .node_indices()
        .map(|node| graph.neighbors_directed(node, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<NodeIndex>> = graph
        .node_indices()
        .filter(|node| pending[node.index()] == 0)
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            pending[next.index()] -= 1;
            if pending[next.index()] == 0 {
                ready.push(Reverse(next));
            }
        }
    }
    order
}

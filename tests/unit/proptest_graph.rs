//! Property-based tests for task graph resolution
//!
//! Uses proptest to verify properties that should hold for all inputs.

use ffpipe::core::PipelineError;
use ffpipe::core::models::Task;
use ffpipe::core::services::TaskGraph;
use proptest::prelude::*;

/// Edges `(from, to)` with `from < to`, so the graph is acyclic
fn acyclic_edges(nodes: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..nodes, 0..nodes), 0..nodes * 2).prop_map(|pairs| {
        pairs.into_iter().filter(|(a, b)| a < b).collect()
    })
}

/// Task `i` depends on task `j` for every edge `(j, i)`; half the edges go
/// through a produced file instead of an explicit task dependency
fn build(nodes: usize, edges: &[(usize, usize)]) -> TaskGraph {
    let mut graph = TaskGraph::new();
    for i in 0..nodes {
        let mut builder = Task::builder(format!("t{i}")).target(format!("out/{i}"));
        for (k, (from, to)) in edges.iter().enumerate() {
            if *to == i {
                builder = if k % 2 == 0 {
                    builder.task_dep(format!("t{from}"))
                } else {
                    builder.file_dep(format!("out/{from}"))
                };
            }
        }
        graph.register(builder.build()).unwrap();
    }
    graph
}

proptest! {
    /// Every task comes after all of its dependencies
    #[test]
    fn resolve_orders_dependencies_first(
        (nodes, edges) in (1usize..12).prop_flat_map(|n| (Just(n), acyclic_edges(n)))
    ) {
        let graph = build(nodes, &edges);
        let order: Vec<String> = graph
            .resolve::<&str>(&[])
            .unwrap()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        prop_assert_eq!(order.len(), nodes);

        let position = |name: &str| order.iter().position(|n| n == name).unwrap();
        for (from, to) in &edges {
            let before = position(&format!("t{from}"));
            let after = position(&format!("t{to}"));
            prop_assert!(before < after, "t{} at {} but t{} at {}", from, before, to, after);
        }
    }

    /// Tasks with no path between them run in the order they were registered
    #[test]
    fn resolve_keeps_declared_order_between_unrelated_tasks(
        (nodes, edges) in (1usize..12).prop_flat_map(|n| (Just(n), acyclic_edges(n)))
    ) {
        let graph = build(nodes, &edges);
        let order: Vec<usize> = graph
            .resolve::<&str>(&[])
            .unwrap()
            .iter()
            .map(|t| t.name[1..].parse().unwrap())
            .collect();

        // Kahn's order taking the lowest ready index is unique; recompute it.
        let mut pending: Vec<usize> = (0..nodes)
            .map(|i| edges.iter().filter(|(_, to)| *to == i).count())
            .collect();
        let mut expected = Vec::with_capacity(nodes);
        let mut done = vec![false; nodes];
        while let Some(next) = (0..nodes).find(|&i| !done[i] && pending[i] == 0) {
            done[next] = true;
            expected.push(next);
            for (from, to) in &edges {
                if *from == next {
                    pending[*to] -= 1;
                }
            }
        }
        prop_assert_eq!(order, expected);
    }

    /// Resolving one task yields exactly its transitive dependencies
    #[test]
    fn resolve_selects_closure(
        (nodes, edges, pick) in (2usize..10).prop_flat_map(|n| (Just(n), acyclic_edges(n), 0..n))
    ) {
        let graph = build(nodes, &edges);
        let name = format!("t{pick}");
        let resolved = graph.resolve(&[name.as_str()]).unwrap();

        let mut expected = vec![pick];
        let mut i = 0;
        while i < expected.len() {
            let current = expected[i];
            for (from, to) in &edges {
                if *to == current && !expected.contains(from) {
                    expected.push(*from);
                }
            }
            i += 1;
        }
        prop_assert_eq!(resolved.len(), expected.len());
        prop_assert_eq!(resolved.last().map(|t| t.name.as_str()), Some(name.as_str()));
    }

    /// A ring of two or more tasks is always reported as a cycle
    #[test]
    fn ring_is_cycle(len in 2usize..8) {
        let mut graph = TaskGraph::new();
        for i in 0..len {
            let next = (i + 1) % len;
            graph.register(Task::builder(format!("t{i}")).task_dep(format!("t{next}")).build()).unwrap();
        }
        let err = graph.resolve(&["t0"]).unwrap_err();
        match err {
            PipelineError::CyclicDependency { tasks } => prop_assert_eq!(tasks.len(), len),
            other => prop_assert!(false, "expected a cycle, got {}", other),
        }
    }
}

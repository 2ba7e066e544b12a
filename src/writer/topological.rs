//! Dependency-first topological ordering.
//!
//! Uses Kahn's algorithm from the nodes nothing depends on, always taking the
//! ready node with the smallest `(label, coordinates)` key, then reverses the
//! result so every dependency precedes its dependents.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::warn;

use crate::coordinates::Coordinates;
use crate::graph::{CycleInfo, DependencyGraph};

/// The graph handed to the topological writer is not acyclic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dependency graph contains {} cycle(s): {}", .cycles.len(), describe(.cycles))]
pub struct CycleError {
    /// Every cycle found in the graph
    pub cycles: Vec<CycleInfo>,
}

fn describe(cycles: &[CycleInfo]) -> String {
    cycles
        .iter()
        .map(CycleInfo::cycle_path)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Orders the nodes of `graph` so that for every edge `u -> v`, `v` comes
/// before `u`.
pub(crate) fn order<'g>(
    graph: &'g DependencyGraph,
    build_path: &str,
) -> Result<Vec<&'g Coordinates>, CycleError> {
    let key = |node: &'g Coordinates| {
        Reverse((node.maybe_project_coordinates(build_path).label(), node))
    };

    let mut remaining: HashMap<&Coordinates, usize> = HashMap::with_capacity(graph.node_count());
    let mut ready = BinaryHeap::new();
    for node in graph.nodes() {
        let in_degree = graph.in_degree(node);
        if in_degree == 0 {
            ready.push(key(node));
        }
        remaining.insert(node, in_degree);
    }

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse((_, node))) = ready.pop() {
        order.push(node);
        for dependency in graph.dependencies(node) {
            if let Some(count) = remaining.get_mut(dependency) {
                *count -= 1;
                if *count == 0 {
                    ready.push(key(dependency));
                }
            }
        }
    }

    if order.len() != graph.node_count() {
        let cycles = graph.detect_cycles();
        warn!(
            ordered = order.len(),
            nodes = graph.node_count(),
            cycles = cycles.len(),
            "refusing to order a cyclic graph"
        );
        return Err(CycleError { cycles });
    }

    order.reverse();
    Ok(order)
}

/// Renders one `<label> <in-degree>` line per node in dependency-first order.
pub(crate) fn render(graph: &DependencyGraph, build_path: &str) -> Result<String, CycleError> {
    let mut out = String::new();
    for node in order(graph, build_path)? {
        out.push_str(&format!(
            "{} {}\n",
            node.maybe_project_coordinates(build_path).label(),
            graph.in_degree(node)
        ));
    }
    Ok(out)
}

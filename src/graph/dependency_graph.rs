//! Dependency graph implementation using petgraph.
//!
//! Provides a directed graph of [`Coordinates`] where an edge `u -> v` means
//! "u directly depends on v". Nodes are keyed by value, so two independently
//! constructed but equal coordinates always resolve to the same node.

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap};

use crate::coordinates::Coordinates;

/// A directed graph of coordinates.
///
/// The graph uses petgraph's `DiGraph` internally and keeps a value index so
/// lookups by [`Coordinates`] are O(1). Edges form a set: adding an existing
/// edge again is a no-op. Equality compares node and edge sets, ignoring
/// insertion order.
///
/// # Example
///
/// ```rust
/// use depgraph::coordinates::parse;
/// use depgraph::graph::DependencyGraph;
///
/// let app = parse(":app").unwrap();
/// let lib = parse(":lib").unwrap();
/// let guava = parse("com.google.guava:guava:33.0").unwrap();
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge(app.clone(), lib.clone());
/// graph.add_edge(app.clone(), guava.clone());
/// graph.add_edge(lib.clone(), guava.clone());
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.in_degree(&guava), 2);
/// assert_eq!(graph.root(), Some(&app));
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// The underlying directed graph
    graph: DiGraph<Coordinates, ()>,
    /// Maps coordinates to their node indices for O(1) lookup
    node_indices: HashMap<Coordinates, NodeIndex>,
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyGraph {
    /// Creates a new empty dependency graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a node, returning the index of the new or already present node.
    pub fn add_node(&mut self, node: Coordinates) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&node) {
            return idx;
        }

        let idx = self.graph.add_node(node.clone());
        self.node_indices.insert(node, idx);
        idx
    }

    /// Adds the edge `from -> to`, inserting missing endpoints.
    ///
    /// Returns `true` if the edge was new.
    pub fn add_edge(&mut self, from: Coordinates, to: Coordinates) -> bool {
        let from_idx = self.add_node(from);
        let to_idx = self.add_node(to);

        if self.graph.contains_edge(from_idx, to_idx) {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, node: &Coordinates) -> bool {
        self.node_indices.contains_key(node)
    }

    /// Checks if the edge `from -> to` exists.
    pub fn contains_edge(&self, from: &Coordinates, to: &Coordinates) -> bool {
        match (self.node_indices.get(from), self.node_indices.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Direct dependencies of `node` (outgoing edges), sorted.
    pub fn dependencies(&self, node: &Coordinates) -> Vec<&Coordinates> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Direct dependents of `node` (incoming edges), sorted.
    pub fn dependents(&self, node: &Coordinates) -> Vec<&Coordinates> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: &Coordinates, direction: Direction) -> Vec<&Coordinates> {
        let Some(&idx) = self.node_indices.get(node) else {
            return Vec::new();
        };

        let mut out: Vec<&Coordinates> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| &self.graph[n])
            .collect();
        out.sort();
        out
    }

    /// Number of direct dependents of `node`; 0 for unknown nodes.
    pub fn in_degree(&self, node: &Coordinates) -> usize {
        self.node_indices.get(node).map_or(0, |&idx| {
            self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    /// The unique node nothing depends on, if there is exactly one.
    pub fn root(&self) -> Option<&Coordinates> {
        let mut roots = self.graph.node_indices().filter(|&idx| {
            self.graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .is_none()
        });

        match (roots.next(), roots.next()) {
            (Some(idx), None) => Some(&self.graph[idx]),
            _ => None,
        }
    }

    /// All nodes, sorted.
    pub fn nodes(&self) -> Vec<&Coordinates> {
        let mut nodes: Vec<&Coordinates> = self.graph.node_weights().collect();
        nodes.sort();
        nodes
    }

    /// All edges as `(source, target)` pairs, sorted.
    ///
    /// This is the graph's stable iteration order: it depends only on the node
    /// and edge sets, never on insertion order.
    pub fn edges(&self) -> Vec<(&Coordinates, &Coordinates)> {
        let mut edges: Vec<(&Coordinates, &Coordinates)> = self
            .graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()]))
            .collect();
        edges.sort();
        edges
    }

    /// Nodes equivalent to `node` under [`Coordinates::matches`], sorted.
    pub fn find_matching(&self, node: &Coordinates) -> Vec<&Coordinates> {
        let mut found: Vec<&Coordinates> = self
            .graph
            .node_weights()
            .filter(|c| c.matches(node))
            .collect();
        found.sort();
        found
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if the graph contains cycles.
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Detects all cycles in the graph.
    ///
    /// A strongly connected component is reported if it has more than one node
    /// or is a single node with a self-loop. Members of each cycle are sorted,
    /// and cycles are sorted by their first member.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgraph::coordinates::parse;
    /// use depgraph::graph::DependencyGraph;
    ///
    /// let a = parse(":a").unwrap();
    /// let b = parse(":b").unwrap();
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_edge(a.clone(), b.clone());
    /// graph.add_edge(b.clone(), a.clone());
    ///
    /// let cycles = graph.detect_cycles();
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].cycle_path(), ":a -> :b -> :a");
    /// ```
    pub fn detect_cycles(&self) -> Vec<CycleInfo> {
        let mut cycles: Vec<CycleInfo> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut nodes: Vec<Coordinates> =
                    scc.iter().map(|&idx| self.graph[idx].clone()).collect();
                nodes.sort();
                CycleInfo { nodes }
            })
            .collect();
        cycles.sort_by(|a, b| a.nodes.cmp(&b.nodes));
        cycles
    }
}

impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        let nodes: BTreeSet<&Coordinates> = self.graph.node_weights().collect();
        let other_nodes: BTreeSet<&Coordinates> = other.graph.node_weights().collect();
        nodes == other_nodes && self.edges() == other.edges()
    }
}

impl Eq for DependencyGraph {}

/// Information about a detected dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo {
    /// The coordinates in the cycle, sorted
    pub nodes: Vec<Coordinates>,
}

impl CycleInfo {
    /// Returns a formatted string representation of the cycle members.
    ///
    /// For example: ":a -> :b -> :a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };
        let mut path = self
            .nodes
            .iter()
            .map(Coordinates::label)
            .collect::<Vec<_>>()
            .join(" -> ");
        path.push_str(" -> ");
        path.push_str(&first.label());
        path
    }

    /// Returns the number of nodes in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

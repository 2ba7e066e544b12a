//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`DependencyGraph`] value type and the
//! [`GraphBuilder`] that derives one from a [`ResolutionResult`].
//!
//! # Example
//!
//! ```rust
//! use depgraph::coordinates::parse;
//! use depgraph::graph::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_edge(parse(":app").unwrap(), parse("com.x:lib:1.0").unwrap());
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod builder;
mod dependency_graph;
mod resolution;

pub use builder::{BuildError, GraphBuilder};
pub use dependency_graph::{CycleInfo, DependencyGraph};
pub use resolution::{
    ComponentId, ModuleVersion, ResolutionResult, ResolvedComponent, ResolvedDependency,
};

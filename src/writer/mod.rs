//! Textual renderings of a dependency graph.
//!
//! This module provides the [`GraphWriter`], which renders a graph as
//! Graphviz DOT text or as a dependency-first topological listing. Both
//! outputs are byte-for-byte reproducible for equal graphs and always use
//! `\n` line endings.

mod dot;
mod topological;

pub use topological::CycleError;

use crate::coordinates::Coordinates;
use crate::graph::DependencyGraph;
use std::io::{self, Write};
use tracing::instrument;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    /// Graphviz DOT text
    Dot,
    /// `<label> <in-degree>` lines, dependencies first
    Topological,
}

impl RenderFormat {
    /// Conventional file extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            RenderFormat::Dot => "gv",
            RenderFormat::Topological => "txt",
        }
    }
}

impl std::str::FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "gv" | "graphviz" => Ok(RenderFormat::Dot),
            "topological" | "topo" => Ok(RenderFormat::Topological),
            _ => Err(format!(
                "Unknown render format: '{}'. Valid formats: dot, topological",
                s
            )),
        }
    }
}

impl std::fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderFormat::Dot => write!(f, "dot"),
            RenderFormat::Topological => write!(f, "topological"),
        }
    }
}

/// Errors that can occur while rendering to a writer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Renders graphs from the point of view of one build.
///
/// Included-build references to projects of that build are shown as plain
/// projects. A writer holds no state besides the build path and can be used
/// from several threads at once.
///
/// # Example
///
/// ```rust
/// use depgraph::coordinates::parse;
/// use depgraph::graph::DependencyGraph;
/// use depgraph::writer::GraphWriter;
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge(parse(":app").unwrap(), parse(":lib").unwrap());
/// graph.add_edge(parse(":app").unwrap(), parse("com.google:guava:1.0").unwrap());
/// graph.add_edge(parse(":lib").unwrap(), parse("com.google:guava:1.0").unwrap());
///
/// let writer = GraphWriter::new(":");
/// assert_eq!(
///     writer.topological(&graph).unwrap(),
///     "com.google:guava:1.0 2\n:lib 1\n:app 0\n"
/// );
/// assert!(writer.to_dot(&graph).starts_with("strict digraph DependencyGraph {\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphWriter {
    build_path: String,
}

impl GraphWriter {
    pub fn new(build_path: impl Into<String>) -> Self {
        Self {
            build_path: build_path.into(),
        }
    }

    pub fn build_path(&self) -> &str {
        &self.build_path
    }

    /// Renders `graph` as Graphviz DOT text.
    #[instrument(skip_all, fields(build_path = %self.build_path, nodes = graph.node_count()))]
    pub fn to_dot(&self, graph: &DependencyGraph) -> String {
        dot::render(graph, &self.build_path)
    }

    /// Renders one `<label> <in-degree>` line per node, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] if the graph is not acyclic.
    #[instrument(skip_all, fields(build_path = %self.build_path, nodes = graph.node_count()))]
    pub fn topological(&self, graph: &DependencyGraph) -> Result<String, CycleError> {
        topological::render(graph, &self.build_path)
    }

    /// The nodes of `graph` with every dependency before its dependents.
    pub fn topological_order<'g>(
        &self,
        graph: &'g DependencyGraph,
    ) -> Result<Vec<&'g Coordinates>, CycleError> {
        topological::order(graph, &self.build_path)
    }

    /// Renders `graph` in `format` to `writer`.
    pub fn render<W: Write>(
        &self,
        format: RenderFormat,
        graph: &DependencyGraph,
        writer: &mut W,
    ) -> Result<(), RenderError> {
        let text = self.render_to_string(format, graph)?;
        writer.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Renders `graph` in `format` to a string.
    pub fn render_to_string(
        &self,
        format: RenderFormat,
        graph: &DependencyGraph,
    ) -> Result<String, CycleError> {
        match format {
            RenderFormat::Dot => Ok(self.to_dot(graph)),
            RenderFormat::Topological => self.topological(graph),
        }
    }
}

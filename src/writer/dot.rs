//! Graphviz DOT rendering.

use std::collections::BTreeSet;

use crate::coordinates::Coordinates;
use crate::graph::DependencyGraph;

const HEADER: &str = "strict digraph DependencyGraph {\n  ratio=0.6;\n  node [shape=box];\n";
const PROJECT_NODE_STYLE: &str = "[style=filled fillcolor=\"#008080\"]";
const PROJECT_EDGE_STYLE: &str = " [style=bold color=\"#FF6347\" weight=8]";

/// Renders `graph` as DOT text, resolving included-build references against
/// `build_path`.
///
/// Layout: header, one styling line per project node (sorted by label), then
/// one line per edge in the graph's sorted edge order. Edges between two
/// projects are drawn bold. Lines always end in `\n`.
pub(crate) fn render(graph: &DependencyGraph, build_path: &str) -> String {
    let mut out = String::from(HEADER);

    let project_labels: BTreeSet<String> = graph
        .nodes()
        .into_iter()
        .map(|node| node.maybe_project_coordinates(build_path))
        .filter(Coordinates::is_project)
        .map(|node| node.label())
        .collect();

    if !project_labels.is_empty() {
        out.push('\n');
        for label in &project_labels {
            out.push_str(&format!("  \"{}\" {};\n", escape(label), PROJECT_NODE_STYLE));
        }
    }

    let edges = graph.edges();
    if !edges.is_empty() {
        out.push('\n');
        for (source, target) in edges {
            let source = source.maybe_project_coordinates(build_path);
            let target = target.maybe_project_coordinates(build_path);
            let style = if source.is_project() && target.is_project() {
                PROJECT_EDGE_STYLE
            } else {
                ""
            };
            out.push_str(&format!(
                "  \"{}\" -> \"{}\"{};\n",
                escape(&source.label()),
                escape(&target.label()),
                style
            ));
        }
    }

    out.push_str("}\n");
    out
}

fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

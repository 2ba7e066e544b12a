//! JSON codec for graph views.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "variant": {"variant": "main", "kind": "MAIN"},
//!   "configurationName": "compileClasspath",
//!   "nodes": [ <coordinates>... ],
//!   "edges": [ {"source": <coordinates>, "target": <coordinates>}... ]
//! }
//! ```
//!
//! Nodes and edges are sets; they are written in the graph's sorted order so
//! that equal graphs always encode to identical bytes.

use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

use super::{GraphView, Variant};
use crate::coordinates::Coordinates;
use crate::graph::DependencyGraph;

/// Errors that can occur while reading a graph view.
#[derive(Debug, thiserror::Error)]
pub enum DeserializationError {
    /// Failed to read the input.
    #[error("Failed to read graph view: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON or does not have the graph view shape.
    #[error("Invalid graph view: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonGraphViewRef<'a> {
    variant: &'a Variant,
    configuration_name: &'a str,
    nodes: Vec<&'a Coordinates>,
    edges: Vec<JsonEdgeRef<'a>>,
}

#[derive(Serialize)]
struct JsonEdgeRef<'a> {
    source: &'a Coordinates,
    target: &'a Coordinates,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JsonGraphView {
    variant: Variant,
    configuration_name: String,
    nodes: Vec<Coordinates>,
    edges: Vec<JsonEdge>,
}

#[derive(Deserialize)]
struct JsonEdge {
    source: Coordinates,
    target: Coordinates,
}

fn to_wire(view: &GraphView) -> JsonGraphViewRef<'_> {
    JsonGraphViewRef {
        variant: view.variant(),
        configuration_name: view.configuration_name(),
        nodes: view.graph().nodes(),
        edges: view
            .graph()
            .edges()
            .into_iter()
            .map(|(source, target)| JsonEdgeRef { source, target })
            .collect(),
    }
}

fn from_wire(wire: JsonGraphView) -> GraphView {
    let mut graph = DependencyGraph::with_capacity(wire.nodes.len(), wire.edges.len());
    for node in wire.nodes {
        graph.add_node(node);
    }
    for edge in wire.edges {
        graph.add_edge(edge.source, edge.target);
    }
    GraphView::new(wire.variant, wire.configuration_name, graph)
}

/// Encodes a view as pretty-printed JSON.
///
/// # Example
///
/// ```rust
/// use depgraph::coordinates::parse;
/// use depgraph::graph::DependencyGraph;
/// use depgraph::view::{json, GraphView, SourceKind, Variant};
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge(parse(":app").unwrap(), parse("com.x:lib:1.0").unwrap());
/// let view = GraphView::new(Variant::new("main", SourceKind::Main), "compileClasspath", graph);
///
/// let encoded = json::encode(&view).unwrap();
/// let decoded = json::decode(&encoded).unwrap();
/// assert_eq!(decoded, view);
/// ```
pub fn encode(view: &GraphView) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_wire(view))
}

/// Decodes a view. Either the whole view is returned or an error.
pub fn decode(json: &str) -> Result<GraphView, DeserializationError> {
    let wire: JsonGraphView = serde_json::from_str(json)?;
    Ok(from_wire(wire))
}

/// Writes the encoded view followed by a newline.
pub fn write_to<W: Write>(view: &GraphView, writer: &mut W) -> io::Result<()> {
    let json = encode(view).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

/// Reads a view from `reader`.
pub fn read_from<R: Read>(mut reader: R) -> Result<GraphView, DeserializationError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    decode(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::{parse, ProjectCoordinates, VariantIdentification};
    use crate::view::SourceKind;
    use proptest::prelude::*;

    fn c(raw: &str) -> Coordinates {
        parse(raw).unwrap()
    }

    fn view(graph: DependencyGraph) -> GraphView {
        GraphView::new(Variant::new("main", SourceKind::Main), "compileClasspath", graph)
    }

    fn sample_graph() -> DependencyGraph {
        let included = Coordinates::included_build(
            "com.acme",
            "core",
            Some("2.0"),
            ProjectCoordinates::new(":core", ":platform").unwrap(),
        )
        .unwrap();
        let fixtures = c("g:a:1.0").with_variant(
            VariantIdentification::with_capabilities(["g:a", "g:a-test-fixtures"])
                .attribute("org.gradle.usage", "java-api"),
        );

        let mut graph = DependencyGraph::new();
        graph.add_edge(c(":app"), c(":lib"));
        graph.add_edge(c(":app"), included);
        graph.add_edge(c(":lib"), fixtures);
        graph.add_edge(c(":lib"), c("g:a:1.0"));
        graph
    }

    #[test]
    fn test_round_trip() {
        let original = view(sample_graph());
        let decoded = decode(&encode(&original).unwrap()).unwrap();

        assert_eq!(decoded, original);
        assert_eq!(decoded.configuration_name(), "compileClasspath");
        assert_eq!(decoded.variant().kind, SourceKind::Main);
    }

    #[test]
    fn test_isolated_nodes_survive() {
        let mut graph = sample_graph();
        graph.add_node(c(":orphan"));

        let decoded = decode(&encode(&view(graph)).unwrap()).unwrap();
        assert!(decoded.graph().contains(&c(":orphan")));
        assert_eq!(decoded.graph().in_degree(&c(":orphan")), 0);
    }

    #[test]
    fn test_encoding_is_independent_of_insertion_order() {
        let mut reversed = DependencyGraph::new();
        let mut edges: Vec<(Coordinates, Coordinates)> = sample_graph()
            .edges()
            .into_iter()
            .map(|(a, b)| (a.clone(), b.clone()))
            .collect();
        edges.reverse();
        for (a, b) in edges {
            reversed.add_edge(a, b);
        }

        assert_eq!(
            encode(&view(sample_graph())).unwrap(),
            encode(&view(reversed)).unwrap()
        );
    }

    #[test]
    fn test_wire_shape() {
        let mut graph = DependencyGraph::new();
        graph.add_edge(c(":app"), c("com.x:lib:1.0"));
        let value: serde_json::Value =
            serde_json::from_str(&encode(&view(graph)).unwrap()).unwrap();

        assert_eq!(value["variant"]["variant"], "main");
        assert_eq!(value["variant"]["kind"], "MAIN");
        assert_eq!(value["configurationName"], "compileClasspath");
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["edges"][0]["source"]["projectPath"], ":app");
        assert_eq!(value["edges"][0]["target"]["artifact"], "lib");
    }

    #[test]
    fn test_write_and_read() {
        let original = view(sample_graph());
        let mut buffer = Vec::new();
        write_to(&original, &mut buffer).unwrap();
        assert!(buffer.ends_with(b"}\n"));

        let decoded = read_from(buffer.as_slice()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_malformed_input_fails() {
        assert!(matches!(decode("{"), Err(DeserializationError::Json(_))));
        assert!(matches!(decode("[]"), Err(DeserializationError::Json(_))));
    }

    #[test]
    fn test_schema_mismatch_fails() {
        let missing_target = r#"{
            "variant": {"variant": "main", "kind": "MAIN"},
            "configurationName": "compileClasspath",
            "nodes": [],
            "edges": [{"source": {"type": "project", "projectPath": ":app", "buildPath": ":"}}]
        }"#;
        assert!(decode(missing_target).is_err());
    }

    #[test]
    fn test_invalid_coordinates_fail_whole_decode() {
        let no_build_path = r#"{
            "variant": {"variant": "main", "kind": "MAIN"},
            "configurationName": "compileClasspath",
            "nodes": [
                {"type": "module", "group": "g", "artifact": "a"},
                {"type": "project", "projectPath": ":app"}
            ],
            "edges": []
        }"#;
        let err = decode(no_build_path).unwrap_err();
        assert!(err.to_string().contains("buildPath"));
    }

    fn arb_graph() -> impl Strategy<Value = DependencyGraph> {
        let node = prop_oneof![
            "[a-c]".prop_map(|name| c(&format!(":{}", name))),
            "[a-c]".prop_map(|name| c(&format!("g:{}:1.0", name))),
            ("[a-c]", "[a-c]").prop_map(|(name, extra)| {
                c(&format!("g:{}:1.0", name)).with_variant(
                    VariantIdentification::with_capabilities([format!("g:{}-{}", name, extra)])
                        .attribute("org.gradle.usage", "java-runtime"),
                )
            }),
            ("[a-c]", prop_oneof![Just(":"), Just(":platform")]).prop_map(|(name, build)| {
                let project = ProjectCoordinates::new(format!(":{}", name), build).unwrap();
                Coordinates::included_build("com.acme", &name, None, project).unwrap()
            }),
        ];
        (
            prop::collection::vec(node.clone(), 0..6),
            prop::collection::vec((node.clone(), node), 0..10),
        )
            .prop_map(|(nodes, edges)| {
                let mut graph = DependencyGraph::new();
                for n in nodes {
                    graph.add_node(n);
                }
                for (a, b) in edges {
                    graph.add_edge(a, b);
                }
                graph
            })
    }

    proptest! {
        #[test]
        fn prop_round_trip_preserves_nodes_and_edges(graph in arb_graph()) {
            let original = view(graph);
            let decoded = decode(&encode(&original).unwrap()).unwrap();
            prop_assert_eq!(decoded.graph().nodes(), original.graph().nodes());
            prop_assert_eq!(decoded.graph().edges(), original.graph().edges());
        }
    }
}

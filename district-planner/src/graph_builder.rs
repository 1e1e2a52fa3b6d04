use crate::error::GraphError;
use crate::geometry::Point;
use crate::graph::RoadGraph;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A node that knows its own forward connections.
///
/// A connection only has to be declared by one of its two ends; the
/// builder records it in both directions.
pub trait BuildableNode {
    fn name(&self) -> &str;
    fn position(&self) -> Point;
    /// Names of the nodes this node connects forward to
    fn connections(&self) -> &[String];
}

/// Declarative node description, as read from a plan document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub name: String,
    pub position: [f64; 3],
    #[serde(default)]
    pub connections: Vec<String>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>, position: [f64; 3], connections: &[&str]) -> Self {
        NodeSpec {
            name: name.into(),
            position,
            connections: connections.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl BuildableNode for NodeSpec {
    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Point {
        Point::from(self.position)
    }

    fn connections(&self) -> &[String] {
        &self.connections
    }
}

/// Name given to the road built for a declared connection.
///
/// Node names are joined with `-`; any `-` or `\` inside a node name is
/// escaped with `\`, so distinct node pairs never share a road name.
pub fn road_name(from: &str, to: &str) -> String {
    format!("{}-{}", escape_node_name(from), escape_node_name(to))
}

fn escape_node_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '-' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Build the undirected road graph from buildable nodes.
///
/// One road is created per declared connection, directed from the
/// declaring node to its target. Declaring the same pair twice (from
/// either end) is rejected rather than silently keeping one of the roads.
pub fn build_graph<N: BuildableNode>(nodes: &[N]) -> Result<RoadGraph, GraphError> {
    let mut graph = RoadGraph::new();

    // Phase 1: every node must exist before connections can be resolved
    for node in nodes {
        graph.add_node(node.name(), node.position())?;
    }

    // Phase 2: one road per declared connection
    for node in nodes {
        let from = graph
            .node_by_name(node.name())
            .ok_or_else(|| GraphError::UnknownNode(node.name().to_string()))?;

        for target in node.connections() {
            let to = graph.node_by_name(target).ok_or_else(|| {
                warn!("Node {} connects to unknown node {}", node.name(), target);
                GraphError::UnknownNode(target.clone())
            })?;

            let road = graph.add_road(road_name(node.name(), target), from, to)?;
            debug!("Road {} built", graph.road(road).name);
        }
    }

    info!(
        "Graph built with {} nodes and {} roads",
        graph.node_count(),
        graph.road_count()
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<NodeSpec> {
        vec![
            NodeSpec::new("a", [0.0, 0.0, 0.0], &["b"]),
            NodeSpec::new("b", [100.0, 0.0, 0.0], &["c"]),
            NodeSpec::new("c", [100.0, 0.0, 100.0], &["d"]),
            NodeSpec::new("d", [0.0, 0.0, 100.0], &["a"]),
        ]
    }

    #[test]
    fn test_simple_graph_construction() {
        let graph = build_graph(&square()).unwrap();

        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.road_count(), 4);
    }

    #[test]
    fn test_one_sided_declaration_is_symmetric() {
        let graph = build_graph(&square()).unwrap();
        let a = graph.node_by_name("a").unwrap();
        let b = graph.node_by_name("b").unwrap();

        let road = graph.road_between(a, b).expect("a and b should be connected");
        assert_eq!(graph.road_between(b, a), Some(road));

        // Direction follows the declaring node
        let road = graph.road(road);
        assert_eq!(road.name, "a-b");
        assert_eq!((road.start, road.end), (a, b));
    }

    #[test]
    fn test_road_geometry_follows_node_positions() {
        let graph = build_graph(&square()).unwrap();
        let road = graph.road(graph.road_by_name("b-c").unwrap());

        assert_eq!(road.geometry.start(), Point::new(100.0, 0.0, 0.0));
        assert_eq!(road.geometry.end(), Point::new(100.0, 0.0, 100.0));
    }

    #[test]
    fn test_hyphenated_node_names_get_distinct_roads() {
        let nodes = vec![
            NodeSpec::new("a-b", [0.0, 0.0, 0.0], &["c"]),
            NodeSpec::new("c", [100.0, 0.0, 0.0], &[]),
            NodeSpec::new("a", [0.0, 0.0, 100.0], &["b-c"]),
            NodeSpec::new("b-c", [100.0, 0.0, 100.0], &[]),
        ];
        let graph = build_graph(&nodes).unwrap();

        assert_eq!(graph.road_count(), 2);
        let first = graph.road_by_name(r"a\-b-c").expect("road from a-b to c");
        let second = graph.road_by_name(r"a-b\-c").expect("road from a to b-c");
        assert_ne!(first, second);
        assert_eq!(graph.road(first).start, graph.node_by_name("a-b").unwrap());
        assert_eq!(graph.road(second).end, graph.node_by_name("b-c").unwrap());
    }

    #[test]
    fn test_road_name_escapes_separator() {
        assert_eq!(road_name("a", "b"), "a-b");
        assert_eq!(road_name("a-b", "c"), r"a\-b-c");
        assert_eq!(road_name(r"a\", "b"), r"a\\-b");
        assert_ne!(road_name(r"a\", "-b"), road_name("a", r"\-b"));
    }

    #[test]
    fn test_double_declared_connection_fails() {
        let mut nodes = square();
        nodes[1].connections.push("a".to_string());

        let err = build_graph(&nodes).unwrap_err();
        assert_eq!(
            err,
            GraphError::DuplicateConnection { from: "b".into(), to: "a".into() }
        );
    }

    #[test]
    fn test_unknown_connection_fails() {
        let mut nodes = square();
        nodes[0].connections.push("z".to_string());

        assert_eq!(build_graph(&nodes).unwrap_err(), GraphError::UnknownNode("z".into()));
    }

    #[test]
    fn test_self_connection_fails() {
        let nodes = vec![NodeSpec::new("a", [0.0, 0.0, 0.0], &["a"])];

        assert_eq!(build_graph(&nodes).unwrap_err(), GraphError::SelfConnection("a".into()));
    }

    #[test]
    fn test_empty_nodes() {
        let nodes: Vec<NodeSpec> = vec![];
        let graph = build_graph(&nodes).unwrap();

        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.road_count(), 0);
    }

    #[test]
    fn test_node_spec_from_json() {
        let json = r#"{"name": "a", "position": [1.0, 2.0, 3.0]}"#;
        let spec: NodeSpec = serde_json::from_str(json).unwrap();

        assert_eq!(spec.position(), Point::new(1.0, 2.0, 3.0));
        assert!(spec.connections().is_empty());
    }
}

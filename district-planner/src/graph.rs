use crate::error::GraphError;
use crate::geometry::{Point, RoadGeometry, Segment};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::HashMap;

pub type NodeId = NodeIndex;
pub type RoadId = EdgeIndex;

/// An intersection in the road network
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub position: Point,
}

/// A named road joining two distinct nodes.
///
/// `start` and `end` give the road a direction for geometry (side
/// classification); the graph itself is undirected.
#[derive(Debug)]
pub struct Road {
    pub name: String,
    pub start: NodeId,
    pub end: NodeId,
    pub geometry: Box<dyn RoadGeometry>,
}

impl Road {
    /// The endpoint opposite `node`, if `node` is an endpoint at all
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if node == self.start {
            Some(self.end)
        } else if node == self.end {
            Some(self.start)
        } else {
            None
        }
    }
}

// Undirected: petgraph stores each road once and reaches it from both
// endpoints, so road(a, b) == road(b, a) holds structurally
type RoadNetwork = UnGraph<Node, Road>;

/// Road network adjacency: every node maps to its neighbours and the road
/// joining each pair. At most one road joins any unordered pair of nodes.
#[derive(Debug, Default)]
pub struct RoadGraph {
    network: RoadNetwork,
    node_names: HashMap<String, NodeId>,
    road_names: HashMap<String, RoadId>,
}

impl RoadGraph {
    pub fn new() -> Self {
        RoadGraph {
            network: UnGraph::new_undirected(),
            node_names: HashMap::new(),
            road_names: HashMap::new(),
        }
    }

    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        position: Point,
    ) -> Result<NodeId, GraphError> {
        let name = name.into();
        if self.node_names.contains_key(&name) {
            return Err(GraphError::DuplicateNode(name));
        }

        let id = self.network.add_node(Node { name: name.clone(), position });
        self.node_names.insert(name, id);
        Ok(id)
    }

    /// Add a straight road from `start` to `end`
    pub fn add_road(
        &mut self,
        name: impl Into<String>,
        start: NodeId,
        end: NodeId,
    ) -> Result<RoadId, GraphError> {
        let segment = Segment::new(self.try_node(start)?.position, self.try_node(end)?.position);
        self.add_road_with_geometry(name, start, end, Box::new(segment))
    }

    pub fn add_road_with_geometry(
        &mut self,
        name: impl Into<String>,
        start: NodeId,
        end: NodeId,
        geometry: Box<dyn RoadGeometry>,
    ) -> Result<RoadId, GraphError> {
        let name = name.into();
        let from = self.try_node(start)?.name.clone();
        let to = self.try_node(end)?.name.clone();
        if start == end {
            return Err(GraphError::SelfConnection(from));
        }
        if self.network.find_edge(start, end).is_some() {
            return Err(GraphError::DuplicateConnection { from, to });
        }
        if self.road_names.contains_key(&name) {
            return Err(GraphError::DuplicateRoad(name));
        }

        let road = Road {
            name: name.clone(),
            start,
            end,
            geometry,
        };
        let id = self.network.add_edge(start, end, road);
        self.road_names.insert(name, id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.network[id]
    }

    pub fn road(&self, id: RoadId) -> &Road {
        &self.network[id]
    }

    /// Node lookup for ids that may come from another graph
    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.network.node_weight(id)
    }

    pub fn get_road(&self, id: RoadId) -> Option<&Road> {
        self.network.edge_weight(id)
    }

    fn try_node(&self, id: NodeId) -> Result<&Node, GraphError> {
        self.get_node(id).ok_or(GraphError::MissingNode(id.index()))
    }

    pub fn node_by_name(&self, name: &str) -> Option<NodeId> {
        self.node_names.get(name).copied()
    }

    pub fn road_by_name(&self, name: &str) -> Option<RoadId> {
        self.road_names.get(name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.network.node_count()
    }

    pub fn road_count(&self) -> usize {
        self.network.edge_count()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.network.node_indices()
    }

    pub fn road_ids(&self) -> impl Iterator<Item = RoadId> + '_ {
        self.network.edge_indices()
    }

    /// Every node connected to `node`, paired with the road joining them
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, RoadId)> + '_ {
        self.network.edges(node).map(move |edge| {
            // For undirected graph, get the "other" node (not current)
            let other = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            (other, edge.id())
        })
    }

    pub fn road_between(&self, a: NodeId, b: NodeId) -> Option<RoadId> {
        self.network.find_edge(a, b)
    }

    /// Nodes reachable from `start`, in breadth-first order
    pub fn component_of(&self, start: NodeId) -> Vec<NodeId> {
        let mut bfs = Bfs::new(&self.network, start);
        let mut reached = Vec::new();
        while let Some(node) = bfs.next(&self.network) {
            reached.push(node);
        }
        reached
    }
}

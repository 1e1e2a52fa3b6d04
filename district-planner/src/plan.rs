use crate::config::PlanConfig;
use crate::cycle_cover::{extract_exterior_cycle, road_usage, select_interior_cycles};
use crate::cycle_finder::{find_cycles, find_cycles_in_components, Cycle};
use crate::error::{PlanError, Result};
use crate::geometry::{Point, Side};
use crate::graph::{Node, NodeId, Road, RoadGraph, RoadId};
use crate::graph_builder::{build_graph, BuildableNode, NodeSpec};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};

/// A named region bounded by roads, with the side of each road it lies on
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    pub name: String,
    pub boundary: Vec<(RoadId, Side)>,
}

impl District {
    pub fn roads(&self) -> impl Iterator<Item = RoadId> + '_ {
        self.boundary.iter().map(|&(road, _)| road)
    }
}

/// How a road takes part in the decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadRole {
    /// Shared wall between interior cycles
    Interior,
    /// On the outer boundary
    Exterior,
    /// In no interior cycle (the network has no districts)
    Unassigned,
}

/// Result of a closest-road query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestRoad {
    pub road: RoadId,
    pub point: Point,
    pub distance_squared: f64,
}

/// Plan document: the node collection plus build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub config: PlanConfig,
}

/// Serializable overview of a built plan, roads given by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_nodes: usize,
    pub total_roads: usize,
    pub cycles: Vec<Vec<String>>,
    pub interior_cycles: Vec<Vec<String>>,
    pub exterior_cycle: Option<Vec<String>>,
    pub interior_roads: Vec<String>,
}

/// A road network decomposed into cycles.
///
/// Everything is computed once at construction; a built plan is read-only.
#[derive(Debug)]
pub struct Plan {
    graph: RoadGraph,
    config: PlanConfig,
    cycles: Vec<Cycle>,
    interior: Vec<Cycle>,
    exterior: Option<Cycle>,
    usage: HashMap<RoadId, usize>,
    // Stays empty until district materialization is defined
    districts: Vec<District>,
    district_sides: HashMap<(RoadId, Side), usize>,
}

impl Plan {
    /// Build the road graph from buildable nodes, then decompose it
    pub fn build<N: BuildableNode>(nodes: &[N], config: PlanConfig) -> Result<Plan> {
        let graph = build_graph(nodes)?;
        Plan::from_graph(graph, config)
    }

    pub fn from_document(document: &PlanDocument) -> Result<Plan> {
        Plan::build(&document.nodes, document.config.clone())
    }

    /// Decompose a prebuilt road graph into interior and exterior cycles
    pub fn from_graph(graph: RoadGraph, config: PlanConfig) -> Result<Plan> {
        let cycles = match graph.node_ids().next() {
            None => Vec::new(),
            Some(start) if config.require_connected => {
                let reached = graph.component_of(start).len();
                if reached < graph.node_count() {
                    warn!(
                        "Start node {} reaches {} of {} nodes",
                        graph.node(start).name,
                        reached,
                        graph.node_count()
                    );
                    return Err(PlanError::DisconnectedGraph {
                        reached,
                        total: graph.node_count(),
                    });
                }
                find_cycles(&graph, start, config.max_cycles)?
            }
            Some(_) => find_cycles_in_components(&graph, config.max_cycles)?,
        };
        info!("Found {} cycles", cycles.len());

        let interior = select_interior_cycles(&graph, &cycles)?;
        let exterior = extract_exterior_cycle(&graph, &interior);
        let usage = road_usage(&interior);

        info!(
            "Plan built: {} nodes, {} roads, {} interior cycles",
            graph.node_count(),
            graph.road_count(),
            interior.len()
        );

        Ok(Plan {
            graph,
            config,
            cycles,
            interior,
            exterior,
            usage,
            districts: Vec::new(),
            district_sides: HashMap::new(),
        })
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.graph.node_ids().map(move |id| (id, self.graph.node(id)))
    }

    pub fn roads(&self) -> impl Iterator<Item = (RoadId, &Road)> + '_ {
        self.graph.road_ids().map(move |id| (id, self.graph.road(id)))
    }

    pub fn connected_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.graph.neighbors(node).map(|(other, _)| other).collect()
    }

    pub fn connected_roads(&self, node: NodeId) -> Vec<RoadId> {
        self.graph.neighbors(node).map(|(_, road)| road).collect()
    }

    pub fn road_between(&self, a: NodeId, b: NodeId) -> Result<RoadId> {
        let (from, to) = (self.lookup_node(a)?, self.lookup_node(b)?);
        self.graph.road_between(a, b).ok_or_else(|| {
            PlanError::Lookup(format!("no road between {} and {}", from.name, to.name))
        })
    }

    /// Side of `road` that `point` lies on, seen along the configured up axis
    pub fn side_of(&self, road: RoadId, point: &Point) -> Result<Option<Side>> {
        let road = self.lookup_road(road)?;
        Ok(road.geometry.side_of(point, &self.config.up_axis()))
    }

    fn lookup_node(&self, id: NodeId) -> Result<&Node> {
        self.graph
            .get_node(id)
            .ok_or_else(|| {
                PlanError::Lookup(format!("node index {} is not in this plan", id.index()))
            })
    }

    fn lookup_road(&self, id: RoadId) -> Result<&Road> {
        self.graph
            .get_road(id)
            .ok_or_else(|| {
                PlanError::Lookup(format!("road index {} is not in this plan", id.index()))
            })
    }

    /// Every cycle found, in discovery order
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn interior_cycles(&self) -> &[Cycle] {
        &self.interior
    }

    pub fn exterior_cycle(&self) -> Option<&Cycle> {
        self.exterior.as_ref()
    }

    pub fn road_role(&self, road: RoadId) -> RoadRole {
        match self.usage.get(&road) {
            None => RoadRole::Unassigned,
            Some(1) => RoadRole::Exterior,
            Some(_) => RoadRole::Interior,
        }
    }

    pub fn districts(&self) -> &[District] {
        &self.districts
    }

    /// District lying on `side` of `road`
    pub fn district_beside(&self, road: RoadId, side: Side) -> Result<&District> {
        let name = &self.lookup_road(road)?.name;
        self.district_sides
            .get(&(road, side))
            .and_then(|&index| self.districts.get(index))
            .ok_or_else(|| {
                PlanError::Lookup(format!("no district on the {:?} side of {}", side, name))
            })
    }

    /// Road closest to `point` over the whole network
    pub fn closest_road(&self, point: &Point) -> Option<ClosestRoad> {
        self.closest_among(self.graph.road_ids(), point)
    }

    /// Road closest to `point` among a district's boundary roads
    pub fn closest_road_in(&self, district: &District, point: &Point) -> Option<ClosestRoad> {
        self.closest_among(district.roads(), point)
    }

    // Linear scan; equal distances resolve to the lexicographically first road name.
    // Roads not in this plan are skipped.
    fn closest_among(
        &self,
        roads: impl Iterator<Item = RoadId>,
        point: &Point,
    ) -> Option<ClosestRoad> {
        roads
            .filter_map(|id| self.graph.get_road(id).map(|road| (id, road)))
            .map(|(id, road)| {
                let closest = road.geometry.closest_point(point);
                let candidate = ClosestRoad {
                    road: id,
                    point: closest,
                    distance_squared: nalgebra::distance_squared(&closest, point),
                };
                (candidate, road.name.as_str())
            })
            .min_by_key(|(candidate, name)| (OrderedFloat(candidate.distance_squared), *name))
            .map(|(candidate, _)| candidate)
    }

    pub fn summary(&self) -> PlanSummary {
        let names = |cycle: &Cycle| -> Vec<String> {
            cycle
                .road_names(&self.graph)
                .into_iter()
                .map(String::from)
                .collect()
        };

        let mut interior_roads: Vec<String> = self
            .graph
            .road_ids()
            .filter(|&road| self.road_role(road) == RoadRole::Interior)
            .map(|road| self.graph.road(road).name.clone())
            .collect();
        interior_roads.sort();

        PlanSummary {
            total_nodes: self.graph.node_count(),
            total_roads: self.graph.road_count(),
            cycles: self.cycles.iter().map(names).collect(),
            interior_cycles: self.interior.iter().map(names).collect(),
            exterior_cycle: self.exterior.as_ref().map(names),
            interior_roads,
        }
    }
}

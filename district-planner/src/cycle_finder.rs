use crate::error::{PlanError, Result};
use crate::graph::{NodeId, RoadGraph, RoadId};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A closed loop of roads.
///
/// Two cycles are equal when they hold the same roads, however they were
/// traversed. Roads are kept sorted by name, which makes the stored form
/// canonical and deterministic across runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle {
    roads: Vec<RoadId>,
}

impl Cycle {
    pub fn new(graph: &RoadGraph, roads: impl IntoIterator<Item = RoadId>) -> Self {
        let mut roads: Vec<RoadId> = roads.into_iter().collect();
        roads.sort_by(|a, b| graph.road(*a).name.cmp(&graph.road(*b).name));
        roads.dedup();
        Cycle { roads }
    }

    pub fn roads(&self) -> &[RoadId] {
        &self.roads
    }

    pub fn len(&self) -> usize {
        self.roads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roads.is_empty()
    }

    pub fn contains(&self, road: RoadId) -> bool {
        self.roads.contains(&road)
    }

    /// Road names in canonical (sorted) order
    pub fn road_names<'a>(&self, graph: &'a RoadGraph) -> Vec<&'a str> {
        self.roads
            .iter()
            .map(|&road| graph.road(road).name.as_str())
            .collect()
    }
}

/// One level of the depth-first search
struct Frame {
    node: NodeId,
    // Road taken to reach this node, None for the start node
    via: Option<RoadId>,
    predecessor: Option<NodeId>,
    neighbors: Vec<(NodeId, RoadId)>,
    next: usize,
}

impl Frame {
    fn new(
        graph: &RoadGraph,
        node: NodeId,
        via: Option<RoadId>,
        predecessor: Option<NodeId>,
    ) -> Self {
        Frame {
            node,
            via,
            predecessor,
            neighbors: graph.neighbors(node).collect(),
            next: 0,
        }
    }
}

/// Search state shared by every level of one enumeration
struct CycleSearch<'a> {
    graph: &'a RoadGraph,
    max_cycles: usize,
    // Nodes on the current path, and where each sits in it
    trace: Vec<NodeId>,
    trace_position: HashMap<NodeId, usize>,
    // trace_roads[i] joins trace[i] to trace[i + 1]
    trace_roads: Vec<RoadId>,
    travelled: HashSet<RoadId>,
    found: Vec<Cycle>,
    seen: HashSet<Cycle>,
}

impl<'a> CycleSearch<'a> {
    fn new(graph: &'a RoadGraph, max_cycles: usize) -> Self {
        CycleSearch {
            graph,
            max_cycles,
            trace: Vec::new(),
            trace_position: HashMap::new(),
            trace_roads: Vec::new(),
            travelled: HashSet::new(),
            found: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn enter(&mut self, node: NodeId, via: Option<RoadId>) {
        self.trace_position.insert(node, self.trace.len());
        self.trace.push(node);
        if let Some(road) = via {
            self.travelled.insert(road);
            self.trace_roads.push(road);
        }
    }

    fn leave(&mut self, frame: &Frame) {
        self.trace.pop();
        self.trace_position.remove(&frame.node);
        if let Some(road) = frame.via {
            self.trace_roads.pop();
            self.travelled.remove(&road);
        }
    }

    /// Record the cycle closed by `closing` back onto the trace at `position`
    fn close(&mut self, position: usize, closing: RoadId) -> Result<()> {
        let roads = self.trace_roads[position..]
            .iter()
            .copied()
            .chain(std::iter::once(closing));
        let cycle = Cycle::new(self.graph, roads);

        if self.seen.insert(cycle.clone()) {
            if self.found.len() >= self.max_cycles {
                return Err(PlanError::CycleLimitExceeded(self.max_cycles));
            }
            debug!("Cycle found: {:?}", cycle.road_names(self.graph));
            self.found.push(cycle);
        }
        Ok(())
    }

    fn run(&mut self, start: NodeId) -> Result<()> {
        let mut stack = vec![Frame::new(self.graph, start, None, None)];
        self.enter(start, None);

        while let Some(frame) = stack.last_mut() {
            // All neighbours exhausted: backtrack
            if frame.next == frame.neighbors.len() {
                if let Some(done) = stack.pop() {
                    self.leave(&done);
                }
                continue;
            }

            let (neighbor, road) = frame.neighbors[frame.next];
            frame.next += 1;
            let current = frame.node;

            if Some(neighbor) == frame.predecessor || self.travelled.contains(&road) {
                continue;
            }

            if let Some(&position) = self.trace_position.get(&neighbor) {
                self.close(position, road)?;
                continue;
            }

            stack.push(Frame::new(self.graph, neighbor, Some(road), Some(current)));
            self.enter(neighbor, Some(road));
        }

        Ok(())
    }
}

/// Find every distinct simple cycle reachable from `start`.
///
/// Exhaustive depth-first search, so exponential in the worst case; fails
/// with `CycleLimitExceeded` once more than `max_cycles` distinct cycles
/// turn up. Cycles come back in discovery order.
pub fn find_cycles(graph: &RoadGraph, start: NodeId, max_cycles: usize) -> Result<Vec<Cycle>> {
    let mut search = CycleSearch::new(graph, max_cycles);
    search.run(start)?;

    debug!(
        "Found {} cycles starting from node {}",
        search.found.len(),
        graph.node(start).name
    );
    Ok(search.found)
}

/// Find every distinct simple cycle in the graph, searching each connected
/// component from its first node and merging the results
pub fn find_cycles_in_components(graph: &RoadGraph, max_cycles: usize) -> Result<Vec<Cycle>> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut all_cycles = Vec::new();

    for node in graph.node_ids() {
        if visited.contains(&node) {
            continue;
        }
        visited.extend(graph.component_of(node));

        let remaining = max_cycles.saturating_sub(all_cycles.len());
        // Report the overall limit, not what was left of it
        let cycles = find_cycles(graph, node, remaining).map_err(|err| match err {
            PlanError::CycleLimitExceeded(_) => PlanError::CycleLimitExceeded(max_cycles),
            other => other,
        })?;
        // Components share no roads, so their cycles never collide
        all_cycles.extend(cycles);
    }

    Ok(all_cycles)
}

use crate::cycle_finder::Cycle;
use crate::error::{PlanError, Result};
use crate::graph::{RoadGraph, RoadId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Pick the interior cycles: the smallest cycles that together cover
/// every road.
///
/// Cycles are taken in ascending size, ties broken by their sorted road
/// names, and a cycle is kept only if it covers a road no kept cycle
/// covers yet. With no cycles at all (a tree) nothing is selected.
pub fn select_interior_cycles(
    graph: &RoadGraph,
    cycles: &[Cycle],
) -> Result<Vec<Cycle>> {
    if cycles.is_empty() {
        info!("No cycles found, network has no districts");
        return Ok(Vec::new());
    }

    // A road outside every cycle can never be covered
    let coverable: HashSet<RoadId> = cycles
        .iter()
        .flat_map(|c| c.roads().iter().copied())
        .collect();
    let mut uncoverable: Vec<&str> = graph
        .road_ids()
        .filter(|road| !coverable.contains(road))
        .map(|road| graph.road(road).name.as_str())
        .collect();
    uncoverable.sort_unstable();
    if let Some(name) = uncoverable.first() {
        return Err(PlanError::UncoverableRoad(name.to_string()));
    }

    let mut ordered: Vec<&Cycle> = cycles.iter().collect();
    ordered.sort_by_cached_key(|cycle| (cycle.len(), cycle.road_names(graph)));

    let total = graph.road_count();
    let mut covered: HashSet<RoadId> = HashSet::with_capacity(total);
    let mut interior = Vec::new();

    // Coverage only grows, so a cycle skipped once stays skippable
    for cycle in ordered {
        if covered.len() == total {
            break;
        }
        if cycle.roads().iter().all(|road| covered.contains(road)) {
            continue;
        }

        covered.extend(cycle.roads().iter().copied());
        debug!("Interior cycle selected: {:?}", cycle.road_names(graph));
        interior.push(cycle.clone());
    }

    info!(
        "Selected {} interior cycles out of {}",
        interior.len(),
        cycles.len()
    );
    Ok(interior)
}

/// How many of the given cycles contain each road
pub fn road_usage(cycles: &[Cycle]) -> HashMap<RoadId, usize> {
    let mut usage = HashMap::new();
    for cycle in cycles {
        for &road in cycle.roads() {
            *usage.entry(road).or_insert(0) += 1;
        }
    }
    usage
}

/// The outer boundary: every road that belongs to exactly one interior
/// cycle. `None` when there are no interior cycles.
pub fn extract_exterior_cycle(graph: &RoadGraph, interior: &[Cycle]) -> Option<Cycle> {
    if interior.is_empty() {
        return None;
    }

    let usage = road_usage(interior);
    let boundary = usage
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(road, _)| road);
    let exterior = Cycle::new(graph, boundary);

    info!("Exterior cycle has {} roads", exterior.len());
    Some(exterior)
}

//! Decompose a road network into districts.
//!
//! Roads and intersections form an undirected graph. Every simple cycle is
//! enumerated, the smallest cycles covering all roads become the interior
//! faces, and roads used by exactly one interior face form the exterior
//! boundary.
//!
//! ```no_run
//! use district_planner::{NodeSpec, Plan, PlanConfig};
//!
//! let nodes = vec![
//!     NodeSpec::new("a", [0.0, 0.0, 0.0], &["b"]),
//!     NodeSpec::new("b", [100.0, 0.0, 0.0], &["c"]),
//!     NodeSpec::new("c", [0.0, 0.0, 100.0], &["a"]),
//! ];
//! let plan = Plan::build(&nodes, PlanConfig::default())?;
//! assert_eq!(plan.interior_cycles().len(), 1);
//! # Ok::<(), district_planner::PlanError>(())
//! ```

pub mod config;
pub mod cycle_cover;
pub mod cycle_finder;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod graph_builder;
pub mod plan;

pub use config::PlanConfig;
pub use cycle_finder::Cycle;
pub use error::{GraphError, PlanError, Result};
pub use geometry::{Point, RoadGeometry, Segment, Side, Vector};
pub use graph::{Node, NodeId, Road, RoadGraph, RoadId};
pub use graph_builder::{build_graph, BuildableNode, NodeSpec};
pub use plan::{ClosestRoad, District, Plan, PlanDocument, PlanSummary, RoadRole};

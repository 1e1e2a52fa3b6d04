// Build a district plan from a JSON plan document and print its cycles
use anyhow::{bail, Context, Result};
use district_planner::config::{MAX_COORDINATE_VALUE, MAX_NODES};
use district_planner::{Plan, PlanDocument, Point};
use std::fs;
use tracing::{info, warn};

fn validate(document: &PlanDocument) -> Result<()> {
    if document.nodes.len() > MAX_NODES {
        warn!(
            "Document rejected: too many nodes ({} > {})",
            document.nodes.len(),
            MAX_NODES
        );
        bail!(
            "Too many nodes. Maximum allowed: {}. Received: {}",
            MAX_NODES,
            document.nodes.len()
        );
    }

    for node in &document.nodes {
        let in_bounds = node
            .position
            .iter()
            .all(|v| v.is_finite() && v.abs() <= MAX_COORDINATE_VALUE);
        if !in_bounds {
            bail!("Node {} has an invalid position {:?}", node.name, node.position);
        }
    }

    Ok(())
}

fn parse_point(args: &[String]) -> Result<Point> {
    if args.len() != 3 {
        bail!("--closest expects three coordinates");
    }
    let mut coords = [0.0; 3];
    for (slot, arg) in coords.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .with_context(|| format!("Invalid coordinate: {}", arg))?;
    }
    Ok(Point::from(coords))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: plan-districts <PLAN_JSON> [--closest <X> <Y> <Z>]");
        return Ok(());
    }

    let path = &args[1];
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let document: PlanDocument =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path))?;
    validate(&document)?;

    info!("Loaded {} nodes from {}", document.nodes.len(), path);

    let plan = Plan::from_document(&document).context("Failed to build plan")?;
    println!("{}", serde_json::to_string_pretty(&plan.summary())?);

    if args.get(2).map(String::as_str) == Some("--closest") {
        let point = parse_point(&args[3..])?;
        match plan.closest_road(&point) {
            Some(closest) => println!(
                "Closest road to {:?}: {} (distance {:.3})",
                point.coords.as_slice(),
                plan.graph().road(closest.road).name,
                closest.distance_squared.sqrt()
            ),
            None => println!("Plan has no roads"),
        }
    }

    Ok(())
}

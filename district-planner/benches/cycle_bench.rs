//! Criterion benchmarks for cycle enumeration on square street grids.
//! Grid sizes are in nodes per side; a 4x4 grid already has 213 cycles.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use district_planner::cycle_finder::find_cycles;
use district_planner::{build_graph, NodeSpec, Plan, PlanConfig};

fn grid(n: usize) -> Vec<NodeSpec> {
    let mut nodes = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let mut connections = Vec::new();
            if col + 1 < n {
                connections.push(format!("{}_{}", row, col + 1));
            }
            if row + 1 < n {
                connections.push(format!("{}_{}", row + 1, col));
            }
            nodes.push(NodeSpec {
                name: format!("{}_{}", row, col),
                position: [col as f64 * 100.0, 0.0, row as f64 * 100.0],
                connections,
            });
        }
    }
    nodes
}

fn bench_cycles(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycles");
    for &n in &[2usize, 3, 4] {
        let nodes = grid(n);
        let graph = build_graph(&nodes).expect("grid should build");
        let start = graph.node_ids().next().expect("grid has nodes");

        group.bench_with_input(BenchmarkId::new("find_cycles", n), &n, |b, _| {
            b.iter(|| find_cycles(&graph, start, 10_000).expect("within cycle limit"))
        });
        group.bench_with_input(BenchmarkId::new("plan_build", n), &n, |b, _| {
            b.iter(|| Plan::build(&nodes, PlanConfig::default()).expect("grid should decompose"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cycles);
criterion_main!(benches);

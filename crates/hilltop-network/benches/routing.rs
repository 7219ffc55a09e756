//! Benchmarks for route graph construction and shortest path search.
//!
//! ## Running the benchmarks
//!
//! ```bash
//! cargo bench -p hilltop-network
//! ```
//!
//! ## Benchmarks included
//!
//! - `graph_build/N` - Build an N x N lattice graph over a synthetic hill
//! - `shortest_path/N` - Corner-to-corner search on the same lattice
//! - `nearest_vertex/N` - Nearest-vertex queries against the lattice index

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hilltop_dem::{ElevationGrid, GridTransform};
use hilltop_network::{
    shortest_path, RoadLink, RoadNetwork, RoadVertex, RouteGraph, RoutingConfig, SpatialIndex,
    VertexId,
};

const SPACING: f64 = 50.0;

/// A cone-shaped hill covering the lattice, 10 m cells.
fn hill(side: usize) -> ElevationGrid {
    let cells = (side as f64 * SPACING / 10.0).ceil() as usize + 1;
    let centre = cells as f64 / 2.0;
    ElevationGrid::from_fn(GridTransform::new(-5.0, -5.0, 10.0, 10.0), cells, cells, |row, col| {
        let d = ((row as f64 - centre).powi(2) + (col as f64 - centre).powi(2)).sqrt();
        (200.0 - d).max(0.0) as f32
    })
    .expect("Failed to build hill grid")
}

/// Square lattice with 4-neighbour links.
fn lattice(side: usize) -> RoadNetwork {
    let vertices: Vec<RoadVertex> = (0..side * side)
        .map(|i| {
            let (i_x, i_y) = (i % side, i / side);
            RoadVertex::new(format!("v{}", i), i_x as f64 * SPACING, i_y as f64 * SPACING)
        })
        .collect();

    let mut links = Vec::new();
    for i in 0..side * side {
        let (i_x, i_y) = (i % side, i / side);
        if i_x + 1 < side {
            links.push(RoadLink::straight(format!("h{}", i), &vertices[i], &vertices[i + 1]));
        }
        if i_y + 1 < side {
            links.push(RoadLink::straight(format!("v{}", i), &vertices[i], &vertices[i + side]));
        }
    }

    RoadNetwork::new(vertices, links)
}

fn bench_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");
    let config = RoutingConfig::default();

    for side in [10usize, 40, 100].iter() {
        let network = lattice(*side);
        let grid = hill(*side);
        group.throughput(Throughput::Elements(network.links.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            b.iter(|| {
                let build = RouteGraph::build(&network, &grid, &config).expect("Build should succeed");
                black_box(build.graph.edge_count())
            });
        });
    }

    group.finish();
}

fn bench_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");
    let config = RoutingConfig::default();

    for side in [10usize, 40, 100].iter() {
        let network = lattice(*side);
        let graph = RouteGraph::build(&network, &hill(*side), &config)
            .expect("Build should succeed")
            .graph;
        let from = VertexId::from("v0");
        let to = VertexId::from(format!("v{}", side * side - 1));

        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            b.iter(|| {
                let path = shortest_path(&graph, &from, &to).expect("Lattice is connected");
                black_box(path.total_cost)
            });
        });
    }

    group.finish();
}

fn bench_nearest_vertex(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_vertex");

    for side in [10usize, 100, 300].iter() {
        let index = SpatialIndex::from_network(&lattice(*side));
        let extent = *side as f64 * SPACING;

        group.bench_with_input(BenchmarkId::from_parameter(side), side, |b, _| {
            let mut q = 0u64;
            b.iter(|| {
                q = q.wrapping_add(7919);
                let x = (q % 1000) as f64 / 1000.0 * extent;
                let y = (q / 1000 % 1000) as f64 / 1000.0 * extent;
                black_box(index.nearest(x, y).expect("Index is not empty"))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_graph_build, bench_shortest_path, bench_nearest_vertex);
criterion_main!(benches);

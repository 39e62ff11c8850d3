//! Synthetic graphs for property tests.

use geo::Point;
use isochron::prelude::*;

const METERS_PER_DEGREE_LAT: f64 = 110_540.0;
const METERS_PER_DEGREE_LON: f64 = 111_320.0;

pub fn lon_of(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LON
}

fn cost_model(speed_mps: f64) -> CostModel {
    CostModel {
        default_speed_mps: speed_mps,
    }
}

pub fn lat_of(meters: f64) -> f64 {
    meters / METERS_PER_DEGREE_LAT
}

/// Square lattice of `n` x `n` nodes, `spacing_m` apart, two-way edges,
/// uniform speed. Centred near (0, 0).
pub fn lattice_context(n: usize, spacing_m: f64, speed_mps: f64) -> RouteSearchContext {
    let mut builder = GraphBuilder::new();
    let mut nodes = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            nodes.push(builder.add_node(
                (j * n + i) as u64,
                lon_of(i as f64 * spacing_m),
                lat_of(j as f64 * spacing_m),
            ));
        }
    }
    for j in 0..n {
        for i in 0..n {
            if i + 1 < n {
                builder.add_two_way_edge(nodes[j * n + i], nodes[j * n + i + 1], spacing_m, Some(speed_mps));
            }
            if j + 1 < n {
                builder.add_two_way_edge(nodes[j * n + i], nodes[(j + 1) * n + i], spacing_m, Some(speed_mps));
            }
        }
    }
    RouteSearchContext::new(builder.build(), cost_model(speed_mps))
}

/// Symmetric 4-arm star: arms along +x, -x, +y, -y, each `segments`
/// edges of `segment_m` meters, uniform speed.
pub fn star_context(segments: usize, segment_m: f64, speed_mps: f64) -> RouteSearchContext {
    let mut builder = GraphBuilder::new();
    let center = builder.add_node(0, 0.0, 0.0);
    let mut id = 1u64;
    for (dir_x, dir_y) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
        let mut prev = center;
        for k in 1..=segments {
            let d = k as f64 * segment_m;
            let node = builder.add_node(id, lon_of(dir_x * d), lat_of(dir_y * d));
            id += 1;
            builder.add_two_way_edge(prev, node, segment_m, Some(speed_mps));
            prev = node;
        }
    }
    RouteSearchContext::new(builder.build(), cost_model(speed_mps))
}

/// One edge of `length_m` meters along +x from the origin.
pub fn single_edge_context(length_m: f64, speed_mps: f64) -> RouteSearchContext {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node(0, 0.0, 0.0);
    let b = builder.add_node(1, lon_of(length_m), 0.0);
    builder.add_two_way_edge(a, b, length_m, Some(speed_mps));
    RouteSearchContext::new(builder.build(), cost_model(speed_mps))
}

/// A single disconnected node at the origin plus a distant component the
/// snapper cannot prefer.
pub fn isolated_origin_context() -> RouteSearchContext {
    let mut builder = GraphBuilder::new();
    builder.add_node(0, 0.0, 0.0);
    let far_a = builder.add_node(1, lon_of(50_000.0), 0.0);
    let far_b = builder.add_node(2, lon_of(51_000.0), 0.0);
    builder.add_two_way_edge(far_a, far_b, 1000.0, Some(10.0));
    RouteSearchContext::new(builder.build(), cost_model(10.0))
}

pub fn origin() -> Point<f64> {
    Point::new(0.0, 0.0)
}

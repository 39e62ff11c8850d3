use criterion::{criterion_group, criterion_main, Criterion};

use geo::Point;
use isochron::prelude::*;

fn lattice_context(n: usize, spacing_m: f64, speed_mps: f64) -> RouteSearchContext {
    let mut builder = GraphBuilder::new();
    let mut nodes = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            nodes.push(builder.add_node(
                (j * n + i) as u64,
                i as f64 * spacing_m / 111_320.0,
                j as f64 * spacing_m / 110_540.0,
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
    RouteSearchContext::new(builder.build(), CostModel::default())
}

fn bench_builders(c: &mut Criterion) {
    let context = lattice_context(40, 100.0, 10.0);
    let factory = IsochroneMapBuilderFactory::new(&context);
    let ranges = RangeSpec::new(vec![120.0, 240.0, 360.0], RangeUnit::Seconds).unwrap();
    let parameters = IsochroneSearchParameters::new(Point::new(0.0, 0.0), ranges);

    c.bench_function("concave_balls_lattice_40", |b| {
        b.iter(|| factory.build_map(&parameters).unwrap());
    });

    let grid_parameters = parameters.clone().with_method("grid");
    c.bench_function("grid_lattice_40", |b| {
        b.iter(|| factory.build_map(&grid_parameters).unwrap());
    });
}

criterion_group!(benches, bench_builders);
criterion_main!(benches);

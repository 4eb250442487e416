mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use scenery::geometry::subdivide::DEFAULT_JITTER;
use scenery::geometry::{bezier_controls, fit_circle, subdivide, PolygonShape, Rect};

const TARGETS: [usize; 4] = [4, 20, 80, 300];
const VERTEX_COUNTS: [usize; 4] = [8, 32, 128, 512];

fn geometry_subdivide_benches(c: &mut Criterion) {
    let (w, h) = common::CANVASES[1];
    let rect = Rect::new(0.0, 0.0, w, h);
    let mut group = c.benchmark_group("geometry/subdivide");

    for &target in &TARGETS {
        let mut sampler = common::seeded(0x5EED ^ target as u64);
        let expected = subdivide(rect, target, DEFAULT_JITTER, &mut sampler).len();
        group.throughput(common::layers_throughput(expected));

        group.bench_with_input(BenchmarkId::from_parameter(target), &target, |b, &t| {
            b.iter(|| {
                let cells = subdivide(rect, t, DEFAULT_JITTER, &mut sampler);
                black_box(cells.len());
            });
        });
    }

    group.finish();
}

fn geometry_bezier_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/bezier_controls");

    for &n in &VERTEX_COUNTS {
        let vertices: Vec<Vec2> = (0..n)
            .map(|i| {
                let t = i as f32 / n as f32 * std::f32::consts::TAU;
                Vec2::new(t.cos() * 100.0, t.sin() * 60.0)
            })
            .collect();
        group.throughput(common::layers_throughput(n));

        group.bench_with_input(BenchmarkId::new("open", n), &vertices, |b, v| {
            b.iter(|| black_box(bezier_controls(v, 1.0, false).map(|p| p.len())));
        });
        group.bench_with_input(BenchmarkId::new("closed", n), &vertices, |b, v| {
            b.iter(|| black_box(bezier_controls(v, 1.0, true).map(|p| p.len())));
        });
    }

    group.finish();
}

fn geometry_blob_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/blob");
    let rect = Rect::new(0.0, 0.0, 240.0, 135.0);
    let shape = PolygonShape::default();
    let mut sampler = common::seeded(0xB10B);

    group.bench_function("fit_polygon_bezier", |b| {
        b.iter(|| {
            let circle = fit_circle(&rect, &mut sampler);
            let path = shape
                .generate(&circle, &mut sampler)
                .and_then(|v| bezier_controls(&v, 1.0, true));
            black_box(path.map(|p| p.len()));
        });
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::bench_criterion();
    targets = geometry_subdivide_benches, geometry_bezier_benches, geometry_blob_benches
}
criterion_main!(benches);

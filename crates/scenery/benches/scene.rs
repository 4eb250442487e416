mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use scenery::prelude::*;

fn plans() -> Vec<(&'static str, ScenePlan)> {
    vec![
        ("waves", ScenePlan::waves()),
        ("blobs", ScenePlan::blobs()),
        ("ovals", ScenePlan::ovals()),
        ("clouds", ScenePlan::clouds()),
        ("trees", ScenePlan::trees()),
    ]
}

fn scene_family_benches(c: &mut Criterion) {
    let palette = NamedPalette::default();
    let motto = MottoLayout::new(Vec2::new(480.0, 72.0));

    for (name, plan) in plans() {
        let mut group = c.benchmark_group(format!("scene/{name}"));

        for &(w, h) in &common::CANVASES {
            let config =
                SceneConfig::new(Vec2::new(w, h)).with_moon_time_ms(common::MOON_TIME_MS);
            let Ok(builder) = SceneBuilder::try_new(config) else {
                continue;
            };
            let mut sampler = common::seeded(0x5CE7E ^ w as u64);
            let expected = builder
                .build(&plan, Some(&motto), &palette, &mut sampler)
                .map(|s| s.layers.len())
                .unwrap_or(0);
            group.throughput(common::layers_throughput(expected));

            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{w}x{h}")),
                &plan,
                |b, p| {
                    b.iter(|| {
                        let scene = builder.build(p, Some(&motto), &palette, &mut sampler);
                        black_box(scene.map(|s| s.layers.len()).unwrap_or(0));
                    });
                },
            );
        }

        group.finish();
    }
}

fn scene_tree_depth_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/tree_depth");
    let mut sampler = common::seeded(0x7EE);

    for depth in [4u32, 6, 8, 10] {
        group.throughput(common::layers_throughput(1 << depth));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &d| {
            b.iter(|| {
                let t = tree(d, Vec2::new(500.0, 900.0), 64.0, &mut sampler);
                black_box(t.map(|t| t.len()).unwrap_or(0));
            });
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::bench_criterion();
    targets = scene_family_benches, scene_tree_depth_benches
}
criterion_main!(benches);

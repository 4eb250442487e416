#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::sampling::Sampler;

pub const SAMPLES: usize = 30;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT: Duration = Duration::from_secs(3);

/// Canvas sizes shared by the geometry and scene groups.
pub const CANVASES: [(f32, f32); 3] = [(1280.0, 720.0), (1920.0, 1080.0), (3840.0, 2160.0)];

/// Pinned so cloud benches always hit the same moon geometry.
pub const MOON_TIME_MS: f64 = 1_700_000_000_000.0;

pub fn bench_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLES)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT)
}

pub fn seeded(seed: u64) -> Sampler<StdRng> {
    Sampler::new(StdRng::seed_from_u64(seed))
}

/// Per-iteration element count; zero-sized outputs count as one.
pub fn layers_throughput(count: usize) -> Throughput {
    Throughput::Elements(count.max(1) as u64)
}

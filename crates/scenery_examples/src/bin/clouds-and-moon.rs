use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::prelude::*;
use scenery_examples::{init_tracing, render_scene_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let extent = Vec2::new(1920.0, 1080.0);

    // One scene per phase quarter, pinned so the output is reproducible.
    for (i, cycle) in [0.1, 0.25, 0.4, 0.5, 0.7].into_iter().enumerate() {
        let phase = MoonPhase::from_cycle(cycle);
        let config = SceneConfig::new(extent).with_moon_time_ms(cycle_to_millis(cycle));
        let builder = SceneBuilder::try_new(config)?;

        let mut sampler = Sampler::new(StdRng::seed_from_u64(11));
        let scene = builder.build(
            &ScenePlan::clouds(),
            None,
            &NamedPalette::default(),
            &mut sampler,
        )?;

        tracing::info!(
            "phase {:.2}: illumination {:.3}",
            phase.cycle(),
            phase.illumination()
        );
        let out = format!("clouds-and-moon-{i}.png");
        render_scene_to_png(&scene, &RenderConfig::new((960, 540)), out)?;
    }
    Ok(())
}

/// Unix time at which the lunar cycle reaches `cycle`.
fn cycle_to_millis(cycle: f64) -> f64 {
    use scenery::scene::moon::{MS_PER_DAY, NEW_MOON_EPOCH_DAYS, SYNODIC_MONTH_DAYS};
    (NEW_MOON_EPOCH_DAYS + cycle * SYNODIC_MONTH_DAYS) * MS_PER_DAY
}

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::prelude::*;
use scenery_examples::{init_tracing, render_scene_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let builder = SceneBuilder::try_new(SceneConfig::new(Vec2::new(1600.0, 900.0)))?;

    // Every family in one plan; vertical motto so the reserved box is tall.
    let plan = ScenePlan::waves()
        .with(ScatterGenerator::ovals())
        .with(CloudGenerator::default())
        .with(TreeGenerator::default());
    let motto = MottoLayout::new(Vec2::new(320.0, 48.0)).with_vertical(true);

    let mut sink = FnSink::new(|event: SceneEvent| match event {
        SceneEvent::GeneratorFinished {
            index,
            name,
            layers,
        } => tracing::info!("#{index} {name}: {layers} layers"),
        SceneEvent::Warning { context, message } => tracing::warn!("{context}: {message}"),
        other => tracing::debug!("{other:?}"),
    });

    let mut sampler = Sampler::new(StdRng::seed_from_u64(5));
    let scene = builder.build_with_events(
        &plan,
        Some(&motto),
        &NamedPalette::default(),
        &mut sampler,
        &mut sink,
    )?;

    render_scene_to_png(&scene, &RenderConfig::new((1600, 900)), "scene-events-log.png")?;
    Ok(())
}

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::prelude::*;
use scenery_examples::{init_tracing, render_scene_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = SceneConfig::new(Vec2::new(1280.0, 800.0)).with_dark_background(false);
    let builder = SceneBuilder::try_new(config)?;

    // Denser subdivision, more ovals.
    let plan = ScenePlan::new().with(
        ScatterGenerator::ovals()
            .with_target_cells(40)
            .with_max_elements(28),
    );

    let mut sampler = Sampler::new(StdRng::seed_from_u64(3));
    let scene = builder.build(&plan, None, &NamedPalette::default(), &mut sampler)?;

    render_scene_to_png(&scene, &RenderConfig::new((1280, 800)), "scatter-ovals-light.png")?;
    Ok(())
}

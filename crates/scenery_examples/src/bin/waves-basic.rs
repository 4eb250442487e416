use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::prelude::*;
use scenery_examples::{init_tracing, render_scene_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = SceneConfig::new(Vec2::new(1920.0, 1080.0));
    let builder = SceneBuilder::try_new(config)?;

    // Seven thin layers instead of the default five.
    let waves = WaveGenerator {
        layers: 7,
        ..WaveGenerator::default()
    };
    let plan = ScenePlan::new().with(waves);

    let mut sampler = Sampler::new(StdRng::seed_from_u64(7));
    let scene = builder.build(&plan, None, &NamedPalette::default(), &mut sampler)?;

    render_scene_to_png(&scene, &RenderConfig::new((960, 540)), "waves-basic.png")?;
    Ok(())
}

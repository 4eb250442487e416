use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::prelude::*;
use scenery_examples::{init_tracing, render_scene_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let builder = SceneBuilder::try_new(SceneConfig::new(Vec2::new(1920.0, 1080.0)))?;

    let mut sampler = Sampler::new(StdRng::seed_from_u64(2024));
    let scene = builder.build(
        &ScenePlan::trees(),
        None,
        &NamedPalette::default(),
        &mut sampler,
    )?;

    for layer in &scene.layers {
        if let SceneLayer::Tree(t) = layer {
            tracing::info!("tree with {} nodes in {}", t.tree.len(), t.color.label);
        }
    }

    render_scene_to_png(&scene, &RenderConfig::new((1920, 1080)), "trees-and-land.png")?;
    Ok(())
}

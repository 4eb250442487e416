use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use scenery::prelude::*;
use scenery_examples::{init_tracing, render_scene_to_png, RenderConfig};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let extent = Vec2::new(1920.0, 1080.0);
    let builder = SceneBuilder::try_new(SceneConfig::new(extent))?;

    // A 400x60 motto box; no blob cell may touch it.
    let motto = MottoLayout::new(Vec2::new(400.0, 60.0));
    let plan = ScenePlan::blobs();

    let mut sampler = Sampler::new(StdRng::seed_from_u64(42));
    let scene = builder.build(&plan, Some(&motto), &NamedPalette::default(), &mut sampler)?;

    tracing::info!(
        "{} blobs placed around {:?}",
        scene.count_of("blob"),
        scene.reservation.rect()
    );

    let rc = RenderConfig::new((960, 540)).with_reservation_outline(true);
    render_scene_to_png(&scene, &rc, "scatter-blobs-around-motto.png")?;
    Ok(())
}

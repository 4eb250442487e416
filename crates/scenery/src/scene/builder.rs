//! High-level builder that runs a [`ScenePlan`] on a canvas.
//!
//! A build measures the title once, installs the resulting [`TextReservation`], then runs each
//! generator in plan order against a shared [`Sampler`]. Generators that fail are logged,
//! reported as [`SceneEvent::Warning`] and left out of the scene; a failing title degrades to
//! an empty reservation.
use glam::Vec2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{check_canvas, Result};
use crate::sampling::Sampler;
use crate::scene::events::{EventSink, SceneEvent};
use crate::scene::moon::MoonPhase;
use crate::scene::palette::{Palette, Rgba, DARK, LIGHT};
use crate::scene::plan::ScenePlan;
use crate::scene::reservation::{TextReservation, TitleLayout};
use crate::scene::{SceneContext, SceneLayer};

/// Configuration for building a scene.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Canvas size in pixels.
    pub extent: Vec2,
    /// Pick colors that read on a dark background.
    pub dark_background: bool,
    /// Moon time in milliseconds since the Unix epoch; `None` uses the wall clock.
    pub moon_time_ms: Option<f64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            extent: Vec2::ZERO,
            dark_background: true,
            moon_time_ms: None,
        }
    }
}

impl SceneConfig {
    /// Creates a new [`SceneConfig`] for a canvas of the given size.
    pub fn new(extent: Vec2) -> Self {
        Self {
            extent,
            ..Default::default()
        }
    }

    /// Sets the background mode.
    pub fn with_dark_background(mut self, dark: bool) -> Self {
        self.dark_background = dark;
        self
    }

    /// Pins the moon phase to a fixed time.
    pub fn with_moon_time_ms(mut self, millis: f64) -> Self {
        self.moon_time_ms = Some(millis);
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        check_canvas(self.extent.x, self.extent.y)
    }

    /// Moon phase for this build.
    pub fn moon_phase(&self) -> MoonPhase {
        self.moon_time_ms
            .map_or_else(MoonPhase::now, MoonPhase::from_unix_millis)
    }
}

/// A finished scene: layers in draw order plus what a renderer needs around them.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub extent: Vec2,
    pub dark_background: bool,
    pub reservation: TextReservation,
    pub layers: Vec<SceneLayer>,
}

impl Scene {
    /// Canvas fill color.
    pub fn background(&self) -> Rgba {
        if self.dark_background {
            DARK
        } else {
            LIGHT
        }
    }

    /// Number of layers of the given kind (see [`SceneLayer::kind_name`]).
    pub fn count_of(&self, kind: &str) -> usize {
        self.layers.iter().filter(|l| l.kind_name() == kind).count()
    }
}

pub struct SceneBuilder {
    /// Build configuration applied to this builder.
    pub config: SceneConfig,
}

impl SceneBuilder {
    pub fn try_new(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn new(config: SceneConfig) -> Self {
        debug_assert!(
            config.extent.x > 0.0 && config.extent.y > 0.0,
            "extent must be > 0 in both components"
        );
        Self { config }
    }

    /// Builds the given plan, returning the scene.
    pub fn build(
        &self,
        plan: &ScenePlan,
        title: Option<&dyn TitleLayout>,
        palette: &dyn Palette,
        sampler: &mut Sampler<dyn RngCore>,
    ) -> Result<Scene> {
        build_scene(plan, &self.config, title, palette, sampler, None)
    }

    pub fn build_with_events(
        &self,
        plan: &ScenePlan,
        title: Option<&dyn TitleLayout>,
        palette: &dyn Palette,
        sampler: &mut Sampler<dyn RngCore>,
        sink: &mut dyn EventSink,
    ) -> Result<Scene> {
        build_scene(plan, &self.config, title, palette, sampler, Some(sink))
    }
}

pub fn build_scene(
    plan: &ScenePlan,
    config: &SceneConfig,
    title: Option<&dyn TitleLayout>,
    palette: &dyn Palette,
    sampler: &mut Sampler<dyn RngCore>,
    sink: Option<&mut dyn EventSink>,
) -> Result<Scene> {
    if let Some(s) = sink {
        build_scene_with_events(plan, config, title, palette, sampler, s)
    } else {
        build_scene_with_events(plan, config, title, palette, sampler, &mut ())
    }
}

pub fn build_scene_with_events(
    plan: &ScenePlan,
    config: &SceneConfig,
    title: Option<&dyn TitleLayout>,
    palette: &dyn Palette,
    sampler: &mut Sampler<dyn RngCore>,
    sink: &mut dyn EventSink,
) -> Result<Scene> {
    config.validate()?;
    sampler.clear_spare();

    sink.send(SceneEvent::BuildStarted {
        config: config.clone(),
        generator_count: plan.generators.len(),
    });

    if plan.generators.is_empty() {
        warn!("Scene plan has no generators.");
        sink.send(SceneEvent::Warning {
            context: "plan".into(),
            message: "Scene plan has no generators".into(),
        });
    }

    let reservation = match title.map(|t| t.reserve(config.extent)) {
        None => TextReservation::empty(),
        Some(Ok(reservation)) => reservation,
        Some(Err(e)) => {
            warn!("Title unavailable: {}; building without a reservation.", e);
            sink.send(SceneEvent::Warning {
                context: "title".into(),
                message: e.to_string(),
            });
            TextReservation::empty()
        }
    };
    sink.send(SceneEvent::ReservationInstalled { reservation });

    let moon_phase = config.moon_phase();
    let mut layers: Vec<SceneLayer> = Vec::new();

    for (index, generator) in plan.generators.iter().enumerate() {
        let name = generator.name().to_owned();
        info!("Generator {}: '{}'.", index, name);

        let mut ctx = SceneContext {
            sampler: &mut *sampler,
            palette,
            reservation,
            dark_background: config.dark_background,
            moon_phase,
        };
        match generator.generate(config.extent.into(), &mut ctx) {
            Ok(produced) => {
                debug!("Generator '{}' produced {} layers.", name, produced.len());
                sink.send(SceneEvent::GeneratorFinished {
                    index,
                    name,
                    layers: produced.len(),
                });
                layers.extend(produced);
            }
            Err(e) => {
                warn!("Generator '{}' failed: {}; skipping.", name, e);
                sink.send(SceneEvent::Warning {
                    context: name,
                    message: e.to_string(),
                });
            }
        }
    }

    sink.send(SceneEvent::BuildFinished {
        layer_count: layers.len(),
    });

    Ok(Scene {
        extent: config.extent,
        dark_background: config.dark_background,
        reservation,
        layers,
    })
}

#[cfg(test)]
mod tests {
    use mint::Vector2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::error::Error;
    use crate::geometry::Rect;
    use crate::scene::events::VecSink;
    use crate::scene::palette::NamedPalette;
    use crate::scene::reservation::{LogoLayout, MottoLayout};
    use crate::scene::SceneGenerator;

    const CANVAS: Vec2 = Vec2::new(1920.0, 1080.0);

    struct Failing;

    impl SceneGenerator for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn generate(
            &self,
            _extent: Vector2<f32>,
            _ctx: &mut SceneContext<'_, dyn RngCore>,
        ) -> Result<Vec<SceneLayer>> {
            Err(Error::DegenerateGeometry("nothing to draw".into()))
        }
    }

    /// Records the reservation it was handed.
    struct Probe(std::sync::Mutex<Option<TextReservation>>);

    impl SceneGenerator for Probe {
        fn name(&self) -> &str {
            "probe"
        }

        fn generate(
            &self,
            _extent: Vector2<f32>,
            ctx: &mut SceneContext<'_, dyn RngCore>,
        ) -> Result<Vec<SceneLayer>> {
            if let Ok(mut seen) = self.0.lock() {
                *seen = Some(ctx.reservation);
            }
            Ok(Vec::new())
        }
    }

    fn config() -> SceneConfig {
        SceneConfig::new(CANVAS).with_moon_time_ms(1_700_000_000_000.0)
    }

    fn sampler(seed: u64) -> Sampler<StdRng> {
        Sampler::new(StdRng::seed_from_u64(seed))
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(matches!(
            SceneBuilder::try_new(SceneConfig::new(Vec2::new(0.0, 10.0))),
            Err(Error::InvalidCanvas { .. })
        ));
        let mut s = sampler(1);
        let result = build_scene(
            &ScenePlan::waves(),
            &SceneConfig::new(Vec2::new(10.0, f32::NAN)),
            None,
            &NamedPalette::default(),
            &mut s,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn failing_generator_is_omitted_with_a_warning() {
        let builder = SceneBuilder::try_new(config()).expect("valid config");
        let plan = ScenePlan::new()
            .with(Failing)
            .with(crate::scene::waves::WaveGenerator::default());
        let mut sink = VecSink::new();
        let mut s = sampler(2);
        let scene = builder
            .build_with_events(&plan, None, &NamedPalette::default(), &mut s, &mut sink)
            .expect("build continues");

        assert_eq!(scene.layers.len(), 1);
        assert_eq!(scene.count_of("wave"), 1);
        let warnings: Vec<&str> = sink.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nothing to draw"));
    }

    #[test]
    fn failing_title_degrades_to_empty_reservation() {
        let builder = SceneBuilder::try_new(config()).expect("valid config");
        let logo = LogoLayout::new(|| Err(Error::TitleUnavailable("no such file".into())));
        let mut sink = VecSink::new();
        let mut s = sampler(3);
        let scene = builder
            .build_with_events(
                &ScenePlan::blobs(),
                Some(&logo),
                &NamedPalette::default(),
                &mut s,
                &mut sink,
            )
            .expect("build continues");
        assert!(scene.reservation.is_empty());
        assert_eq!(scene.count_of("blob"), 16);
        assert_eq!(sink.warnings().count(), 1);
    }

    #[test]
    fn generators_see_the_installed_reservation() {
        let builder = SceneBuilder::try_new(config()).expect("valid config");
        let motto = MottoLayout::new(Vec2::new(400.0, 60.0));
        let probe = std::sync::Arc::new(Probe(std::sync::Mutex::new(None)));

        struct Shared(std::sync::Arc<Probe>);
        impl SceneGenerator for Shared {
            fn name(&self) -> &str {
                self.0.name()
            }
            fn generate(
                &self,
                extent: Vector2<f32>,
                ctx: &mut SceneContext<'_, dyn RngCore>,
            ) -> Result<Vec<SceneLayer>> {
                self.0.generate(extent, ctx)
            }
        }

        let plan = ScenePlan::new().with(Shared(probe.clone()));
        let mut s = sampler(4);
        let scene = builder
            .build(&plan, Some(&motto), &NamedPalette::default(), &mut s)
            .expect("valid build");

        let expected = TextReservation::new(Rect::new(760.0, 330.0, 400.0, 60.0));
        assert_eq!(scene.reservation, expected);
        let seen = probe.0.lock().map(|g| *g).unwrap_or(None);
        assert_eq!(seen, Some(expected));
    }

    #[test]
    fn events_follow_the_build() {
        let builder = SceneBuilder::try_new(config()).expect("valid config");
        let plan = ScenePlan::waves().with(crate::scene::clouds::CloudGenerator::default());
        let mut sink = VecSink::new();
        let mut s = sampler(5);
        builder
            .build_with_events(&plan, None, &NamedPalette::default(), &mut s, &mut sink)
            .expect("valid build");

        let events = sink.into_inner();
        assert!(matches!(
            events.first(),
            Some(SceneEvent::BuildStarted {
                generator_count: 2,
                ..
            })
        ));
        assert!(matches!(
            events.get(1),
            Some(SceneEvent::ReservationInstalled { reservation }) if reservation.is_empty()
        ));
        assert!(matches!(
            events.get(2),
            Some(SceneEvent::GeneratorFinished { index: 0, layers: 1, .. })
        ));
        assert!(matches!(
            events.get(3),
            Some(SceneEvent::GeneratorFinished { index: 1, layers: 4, .. })
        ));
        assert!(matches!(
            events.last(),
            Some(SceneEvent::BuildFinished { layer_count: 5 })
        ));
    }

    #[test]
    fn empty_plan_warns() {
        let builder = SceneBuilder::try_new(config()).expect("valid config");
        let mut sink = VecSink::new();
        let mut s = sampler(6);
        let scene = builder
            .build_with_events(
                &ScenePlan::new(),
                None,
                &NamedPalette::default(),
                &mut s,
                &mut sink,
            )
            .expect("valid build");
        assert!(scene.layers.is_empty());
        assert_eq!(sink.warnings().count(), 1);
    }

    #[test]
    fn same_seed_same_scene() {
        let builder = SceneBuilder::try_new(config().with_dark_background(false))
            .expect("valid config");
        let plan = ScenePlan::waves()
            .with(crate::scene::scatter::ScatterGenerator::ovals())
            .with(crate::scene::trees::TreeGenerator::default());
        let palette = NamedPalette::default();
        let a = builder
            .build(&plan, None, &palette, &mut sampler(99))
            .expect("valid build");
        let b = builder
            .build(&plan, None, &palette, &mut sampler(99))
            .expect("valid build");
        assert_eq!(a, b);
        assert_eq!(a.background(), LIGHT);
    }

    #[test]
    fn pinned_moon_time_is_used() {
        let cfg = config();
        assert_eq!(
            cfg.moon_phase(),
            MoonPhase::from_unix_millis(1_700_000_000_000.0)
        );
    }
}

//! Scene families and the pipeline that assembles them into a background.
//!
//! Each family is a [`SceneGenerator`] that turns a canvas extent and a [`SceneContext`]
//! into typed [`SceneLayer`]s. Generators are independent of each other; they only read the
//! [`TextReservation`] installed at the start of a build.
use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{BezierPath, Rect};
use crate::sampling::Sampler;

pub mod builder;
pub mod clouds;
pub mod events;
pub mod moon;
pub mod palette;
pub mod plan;
pub mod reservation;
pub mod scatter;
pub mod trees;
pub mod waves;

use crate::scene::clouds::CloudOutline;
use crate::scene::moon::{MoonGeometry, MoonPhase};
use crate::scene::palette::{ColorRequest, ColorSample, Palette};
use crate::scene::reservation::TextReservation;
use crate::scene::trees::Tree;

/// Translucent stack of wave curves spanning the canvas width.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WaveLayer {
    /// Canvas extent; renderers close each curve down to the bottom edge.
    pub extent: Vec2,
    /// Height around which the first curve oscillates.
    pub baseline_y: f32,
    pub color: ColorSample,
    /// One open path per stacked layer, back to front.
    pub paths: Vec<BezierPath>,
}

/// Organic closed blob placed in a subdivision cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BlobLayer {
    pub color: ColorSample,
    pub path: BezierPath,
    /// Cell the blob was fitted into.
    pub cell: Rect,
}

/// Rotated ellipse placed in a subdivision cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct OvalLayer {
    pub color: ColorSample,
    pub center: Vec2,
    pub rx: f32,
    pub ry: f32,
    /// Rotation in radians.
    pub rotation: f32,
    /// Cell the oval was fitted into.
    pub cell: Rect,
}

/// Stroked cloud silhouette.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CloudLayer {
    pub color: ColorSample,
    pub outline: CloudOutline,
}

/// Branching tree with the color used for its blooms.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayer {
    pub tree: Tree,
    pub color: ColorSample,
}

/// Terrain ribbon below the trees plus the tinted sky band behind it.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LandLayer {
    /// Open ribbon along the hill profile.
    pub ribbon: BezierPath,
    /// Polygon closing the ribbon down to the canvas bottom, right to left.
    pub ground: [Vec2; 4],
    /// Band tinted with `color` at reduced alpha.
    pub sky_band: Rect,
    pub outline_width: f32,
    pub color: ColorSample,
}

/// One renderable element of a scene.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum SceneLayer {
    Wave(WaveLayer),
    Blob(BlobLayer),
    Oval(OvalLayer),
    Cloud(CloudLayer),
    Moon(MoonGeometry),
    Tree(TreeLayer),
    Land(LandLayer),
}

impl SceneLayer {
    /// Short lowercase name of the variant, for logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SceneLayer::Wave(_) => "wave",
            SceneLayer::Blob(_) => "blob",
            SceneLayer::Oval(_) => "oval",
            SceneLayer::Cloud(_) => "cloud",
            SceneLayer::Moon(_) => "moon",
            SceneLayer::Tree(_) => "tree",
            SceneLayer::Land(_) => "land",
        }
    }
}

/// Per-build state threaded through every generator.
pub struct SceneContext<'a, R: RngCore + ?Sized> {
    /// Random source for this build.
    pub sampler: &'a mut Sampler<R>,
    /// Color provider.
    pub palette: &'a dyn Palette,
    /// Region scatter generators must avoid.
    pub reservation: TextReservation,
    /// Palette bias: pick colors that read on a dark background.
    pub dark_background: bool,
    /// Moon phase drawn by the cloud family.
    pub moon_phase: MoonPhase,
}

impl<'a, R: RngCore + ?Sized> SceneContext<'a, R> {
    /// Context with an empty reservation, dark background and the current moon phase.
    pub fn new(sampler: &'a mut Sampler<R>, palette: &'a dyn Palette) -> Self {
        Self {
            sampler,
            palette,
            reservation: TextReservation::empty(),
            dark_background: true,
            moon_phase: MoonPhase::now(),
        }
    }

    pub fn with_reservation(mut self, reservation: TextReservation) -> Self {
        self.reservation = reservation;
        self
    }

    pub fn with_dark_background(mut self, dark: bool) -> Self {
        self.dark_background = dark;
        self
    }

    pub fn with_moon_phase(mut self, phase: MoonPhase) -> Self {
        self.moon_phase = phase;
        self
    }

    /// Draw a color from the palette, optionally overriding its alpha.
    pub fn color(&mut self, alpha: Option<f32>) -> ColorSample {
        let roll = self.sampler.unit();
        self.palette.pick(
            ColorRequest {
                dark_background: self.dark_background,
                alpha,
            },
            roll,
        )
    }
}

/// A scene family.
pub trait SceneGenerator: Send + Sync {
    /// Name used in logs and events.
    fn name(&self) -> &str;

    fn generate(
        &self,
        extent: Vector2<f32>,
        ctx: &mut SceneContext<'_, dyn RngCore>,
    ) -> Result<Vec<SceneLayer>>;
}

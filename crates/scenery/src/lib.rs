#![forbid(unsafe_code)]
//! scenery: Procedural background scene geometry.
//!
//! Modules:
//! - sampling: seeded random draws (uniform, integer, boolean, gaussian, shuffle)
//! - geometry: rectangles, circles, affine helpers, subdivision, bezier paths, polygons
//! - scene: wave, blob/oval, cloud/moon and tree/land families, title reservation, palette,
//!   plans, builder, events
//!
//! The crate produces geometry only; rasterising it is left to the caller.
pub mod error;
pub mod geometry;
pub mod sampling;
pub mod scene;

/// Convenient re-exports for common types. Import with `use scenery::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::geometry::affine::{apply, rotate, shear_squash, translate};
    pub use crate::geometry::{
        bezier_controls, fit_circle, subdivide, subdivision_depth, BezierPath, Circle,
        ControlTriple, CubicSegment, PolygonShape, Rect,
    };
    pub use crate::sampling::Sampler;
    pub use crate::scene::builder::{build_scene, Scene, SceneBuilder, SceneConfig};
    pub use crate::scene::clouds::{cloud, ArcSide, CloudArc, CloudGenerator, CloudOutline};
    pub use crate::scene::events::{EventSink, FnSink, SceneEvent, VecSink};
    pub use crate::scene::moon::{moon, MoonGeometry, MoonPhase};
    pub use crate::scene::palette::{
        ColorRequest, ColorSample, NamedPalette, Palette, Rgba, DARK, LIGHT,
    };
    pub use crate::scene::plan::ScenePlan;
    pub use crate::scene::reservation::{LogoLayout, MottoLayout, TextReservation, TitleLayout};
    pub use crate::scene::scatter::{ScatterGenerator, ScatterShape};
    pub use crate::scene::trees::{land_profile, tree, BranchNode, Flower, Petal, Tree, TreeGenerator};
    pub use crate::scene::waves::WaveGenerator;
    pub use crate::scene::{
        BlobLayer, CloudLayer, LandLayer, OvalLayer, SceneContext, SceneGenerator, SceneLayer,
        TreeLayer, WaveLayer,
    };
}

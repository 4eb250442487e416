//! Blobs and ovals scattered over a subdivided canvas.
//!
//! The canvas is split into jittered cells, the cells are shuffled, cells touching the
//! installed [`TextReservation`] are dropped, and the first few survivors each receive one
//! shape fitted into an inscribed circle.
use std::f32::consts::PI;

use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_canvas, Error, Result};
use crate::geometry::{bezier_controls, fit_circle, subdivide, PolygonShape, Rect};
use crate::sampling::Sampler;
use crate::scene::reservation::TextReservation;
use crate::scene::{BlobLayer, OvalLayer, SceneContext, SceneGenerator, SceneLayer};

/// Which shape is placed in each cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScatterShape {
    Blobs,
    Ovals,
}

/// Scatter family parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGenerator {
    pub shape: ScatterShape,
    /// Requested number of subdivision cells.
    pub target_cells: usize,
    /// Maximum number of shapes placed.
    pub max_elements: usize,
    /// Cut jitter of the subdivision.
    pub jitter: f32,
    /// Alpha applied to every shape color.
    pub alpha: f32,
    /// Blob outline parameters.
    pub polygon: PolygonShape,
    /// Standard deviation of the oval's relative vertical radius.
    pub oval_squash: f32,
}

impl ScatterGenerator {
    pub fn new(shape: ScatterShape) -> Self {
        Self {
            shape,
            target_cells: 20,
            max_elements: 16,
            jitter: crate::geometry::subdivide::DEFAULT_JITTER,
            alpha: 0.5,
            polygon: PolygonShape::default(),
            oval_squash: 0.2,
        }
    }

    pub fn blobs() -> Self {
        Self::new(ScatterShape::Blobs)
    }

    pub fn ovals() -> Self {
        Self::new(ScatterShape::Ovals)
    }

    pub fn with_max_elements(mut self, max: usize) -> Self {
        self.max_elements = max;
        self
    }

    pub fn with_target_cells(mut self, target: usize) -> Self {
        self.target_cells = target;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..0.5).contains(&self.jitter) {
            return Err(Error::InvalidConfig(
                "scatter jitter must be in [0, 0.5)".into(),
            ));
        }
        if self.shape == ScatterShape::Blobs {
            self.polygon.validate()?;
        }
        Ok(())
    }

    /// Shuffled cells that avoid `reservation`, at most `max_elements` of them.
    pub fn placement_cells<R: RngCore + ?Sized>(
        &self,
        extent: Vec2,
        reservation: &TextReservation,
        sampler: &mut Sampler<R>,
    ) -> Vec<Rect> {
        let mut cells = subdivide(
            Rect::from_extent(extent),
            self.target_cells,
            self.jitter,
            sampler,
        );
        sampler.shuffle(&mut cells);
        let total = cells.len();
        let placed: Vec<Rect> = cells
            .into_iter()
            .filter(|c| !reservation.blocks(c))
            .take(self.max_elements)
            .collect();
        debug!("Scatter: {} of {} cells usable.", placed.len(), total);
        placed
    }

    /// Blob shapes, one per placement cell.
    pub fn scatter_blobs<R: RngCore + ?Sized>(
        &self,
        extent: Vec2,
        ctx: &mut SceneContext<'_, R>,
    ) -> Result<Vec<BlobLayer>> {
        check_canvas(extent.x, extent.y)?;
        self.validate()?;
        let reservation = ctx.reservation;
        let cells = self.placement_cells(extent, &reservation, ctx.sampler);

        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            let color = ctx.color(Some(self.alpha));
            let circle = fit_circle(&cell, ctx.sampler);
            let vertices = self.polygon.generate(&circle, ctx.sampler)?;
            let path = bezier_controls(&vertices, 1.0, true)?;
            out.push(BlobLayer { color, path, cell });
        }
        Ok(out)
    }

    /// Rotated ovals, one per placement cell.
    pub fn scatter_ovals<R: RngCore + ?Sized>(
        &self,
        extent: Vec2,
        ctx: &mut SceneContext<'_, R>,
    ) -> Result<Vec<OvalLayer>> {
        check_canvas(extent.x, extent.y)?;
        self.validate()?;
        let reservation = ctx.reservation;
        let cells = self.placement_cells(extent, &reservation, ctx.sampler);

        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            let circle = fit_circle(&cell, ctx.sampler);
            let ry = ctx.sampler.gaussian(1.0, self.oval_squash) * circle.radius;
            let color = ctx.color(Some(self.alpha));
            let rotation = ctx.sampler.uniform(0.0, 2.0 * PI);
            out.push(OvalLayer {
                color,
                center: circle.center,
                rx: circle.radius,
                ry,
                rotation,
                cell,
            });
        }
        Ok(out)
    }
}

impl SceneGenerator for ScatterGenerator {
    fn name(&self) -> &str {
        match self.shape {
            ScatterShape::Blobs => "blobs",
            ScatterShape::Ovals => "ovals",
        }
    }

    fn generate(
        &self,
        extent: Vector2<f32>,
        ctx: &mut SceneContext<'_, dyn RngCore>,
    ) -> Result<Vec<SceneLayer>> {
        let extent: Vec2 = extent.into();
        Ok(match self.shape {
            ScatterShape::Blobs => self
                .scatter_blobs(extent, ctx)?
                .into_iter()
                .map(SceneLayer::Blob)
                .collect(),
            ScatterShape::Ovals => self
                .scatter_ovals(extent, ctx)?
                .into_iter()
                .map(SceneLayer::Oval)
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::scene::palette::NamedPalette;

    const CANVAS: Vec2 = Vec2::new(1920.0, 1080.0);

    #[test]
    fn sixteen_blobs_without_a_title() {
        let mut sampler = Sampler::new(StdRng::seed_from_u64(3));
        let palette = NamedPalette::default();
        let mut ctx = SceneContext::new(&mut sampler, &palette);
        let blobs = ScatterGenerator::blobs()
            .scatter_blobs(CANVAS, &mut ctx)
            .expect("valid canvas");
        assert_eq!(blobs.len(), 16);
        for blob in &blobs {
            assert!(blob.path.is_closed());
            assert_eq!(blob.path.len(), 6);
            assert_eq!(blob.color.rgba[3], 0.5);
        }
    }

    #[test]
    fn cells_avoid_the_reservation() {
        let reservation = TextReservation::new(Rect::new(700.0, 300.0, 520.0, 120.0));
        for seed in 0..20 {
            let mut sampler = Sampler::new(StdRng::seed_from_u64(seed));
            let palette = NamedPalette::default();
            let mut ctx = SceneContext::new(&mut sampler, &palette).with_reservation(reservation);
            let ovals = ScatterGenerator::ovals()
                .scatter_ovals(CANVAS, &mut ctx)
                .expect("valid canvas");
            assert!(ovals.len() <= 16);
            for oval in &ovals {
                assert!(!reservation.blocks(&oval.cell));
            }
        }
    }

    #[test]
    fn covering_reservation_leaves_nothing() {
        let mut sampler = Sampler::new(StdRng::seed_from_u64(1));
        let reservation = TextReservation::new(Rect::from_extent(CANVAS));
        let cells = ScatterGenerator::blobs().placement_cells(CANVAS, &reservation, &mut sampler);
        assert!(cells.is_empty());
    }

    #[test]
    fn ovals_fit_their_cells() {
        let mut sampler = Sampler::new(StdRng::seed_from_u64(9));
        let palette = NamedPalette::default();
        let mut ctx = SceneContext::new(&mut sampler, &palette);
        for oval in ScatterGenerator::ovals()
            .scatter_ovals(CANVAS, &mut ctx)
            .expect("valid canvas")
        {
            assert_eq!(oval.rx, oval.cell.w.min(oval.cell.h) / 2.0);
            assert!((0.0..2.0 * PI).contains(&oval.rotation));
            assert!(oval.ry.is_finite());
        }
    }

    #[test]
    fn generator_names_follow_the_shape() {
        assert_eq!(ScatterGenerator::blobs().name(), "blobs");
        assert_eq!(ScatterGenerator::ovals().name(), "ovals");
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn placement_respects_cap_and_reservation(
                seed: u64,
                max in 0usize..40,
                rx in 0f32..1800.0,
                ry in 0f32..1000.0,
                rw in 0f32..600.0,
                rh in 0f32..300.0,
            ) {
                let mut sampler = Sampler::new(StdRng::seed_from_u64(seed));
                let reservation = TextReservation::new(Rect::new(rx, ry, rw, rh));
                let cells = ScatterGenerator::blobs()
                    .with_max_elements(max)
                    .placement_cells(CANVAS, &reservation, &mut sampler);
                prop_assert!(cells.len() <= max.min(64));
                for c in &cells {
                    prop_assert!(!reservation.blocks(c));
                }
            }
        }
    }
}

//! Stacked translucent waves.
//!
//! Every layer is an open bezier through evenly spaced points whose heights jitter around a
//! per-layer band. All layers share one color at `1 / layers` alpha, so overlapping regions
//! build up density towards the bottom of the canvas.
use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_canvas, Error, Result};
use crate::geometry::bezier_controls;
use crate::scene::{SceneContext, SceneGenerator, SceneLayer, WaveLayer};

/// Wave family parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct WaveGenerator {
    /// Number of stacked curves.
    pub layers: usize,
    /// Baseline height as a fraction of the canvas height.
    pub baseline_fraction: f32,
    /// Height shared by all bands as a fraction of the canvas height.
    pub band_fraction: f32,
    /// Vertical jitter of each point, in band units.
    pub spread: f32,
    /// Inclusive range of the minimum point count shared by all layers.
    pub min_points: (i32, i32),
    /// Extra points each layer may add on top of the minimum.
    pub extra_points: i32,
    /// Handle scale of the bezier curves.
    pub smoothness: f32,
}

impl Default for WaveGenerator {
    fn default() -> Self {
        Self {
            layers: 5,
            baseline_fraction: 1.0 / 3.0,
            band_fraction: 2.0 / 3.0,
            spread: 0.7,
            min_points: (6, 9),
            extra_points: 5,
            smoothness: 1.0,
        }
    }
}

impl WaveGenerator {
    pub fn validate(&self) -> Result<()> {
        if self.layers == 0 {
            return Err(Error::InvalidConfig("waves need at least 1 layer".into()));
        }
        if self.min_points.0 < 1 || self.min_points.1 < self.min_points.0 {
            return Err(Error::InvalidConfig(format!(
                "invalid wave point range {:?}",
                self.min_points
            )));
        }
        if self.extra_points < 0 {
            return Err(Error::InvalidConfig(
                "wave extra_points must be >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Generate the wave stack for a canvas of size `extent`.
    pub fn waves<R: RngCore + ?Sized>(
        &self,
        extent: Vec2,
        ctx: &mut SceneContext<'_, R>,
    ) -> Result<WaveLayer> {
        check_canvas(extent.x, extent.y)?;
        self.validate()?;

        let baseline_y = self.baseline_fraction * extent.y;
        let band = self.band_fraction * extent.y / self.layers as f32;
        let min = ctx.sampler.uniform_int(self.min_points.0, self.min_points.1);

        let mut paths = Vec::with_capacity(self.layers);
        for i in 0..self.layers {
            let n = min + ctx.sampler.uniform_int(0, self.extra_points);
            let points: Vec<Vec2> = (0..=n)
                .map(|j| {
                    let x = extent.x * j as f32 / n as f32;
                    let y = baseline_y + ctx.sampler.amplitude(i as f32, self.spread) * band;
                    Vec2::new(x, y)
                })
                .collect();
            paths.push(bezier_controls(&points, self.smoothness, false)?);
        }

        let color = ctx.color(Some(1.0 / self.layers as f32));
        debug!(
            "Waves: {} layers around y={:.1}, color '{}'.",
            paths.len(),
            baseline_y,
            color.label
        );

        Ok(WaveLayer {
            extent,
            baseline_y,
            color,
            paths,
        })
    }
}

impl SceneGenerator for WaveGenerator {
    fn name(&self) -> &str {
        "waves"
    }

    fn generate(
        &self,
        extent: Vector2<f32>,
        ctx: &mut SceneContext<'_, dyn RngCore>,
    ) -> Result<Vec<SceneLayer>> {
        let layer = self.waves(extent.into(), ctx)?;
        Ok(vec![SceneLayer::Wave(layer)])
    }
}

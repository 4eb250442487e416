//! Organic closed polygons.
use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{polar, Circle};
use crate::sampling::Sampler;

/// Parameters for a jittered star-like polygon around a circle.
///
/// Angular steps are `amplitude(1, jitter_angle)` normalized to one full turn, so vertex
/// angles strictly increase and the outline never self-intersects. Each vertex radius is
/// `gaussian(1, jitter_radius)` times the circle radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonShape {
    /// Relative jitter of the angular steps, in [0, 1).
    pub jitter_angle: f32,
    /// Standard deviation of the relative vertex radius.
    pub jitter_radius: f32,
    /// Number of vertices, at least 3.
    pub vertices: usize,
}

impl Default for PolygonShape {
    fn default() -> Self {
        Self {
            jitter_angle: 0.6,
            jitter_radius: 0.2,
            vertices: 6,
        }
    }
}

impl PolygonShape {
    pub fn new(jitter_angle: f32, jitter_radius: f32, vertices: usize) -> Self {
        Self {
            jitter_angle,
            jitter_radius,
            vertices,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.vertices < 3 {
            return Err(Error::DegenerateGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                self.vertices
            )));
        }
        if !(0.0..1.0).contains(&self.jitter_angle) {
            return Err(Error::InvalidConfig(
                "polygon jitter_angle must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }

    /// Generate the polygon vertices around `circle`.
    pub fn generate<R: RngCore + ?Sized>(
        &self,
        circle: &Circle,
        sampler: &mut Sampler<R>,
    ) -> Result<Vec<Vec2>> {
        self.validate()?;

        let n = self.vertices;
        let steps: Vec<f32> = (0..n)
            .map(|_| sampler.amplitude(1.0, self.jitter_angle) * 2.0 / n as f32)
            .collect();
        let total: f32 = steps.iter().sum();

        let mut angle = sampler.uniform(0.0, 2.0) * PI;
        let mut out = Vec::with_capacity(n);
        for step in steps {
            angle += step / total * 2.0 * PI;
            let radius = sampler.gaussian(1.0, self.jitter_radius) * circle.radius;
            out.push(circle.center + polar(radius, angle));
        }
        Ok(out)
    }
}

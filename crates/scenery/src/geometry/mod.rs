//! Geometric building blocks used by the scene generators.
//!
//! - [`Rect`] and [`Circle`] primitives plus [`fit_circle`]
//! - [`affine`]: 2D transform composition over [`glam::Affine2`]
//! - [`subdivide`]: jittered quad-partition of a rectangle
//! - [`bezier`]: vertex sequences to bezier control triples
//! - [`polygon`]: organic closed polygons around a circle
use glam::Vec2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::sampling::Sampler;

pub mod affine;
pub mod bezier;
pub mod polygon;
pub mod subdivide;

pub use bezier::{bezier_controls, BezierPath, ControlTriple, CubicSegment};
pub use polygon::PolygonShape;
pub use subdivide::{subdivide, subdivision_depth};

/// Axis-aligned rectangle given by its top-left corner and size.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle anchored at the origin covering `extent`.
    pub fn from_extent(extent: Vec2) -> Self {
        Self::new(0.0, 0.0, extent.x, extent.y)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// Closed-interval AABB test: rectangles that merely touch also overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x > other.x + other.w
            || other.x > self.x + self.w
            || self.y > other.y + other.h
            || other.y > self.y + self.h)
    }
}

/// Circle given by center and radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Inscribe a circle in `rect`, sliding it randomly along the longer axis.
pub fn fit_circle<R: RngCore + ?Sized>(rect: &Rect, sampler: &mut Sampler<R>) -> Circle {
    let r = rect.w.min(rect.h) / 2.0;
    let center = if rect.w > rect.h {
        Vec2::new(rect.x + sampler.uniform(r, rect.w - r), rect.y + rect.h / 2.0)
    } else {
        Vec2::new(rect.x + rect.w / 2.0, rect.y + sampler.uniform(r, rect.h - r))
    };
    Circle::new(center, r)
}

/// Point at distance `radius` from the origin in direction `angle` (radians).
#[inline]
pub(crate) fn polar(radius: f32, angle: f32) -> Vec2 {
    Vec2::new(radius * angle.cos(), radius * angle.sin())
}

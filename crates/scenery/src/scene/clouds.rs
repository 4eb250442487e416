//! Stroked cloud silhouettes over a moon.
//!
//! A cloud is a stack of rows of equal height. Each row ends in a half-circle on the left or
//! right, and consecutive rows are joined by horizontal strokes, which gives the stepped
//! outline of a stylised cloud. Row widths are a permutation of `i / len` rearranged so that
//! they alternate between longer and shorter rows.
use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_canvas, Error, Result};
use crate::geometry::Rect;
use crate::sampling::Sampler;
use crate::scene::moon::{moon, MoonGeometry};
use crate::scene::{CloudLayer, SceneContext, SceneGenerator, SceneLayer};

/// Which way a row cap bulges.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSide {
    Left,
    Right,
}

/// Half-circle closing one cloud row.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudArc {
    pub center: Vec2,
    pub radius: f32,
    pub side: ArcSide,
    /// Draw a second, shifted half-circle behind the first.
    pub doubled: bool,
}

impl CloudArc {
    /// Center of the second half-circle, shifted one radius away from the bulge.
    pub fn echo_center(&self) -> Vec2 {
        match self.side {
            ArcSide::Left => self.center + Vec2::new(self.radius, 0.0),
            ArcSide::Right => self.center - Vec2::new(self.radius, 0.0),
        }
    }

    /// Start and end angle in radians for a y-down canvas.
    pub fn angles(&self) -> (f32, f32) {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self.side {
            ArcSide::Left => (FRAC_PI_2, PI + FRAC_PI_2),
            ArcSide::Right => (-FRAC_PI_2, FRAC_PI_2),
        }
    }
}

/// Cloud outline.
///
/// `polyline` is `[start, top_0, bottom_0, top_1, bottom_1, ..., end]`. The stroke runs
/// horizontally into `top_i`, follows `arcs[i]` down to `bottom_i`, then continues
/// horizontally to the next top.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CloudOutline {
    pub polyline: Vec<Vec2>,
    pub arcs: Vec<CloudArc>,
}

impl CloudOutline {
    pub fn rows(&self) -> usize {
        self.arcs.len()
    }
}

/// Cloud inside `rect` with rows `row_height` tall.
pub fn cloud<R: RngCore + ?Sized>(
    rect: Rect,
    row_height: f32,
    sampler: &mut Sampler<R>,
) -> Result<CloudOutline> {
    if !(row_height > 0.0) || !row_height.is_finite() {
        return Err(Error::InvalidConfig(format!(
            "cloud row height must be > 0, got {row_height}"
        )));
    }
    let len = (rect.h / row_height).floor();
    if !(len >= 2.0) {
        return Err(Error::DegenerateGeometry(format!(
            "cloud of height {} holds fewer than 2 rows of {row_height}",
            rect.h
        )));
    }
    let len = len as usize;

    let mut widths: Vec<f32> = (0..len).map(|i| i as f32 / len as f32).collect();
    alternate(&mut widths, sampler);
    sampler.shuffle(&mut widths);
    alternate(&mut widths, sampler);

    let start = Vec2::new(overhang(&rect, widths[0], widths[1], sampler), rect.y);

    let mut polyline = Vec::with_capacity(2 * len + 2);
    polyline.push(start);
    let mut rows = Vec::with_capacity(len);
    for (i, fraction) in widths.iter().enumerate() {
        let x = rect.x + rect.w * fraction;
        let top = rect.y + i as f32 * row_height;
        polyline.push(Vec2::new(x, top));
        polyline.push(Vec2::new(x, top + row_height));
        rows.push((x, top, sampler.boolean()));
    }

    let end = Vec2::new(
        overhang(&rect, widths[len - 1], widths[len - 2], sampler),
        rect.y + len as f32 * row_height,
    );
    polyline.push(end);

    let radius = row_height / 2.0;
    let arcs = rows
        .iter()
        .enumerate()
        .map(|(i, &(x, top, doubled))| {
            let next_x = rows.get(i + 1).map_or(end.x, |r| r.0);
            CloudArc {
                center: Vec2::new(x, top + radius),
                radius,
                side: if x < next_x {
                    ArcSide::Left
                } else {
                    ArcSide::Right
                },
                doubled,
            }
        })
        .collect();

    Ok(CloudOutline { polyline, arcs })
}

/// Rearrange so even indices are local maxima, or local minima, chosen at random.
fn alternate<R: RngCore + ?Sized>(values: &mut [f32], sampler: &mut Sampler<R>) {
    let peaks = sampler.boolean();
    let len = values.len();
    let misplaced = |center: f32, neighbour: f32| {
        if peaks {
            center < neighbour
        } else {
            center > neighbour
        }
    };
    for i in (0..len).step_by(2) {
        if i > 0 && misplaced(values[i], values[i - 1]) {
            values.swap(i, i - 1);
        }
        if i + 1 < len && misplaced(values[i], values[i + 1]) {
            values.swap(i, i + 1);
        }
    }
}

/// X of the first or last horizontal stroke: past the left edge when the row is wider than
/// its neighbour, past the right edge otherwise.
fn overhang<R: RngCore + ?Sized>(rect: &Rect, a: f32, b: f32, sampler: &mut Sampler<R>) -> f32 {
    let x = if a > b {
        sampler.gaussian(rect.x, rect.w * a / 4.0)
    } else {
        sampler.gaussian(rect.x + rect.w, rect.w * (1.0 - a) / 4.0)
    };
    x.floor()
}

/// Placement slot of one cloud: integer ranges in canvas fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CloudSlot {
    x_range: (f32, f32),
    y_range: (f32, f32),
    /// Maximum width in units of seven row heights.
    width_factor: f32,
    anchor: (f32, f32),
}

const SLOTS: [CloudSlot; 6] = [
    CloudSlot {
        x_range: (0.0, 1.0 / 8.0),
        y_range: (1.0 / 16.0, 1.0 / 8.0),
        width_factor: 2.0,
        anchor: (0.0, 0.0),
    },
    CloudSlot {
        x_range: (0.0, 1.0 / 8.0),
        y_range: (1.0 / 8.0, 1.0 / 4.0),
        width_factor: 2.0,
        anchor: (0.0, 1.0 / 4.0),
    },
    CloudSlot {
        x_range: (0.0, 1.0 / 4.0),
        y_range: (0.0, 1.0 / 4.0),
        width_factor: 2.5,
        anchor: (0.0, 0.5),
    },
    CloudSlot {
        x_range: (0.0, 1.0 / 4.0),
        y_range: (1.0 / 8.0, 1.0 / 4.0),
        width_factor: 3.0,
        anchor: (1.0 / 4.0, 0.5),
    },
    CloudSlot {
        x_range: (0.0, 1.0 / 4.0),
        y_range: (0.0, 1.0 / 4.0),
        width_factor: 2.5,
        anchor: (0.5, 0.5),
    },
    CloudSlot {
        x_range: (1.0 / 8.0, 1.0 / 4.0),
        y_range: (1.0 / 8.0, 1.0 / 4.0),
        width_factor: 2.0,
        anchor: (0.5, 1.0 / 4.0),
    },
];

/// Slot combinations that keep three clouds from piling up.
const LAYOUTS: [[usize; 3]; 5] = [[0, 2, 4], [0, 2, 5], [0, 3, 5], [1, 3, 5], [1, 3, 5]];

fn int_between<R: RngCore + ?Sized>(lo: f32, hi: f32, sampler: &mut Sampler<R>) -> f32 {
    sampler.uniform_int(lo.ceil() as i32, hi.floor() as i32) as f32
}

fn slot_rect<R: RngCore + ?Sized>(
    index: usize,
    extent: Vec2,
    row_height: f32,
    sampler: &mut Sampler<R>,
) -> Rect {
    let slot = SLOTS[index.min(SLOTS.len() - 1)];
    let tallest = if index == 0 { 5.0 } else { 7.0 };
    let h = int_between(3.0 * row_height, tallest * row_height, sampler);
    let w = int_between(2.0 * h, slot.width_factor * 7.0 * row_height, sampler);
    let x = int_between(slot.x_range.0 * extent.x, slot.x_range.1 * extent.x, sampler)
        + slot.anchor.0 * extent.x;
    let y = int_between(slot.y_range.0 * extent.y, slot.y_range.1 * extent.y, sampler)
        + slot.anchor.1 * extent.y;
    Rect::new(x, y, w, h)
}

/// Three clouds plus the moon.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CloudScene {
    pub moon: MoonGeometry,
    pub clouds: Vec<CloudLayer>,
}

/// Cloud family parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct CloudGenerator {
    /// Row height is the canvas height divided by this.
    pub rows_per_canvas: f32,
}

impl Default for CloudGenerator {
    fn default() -> Self {
        Self {
            rows_per_canvas: 27.0,
        }
    }
}

impl CloudGenerator {
    pub fn clouds<R: RngCore + ?Sized>(
        &self,
        extent: Vec2,
        ctx: &mut SceneContext<'_, R>,
    ) -> Result<CloudScene> {
        check_canvas(extent.x, extent.y)?;
        if !(self.rows_per_canvas > 0.0) {
            return Err(Error::InvalidConfig(
                "rows_per_canvas must be > 0".into(),
            ));
        }
        let row_height = extent.y / self.rows_per_canvas;
        let moon = moon(extent.x, ctx.moon_phase)?;

        let layout = LAYOUTS[ctx.sampler.uniform_int(0, LAYOUTS.len() as i32 - 1) as usize];
        let mut clouds = Vec::with_capacity(layout.len());
        for slot in layout {
            let color = ctx.color(None);
            let rect = slot_rect(slot, extent, row_height, ctx.sampler);
            let outline = cloud(rect, row_height, ctx.sampler)?;
            clouds.push(CloudLayer { color, outline });
        }
        debug!(
            "Clouds: layout {:?}, moon illumination {:.3}.",
            layout,
            ctx.moon_phase.illumination()
        );
        Ok(CloudScene { moon, clouds })
    }
}

impl SceneGenerator for CloudGenerator {
    fn name(&self) -> &str {
        "clouds"
    }

    fn generate(
        &self,
        extent: Vector2<f32>,
        ctx: &mut SceneContext<'_, dyn RngCore>,
    ) -> Result<Vec<SceneLayer>> {
        let scene = self.clouds(extent.into(), ctx)?;
        let mut layers = Vec::with_capacity(scene.clouds.len() + 1);
        layers.push(SceneLayer::Moon(scene.moon));
        layers.extend(scene.clouds.into_iter().map(SceneLayer::Cloud));
        Ok(layers)
    }
}

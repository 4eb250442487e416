//! Jittered quad-subdivision of a rectangle.
//!
//! Each level splits every cell with one vertical and one horizontal cut placed near the
//! middle. The cells always tile the input exactly, which makes them a cheap way to spread
//! shapes over a canvas without collisions.
use rand::Rng as RngCore;

use crate::geometry::Rect;
use crate::sampling::Sampler;

/// Default cut jitter, as a fraction of the cell size around the midpoint.
pub const DEFAULT_JITTER: f32 = 1.0 / 5.0;

/// Number of levels needed to reach at least `target_count` cells: `ceil(log2(n) / 2)`.
pub fn subdivision_depth(target_count: usize) -> u32 {
    if target_count <= 1 {
        return 0;
    }
    ((target_count as f64).log2() / 2.0).ceil() as u32
}

/// Split `rect` into `4^depth` cells, `depth = subdivision_depth(target_count)`.
///
/// Cut positions are `round(w * amplitude(1/2, jitter))` and likewise for `h`, so integral
/// inputs produce integral cells.
pub fn subdivide<R: RngCore + ?Sized>(
    rect: Rect,
    target_count: usize,
    jitter: f32,
    sampler: &mut Sampler<R>,
) -> Vec<Rect> {
    let depth = subdivision_depth(target_count);
    let mut cells = vec![rect];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(cells.len() * 4);
        for cell in &cells {
            next.extend(split(cell, jitter, sampler));
        }
        cells = next;
    }
    cells
}

fn split<R: RngCore + ?Sized>(cell: &Rect, jitter: f32, sampler: &mut Sampler<R>) -> [Rect; 4] {
    let Rect { x, y, w, h } = *cell;
    let a = (w * sampler.amplitude(0.5, jitter)).round().clamp(0.0, w);
    let b = (h * sampler.amplitude(0.5, jitter)).round().clamp(0.0, h);
    [
        Rect::new(x, y, a, b),
        Rect::new(x + a, y, w - a, b),
        Rect::new(x + a, y + b, w - a, h - b),
        Rect::new(x, y + b, a, h - b),
    ]
}

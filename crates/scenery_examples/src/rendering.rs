use std::path::Path;

use glam::{Affine2, Vec2};
use image::{Rgba as Pixel, RgbaImage};
use scenery::prelude::*;
use scenery::scene::moon::{Arc, GradientStop, LinearGradient, RadialGradient};
use tracing_subscriber::EnvFilter;

/// Stem color; trunks use [`DARK`].
const STEM: Rgba = [0.2, 0.2, 0.2, 0.7];
const OUTLINE: Rgba = [0.0, 0.0, 0.0, 0.4];

/// Initialise a `fmt` subscriber honouring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output size in pixels (width, height).
    pub image_size: (u32, u32),
    /// Line segments per bezier segment or arc.
    pub curve_steps: usize,
    /// Stroke width of cloud outlines in scene units.
    pub cloud_width: f32,
    /// Outline the title reservation.
    pub show_reservation: bool,
}

impl RenderConfig {
    pub fn new(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            curve_steps: 24,
            cloud_width: 2.0,
            show_reservation: false,
        }
    }

    pub fn with_reservation_outline(mut self, show: bool) -> Self {
        self.show_reservation = show;
        self
    }
}

/// Rasterise `scene` and write it as PNG.
pub fn render_scene_to_png(
    scene: &Scene,
    rc: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let img = render_scene(scene, rc);
    img.save(path.as_ref())?;
    tracing::info!("Wrote {}.", path.as_ref().display());
    Ok(())
}

/// Rasterise `scene` into an image of `rc.image_size`.
pub fn render_scene(scene: &Scene, rc: &RenderConfig) -> RgbaImage {
    let (w, h) = rc.image_size;
    let mut canvas = Canvas {
        img: RgbaImage::from_pixel(w, h, to_pixel(scene.background())),
        scale: Vec2::new(w as f32, h as f32) / scene.extent,
        steps: rc.curve_steps.max(2),
    };

    for layer in &scene.layers {
        match layer {
            SceneLayer::Wave(wave) => draw_wave(&mut canvas, wave),
            SceneLayer::Blob(blob) => {
                let pts = canvas.flatten(&blob.path);
                canvas.fill(&pts, |_| blob.color.rgba);
            }
            SceneLayer::Oval(oval) => draw_oval(&mut canvas, oval),
            SceneLayer::Cloud(cloud) => draw_cloud(&mut canvas, cloud, rc.cloud_width),
            SceneLayer::Moon(moon) => draw_moon(&mut canvas, moon),
            SceneLayer::Tree(tree) => draw_tree(&mut canvas, tree),
            SceneLayer::Land(land) => draw_land(&mut canvas, land),
        }
    }

    if rc.show_reservation {
        if let Some(r) = scene.reservation.rect() {
            let corners = [
                r.min(),
                Vec2::new(r.x + r.w, r.y),
                r.max(),
                Vec2::new(r.x, r.y + r.h),
                r.min(),
            ];
            canvas.stroke(&corners, 1.0, [1.0, 0.2, 0.2, 0.8]);
        }
    }

    canvas.img
}

fn draw_wave(canvas: &mut Canvas, wave: &WaveLayer) {
    for path in &wave.paths {
        let mut pts = vec![wave.extent, Vec2::new(0.0, wave.extent.y)];
        pts.extend(canvas.flatten(path));
        canvas.fill(&pts, |_| wave.color.rgba);
    }
}

fn draw_oval(canvas: &mut Canvas, oval: &OvalLayer) {
    let frame = Affine2::from_angle_translation(oval.rotation, oval.center);
    let n = canvas.steps * 4;
    let pts: Vec<Vec2> = (0..n)
        .map(|i| {
            let t = i as f32 / n as f32 * std::f32::consts::TAU;
            frame.transform_point2(Vec2::new(oval.rx * t.cos(), oval.ry * t.sin()))
        })
        .collect();
    canvas.fill(&pts, |_| oval.color.rgba);
}

fn draw_cloud(canvas: &mut Canvas, cloud: &CloudLayer, width: f32) {
    let line = &cloud.outline.polyline;
    let color = cloud.color.rgba;
    let mut stroke: Vec<Vec2> = vec![line[0]];
    for (i, arc) in cloud.outline.arcs.iter().enumerate() {
        stroke.push(line[1 + 2 * i]);
        let (start, end) = arc.angles();
        let mut bulge = canvas.arc(arc.center, arc.radius, start, end);
        // Left arcs sweep bottom to top; the outline runs top to bottom.
        if matches!(arc.side, ArcSide::Left) {
            bulge.reverse();
        }
        stroke.extend(bulge);
        if arc.doubled {
            let echo = canvas.arc(arc.echo_center(), arc.radius, start, end);
            canvas.stroke(&echo, width, color);
        }
    }
    stroke.push(line[line.len() - 1]);
    canvas.stroke(&stroke, width, color);
}

fn draw_moon(canvas: &mut Canvas, moon: &MoonGeometry) {
    let (center, tilt, outer, inner) = match moon {
        MoonGeometry::Full {
            center,
            radius,
            color,
        } => {
            let pts = canvas.arc(*center, *radius, 0.0, std::f32::consts::TAU);
            canvas.fill(&pts, |_| *color);
            return;
        }
        MoonGeometry::Half {
            center,
            tilt,
            outer,
            ..
        } => (*center, *tilt, *outer, None),
        MoonGeometry::Crescent {
            center,
            tilt,
            outer,
            inner,
            ..
        }
        | MoonGeometry::Gibbous {
            center,
            tilt,
            outer,
            inner,
            ..
        } => (*center, *tilt, *outer, Some(*inner)),
    };

    let frame = Affine2::from_angle_translation(tilt, center);
    let local = frame.inverse();
    let mut pts = canvas.arc_of(&outer);
    if let Some(inner) = inner {
        pts.extend(canvas.arc_of(&inner));
    }
    let pts: Vec<Vec2> = pts.into_iter().map(|p| frame.transform_point2(p)).collect();

    match moon {
        MoonGeometry::Half { gradient, .. } => {
            canvas.fill(&pts, |p| linear(gradient, local.transform_point2(p)));
        }
        MoonGeometry::Crescent { gradient, .. } | MoonGeometry::Gibbous { gradient, .. } => {
            canvas.fill(&pts, |p| radial(gradient, local.transform_point2(p)));
        }
        MoonGeometry::Full { .. } => {}
    }
}

fn draw_tree(canvas: &mut Canvas, layer: &TreeLayer) {
    let tree = &layer.tree;
    for node in tree.nodes().iter().flatten() {
        if let Some(Flower::Stem { width, from, to }) = &node.flower {
            canvas.stroke(&[*from, *to], *width, STEM);
        }
    }
    for branch in tree.branches() {
        canvas.stroke(&[branch.from, branch.to], branch.width, DARK);
    }
    for node in tree.nodes().iter().flatten() {
        if let Some(Flower::Bloom { petals, .. }) = &node.flower {
            for petal in petals {
                let mut pts = Vec::new();
                for segment in petal.outline() {
                    pts.extend(canvas.cubic(&segment));
                }
                canvas.fill(&pts, |_| layer.color.rgba);
            }
        }
    }
}

fn draw_land(canvas: &mut Canvas, land: &LandLayer) {
    let band = land.sky_band;
    let tint = land.color.with_alpha(0.4).rgba;
    canvas.fill(
        &[
            band.min(),
            Vec2::new(band.x + band.w, band.y),
            band.max(),
            Vec2::new(band.x, band.y + band.h),
        ],
        |_| tint,
    );

    let ribbon = canvas.flatten(&land.ribbon);
    let mut ground = ribbon.clone();
    ground.extend_from_slice(&land.ground);
    canvas.fill(&ground, |_| LIGHT);
    canvas.stroke(&ribbon, land.outline_width, OUTLINE);
}

fn linear(g: &LinearGradient, p: Vec2) -> Rgba {
    let axis = g.to - g.from;
    let t = if axis.length_squared() > 0.0 {
        (p - g.from).dot(axis) / axis.length_squared()
    } else {
        0.0
    };
    lerp_stops(&g.stops, t)
}

fn radial(g: &RadialGradient, p: Vec2) -> Rgba {
    let span = g.outer_radius - g.inner_radius;
    let d = p.distance(g.center);
    let t = if span.abs() > f32::EPSILON {
        (d - g.inner_radius) / span
    } else {
        0.0
    };
    lerp_stops(&g.stops, t)
}

fn lerp_stops(stops: &[GradientStop; 2], t: f32) -> Rgba {
    let [a, b] = stops;
    let span = b.offset - a.offset;
    let k = if span > 0.0 {
        ((t - a.offset) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut out = [0.0; 4];
    for (i, o) in out.iter_mut().enumerate() {
        *o = a.rgba[i] + (b.rgba[i] - a.rgba[i]) * k;
    }
    out
}

fn to_pixel(c: Rgba) -> Pixel<u8> {
    Pixel(c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8))
}

struct Canvas {
    img: RgbaImage,
    /// Scene units to pixels, per axis.
    scale: Vec2,
    steps: usize,
}

impl Canvas {
    fn flatten(&self, path: &BezierPath) -> Vec<Vec2> {
        let mut pts: Vec<Vec2> = path.start().into_iter().collect();
        for segment in path.segments() {
            pts.extend(self.cubic(&segment).into_iter().skip(1));
        }
        pts
    }

    fn cubic(&self, segment: &CubicSegment) -> Vec<Vec2> {
        (0..=self.steps)
            .map(|i| segment.point_at(i as f32 / self.steps as f32))
            .collect()
    }

    fn arc(&self, center: Vec2, radius: f32, start: f32, end: f32) -> Vec<Vec2> {
        (0..=self.steps)
            .map(|i| {
                let t = start + (end - start) * i as f32 / self.steps as f32;
                center + Vec2::new(t.cos(), t.sin()) * radius
            })
            .collect()
    }

    fn arc_of(&self, arc: &Arc) -> Vec<Vec2> {
        self.arc(arc.center, arc.radius, arc.start, arc.end)
    }

    fn blend(&mut self, x: u32, y: u32, c: Rgba) {
        let a = c[3].clamp(0.0, 1.0);
        let dst = self.img.get_pixel_mut(x, y);
        for i in 0..3 {
            let d = dst.0[i] as f32 / 255.0;
            dst.0[i] = ((c[i] * a + d * (1.0 - a)).clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        dst.0[3] = 255;
    }

    /// Even-odd scanline fill of a polygon given in scene units.
    fn fill(&mut self, pts: &[Vec2], shade: impl Fn(Vec2) -> Rgba) {
        if pts.len() < 3 {
            return;
        }
        let px: Vec<Vec2> = pts.iter().map(|p| *p * self.scale).collect();
        let (w, h) = self.img.dimensions();
        let (lo, hi) = px
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });
        let y0 = lo.floor().max(0.0) as u32;
        let y1 = (hi.ceil().max(0.0) as u32).min(h);

        let mut xs: Vec<f32> = Vec::new();
        for py in y0..y1 {
            let y = py as f32 + 0.5;
            xs.clear();
            for (i, a) in px.iter().enumerate() {
                let b = px[(i + 1) % px.len()];
                if (a.y <= y && y < b.y) || (b.y <= y && y < a.y) {
                    xs.push(a.x + (y - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            xs.sort_by(f32::total_cmp);
            for pair in xs.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil().max(0.0) as u32;
                let end = ((pair[1] - 0.5).ceil().max(0.0) as u32).min(w);
                for px_x in start..end {
                    let scene = Vec2::new(px_x as f32 + 0.5, y) / self.scale;
                    self.blend(px_x, py, shade(scene));
                }
            }
        }
    }

    /// Stroke a polyline given in scene units; every pixel is blended at most once.
    fn stroke(&mut self, pts: &[Vec2], width: f32, color: Rgba) {
        if pts.is_empty() {
            return;
        }
        let px: Vec<Vec2> = pts.iter().map(|p| *p * self.scale).collect();
        let r = (width * 0.5 * (self.scale.x + self.scale.y) * 0.5).max(0.5);
        let (w, h) = self.img.dimensions();
        let (lo, hi) = px.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let x0 = (lo.x - r).floor().max(0.0) as u32;
        let y0 = (lo.y - r).floor().max(0.0) as u32;
        let x1 = ((hi.x + r).ceil().max(0.0) as u32).min(w);
        let y1 = ((hi.y + r).ceil().max(0.0) as u32).min(h);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let bw = (x1 - x0) as usize;
        let mut mask = vec![false; bw * (y1 - y0) as usize];
        let stamp = |c: Vec2, mask: &mut [bool]| {
            let sx0 = ((c.x - r).floor().max(x0 as f32)) as u32;
            let sy0 = ((c.y - r).floor().max(y0 as f32)) as u32;
            let sx1 = ((c.x + r).ceil().max(0.0) as u32).min(x1);
            let sy1 = ((c.y + r).ceil().max(0.0) as u32).min(y1);
            for y in sy0..sy1 {
                for x in sx0..sx1 {
                    let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - c;
                    if d.length_squared() <= r * r {
                        mask[(y - y0) as usize * bw + (x - x0) as usize] = true;
                    }
                }
            }
        };

        stamp(px[0], &mut mask);
        for pair in px.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let n = (a.distance(b) / 0.5).ceil().max(1.0) as usize;
            for i in 1..=n {
                stamp(a.lerp(b, i as f32 / n as f32), &mut mask);
            }
        }

        for (i, hit) in mask.iter().enumerate() {
            if *hit {
                let x = x0 + (i % bw) as u32;
                let y = y0 + (i / bw) as u32;
                self.blend(x, y, color);
            }
        }
    }
}

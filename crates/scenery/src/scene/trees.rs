//! Branching trees with flowers, standing on a strip of land.
//!
//! Trees are complete binary heaps stored in a flat vector: index 0 is the ground anchor,
//! index 1 the trunk tip, and node `i` has children `2i` and `2i + 1`. Pruned branches are
//! `None`. Angles are in half-turns (1.0 is a straight angle) measured from vertical, so a
//! node at angle 0 grows straight up.
use std::f32::consts::PI;

use glam::Vec2;
use mint::Vector2;
use rand::Rng as RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{check_canvas, Error, Result};
use crate::geometry::affine::{apply, rotate, shear_squash, translate};
use crate::geometry::{bezier_controls, polar, BezierPath, CubicSegment, Rect};
use crate::sampling::Sampler;
use crate::scene::{LandLayer, SceneContext, SceneGenerator, SceneLayer, TreeLayer};

/// Deepest supported tree; `2^16` nodes.
pub const MAX_DEPTH: u32 = 16;

/// Branches shorter than this many unit lengths are pruned.
const PRUNE_BELOW: f32 = 0.3;

/// Heap indices below this carry stems instead of blooms.
const BLOOM_FROM_INDEX: usize = 8;

const PETALS: usize = 5;

/// Ground line as a fraction of the canvas height.
pub const GROUND_FRACTION: f32 = 5.0 / 6.0;

/// Hill profile in 48ths of the canvas height; 40 sits exactly on the ground line.
const LAND_PROFILE: [u8; 10] = [40, 40, 42, 44, 45, 46, 46, 43, 40, 40];

/// One petal: two edges from the flower center outwards, each three points at increasing
/// radius.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Petal {
    pub edges: [[Vec2; 3]; 2],
}

impl Petal {
    /// Closed outline: out along the first edge's tip, back along the second.
    pub fn outline(&self) -> [CubicSegment; 2] {
        let [a, b] = self.edges;
        [
            CubicSegment {
                from: a[1],
                ctrl1: a[2],
                ctrl2: b[2],
                to: b[1],
            },
            CubicSegment {
                from: b[1],
                ctrl1: b[0],
                ctrl2: a[0],
                to: a[1],
            },
        ]
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Flower {
    /// Short bare twig continuing the branch.
    Stem { width: f32, from: Vec2, to: Vec2 },
    /// Five petals seen from a random perspective.
    Bloom {
        petals: Vec<Petal>,
        /// The flower is tilted towards the viewer; drawn over its branch.
        faces_viewer: bool,
    },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode {
    pub position: Vec2,
    /// Growth direction in half-turns from vertical.
    pub angle: f32,
    /// Stroke width of the branch ending at this node.
    pub width: f32,
    pub flower: Option<Flower>,
}

impl BranchNode {
    fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            angle,
            width: 0.0,
            flower: None,
        }
    }
}

/// Stroke from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    /// Heap index of the child.
    pub child: usize,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Option<BranchNode>>,
}

impl Tree {
    pub fn nodes(&self) -> &[Option<BranchNode>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BranchNode> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    /// Present children of `index`; indices past the end count as pruned.
    pub fn children(&self, index: usize) -> (Option<&BranchNode>, Option<&BranchNode>) {
        (self.get(2 * index), self.get(2 * index + 1))
    }

    /// Branch strokes, parents before children.
    pub fn branches(&self) -> impl Iterator<Item = Branch> + '_ {
        (0..self.nodes.len() / 2).flat_map(move |j| {
            let parent = self.get(j);
            [2 * j, 2 * j + 1]
                .into_iter()
                .filter(move |&c| c != j)
                .filter_map(move |c| {
                    let (p, n) = (parent?, self.get(c)?);
                    Some(Branch {
                        from: p.position,
                        to: n.position,
                        width: n.width,
                        child: c,
                    })
                })
        })
    }
}

/// Grow a tree of `depth` generations rooted at `base`.
///
/// `unit_length` scales every branch. Stroke widths and flowers scale with `base.y`, which is
/// the ground height on the canvas.
pub fn tree<R: RngCore + ?Sized>(
    depth: u32,
    base: Vec2,
    unit_length: f32,
    sampler: &mut Sampler<R>,
) -> Result<Tree> {
    if depth == 0 || depth > MAX_DEPTH {
        return Err(Error::InvalidConfig(format!(
            "tree depth must be in 1..={MAX_DEPTH}, got {depth}"
        )));
    }
    let len = 1usize << depth;
    let mut nodes: Vec<Option<BranchNode>> = vec![None; len];

    let anchor = BranchNode::new(base, 0.0);
    let lean = sampler.gaussian(0.0, 1.0 / 32.0);
    nodes[1] = branch(Some(&anchor), lean, unit_length, sampler);
    nodes[0] = Some(anchor);

    for i in 1..len / 2 {
        let parent = nodes[i].clone();
        nodes[2 * i] = branch(parent.as_ref(), -0.25, unit_length, sampler);
        nodes[2 * i + 1] = branch(parent.as_ref(), 0.25, unit_length, sampler);
    }

    // Children sit at higher indices, so a descending pass sees them first. Node 0 is its own
    // left child and still has width 0 when visited.
    let leaf_bonus = 1.25 * base.y / 1024.0;
    for i in (0..len).rev() {
        if nodes[i].is_none() {
            continue;
        }
        let width_of = |k: usize| {
            nodes
                .get(k)
                .and_then(Option::as_ref)
                .map_or(0.0, |n: &BranchNode| n.width)
        };
        let width = merge_width(width_of(2 * i), width_of(2 * i + 1), leaf_bonus);
        if let Some(node) = nodes[i].as_mut() {
            node.width = width;
        }
    }

    let flower_scale = base.y / 54.0;
    for i in 1..len {
        let left = nodes.get(2 * i).is_some_and(Option::is_some);
        let right = nodes.get(2 * i + 1).is_some_and(Option::is_some);
        if left == right {
            continue;
        }
        let grown = match nodes[i].as_ref() {
            Some(node) => flower(node, i, flower_scale, sampler),
            None => continue,
        };
        if let Some(node) = nodes[i].as_mut() {
            node.flower = Some(grown);
        }
    }

    Ok(Tree { nodes })
}

fn branch<R: RngCore + ?Sized>(
    parent: Option<&BranchNode>,
    bias: f32,
    unit_length: f32,
    sampler: &mut Sampler<R>,
) -> Option<BranchNode> {
    let parent = parent?;
    let angle = parent.angle + bias * sampler.uniform(0.1, 0.9);
    let scale = sampler.uniform(0.1, 0.9) * 3.0 * (1.0 - angle.abs()).powi(2);
    if scale < PRUNE_BELOW {
        return None;
    }
    let position = parent.position + polar(scale * unit_length, (angle - 0.5) * PI);
    Some(BranchNode::new(position, angle))
}

/// Width of a branch given its children's widths (0 when pruned).
///
/// Two children merge sub-additively; a single child is carried with a small boost; leaves get
/// `leaf_bonus`.
fn merge_width(left: f32, right: f32, leaf_bonus: f32) -> f32 {
    let lone = |a: f32, b: f32| if a == 0.0 { b } else { 0.0 };
    let merged = (0.7 * (left + right) + 0.5 * (lone(left, right) + lone(right, left)))
        .max(1.2 * left)
        .max(1.2 * right);
    if left == 0.0 && right == 0.0 {
        merged + leaf_bonus
    } else {
        merged
    }
}

fn flower<R: RngCore + ?Sized>(
    node: &BranchNode,
    index: usize,
    scale: f32,
    sampler: &mut Sampler<R>,
) -> Flower {
    if index < BLOOM_FROM_INDEX {
        let reach = sampler.gaussian(2.5, 1.0) * scale;
        return Flower::Stem {
            width: node.width * 0.9,
            from: node.position,
            to: node.position + polar(reach, (node.angle - 0.5) * PI),
        };
    }

    let spread = 2.0 / (PETALS as f32 + 1.0);
    let tilt = sampler.gaussian(0.5, 1.0 / 9.0);
    let spin = sampler.uniform(0.0, 2.0) * PI;
    let facing = 1.0 - (2.0 * tilt - 1.0).abs();
    let steps: Vec<f32> = (0..PETALS)
        .map(|_| sampler.gaussian(1.0, 0.5 - facing))
        .collect();
    let total: f32 = steps.iter().sum();

    let transforms = [
        shear_squash((tilt * PI).cos() * facing, (tilt * PI).sin() * facing),
        rotate(spin),
        translate(node.position),
    ];
    let point = |radius: f32, angle: f32| apply(polar(radius * scale, angle * PI), &transforms);

    let mut start = 0.0;
    let petals = steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            start += if total > f32::EPSILON {
                step * spread / total
            } else {
                spread / PETALS as f32
            };
            let edge = |t: usize| {
                let angle = start + t as f32 * spread;
                [0.05, 0.1, 1.0].map(|r| point(r, angle))
            };
            Petal {
                edges: [edge(i), edge(i + 1)],
            }
        })
        .collect();

    Flower::Bloom {
        petals,
        faces_viewer: (tilt * PI).sin() * facing > 0.6,
    }
}

/// Hill ribbon across the middle of the canvas.
pub fn land_profile<R: RngCore + ?Sized>(
    extent: Vec2,
    sampler: &mut Sampler<R>,
) -> Result<BezierPath> {
    check_canvas(extent.x, extent.y)?;
    let points: Vec<Vec2> = LAND_PROFILE
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = (i + 5) as f32 * extent.x / 20.0;
            let y = if v == 40 {
                GROUND_FRACTION * extent.y
            } else {
                sampler.gaussian(v as f32 * extent.y / 48.0, extent.y / 96.0)
            };
            Vec2::new(x, y)
        })
        .collect();
    bezier_controls(&points, 0.3, false)
}

/// Two trees plus the land strip.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeScene {
    pub trees: Vec<TreeLayer>,
    pub land: LandLayer,
}

/// Tree family parameters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TreeGenerator {
    /// Depth of the tree on the left.
    pub small_depth: u32,
    /// Depth of the tree on the right.
    pub large_depth: u32,
}

impl Default for TreeGenerator {
    fn default() -> Self {
        Self {
            small_depth: 6,
            large_depth: 8,
        }
    }
}

impl TreeGenerator {
    pub fn trees<R: RngCore + ?Sized>(
        &self,
        extent: Vec2,
        ctx: &mut SceneContext<'_, R>,
    ) -> Result<TreeScene> {
        check_canvas(extent.x, extent.y)?;
        let ribbon = land_profile(extent, ctx.sampler)?;
        let color = ctx.color(None);

        let ground = GROUND_FRACTION * extent.y;
        let unit = extent.x / 30.0;
        let left = Vec2::new(ctx.sampler.uniform(2.0, 5.0) * extent.x / 20.0, ground);
        let small = tree(self.small_depth, left, unit, ctx.sampler)?;
        let right = Vec2::new(ctx.sampler.uniform(14.0, 18.0) * extent.x / 20.0, ground);
        let large = tree(self.large_depth, right, unit, ctx.sampler)?;

        debug!(
            "Trees: {} + {} nodes, color '{}'.",
            small.nodes().iter().flatten().count(),
            large.nodes().iter().flatten().count(),
            color.label
        );

        let land = LandLayer {
            ribbon,
            ground: [
                Vec2::new(extent.x, ground),
                Vec2::new(extent.x, extent.y),
                Vec2::new(0.0, extent.y),
                Vec2::new(0.0, ground),
            ],
            sky_band: Rect::new(0.0, 7.0 * extent.y / 8.0, extent.x, extent.y / 8.0),
            outline_width: 2.0 * extent.y / 1024.0,
            color: color.clone(),
        };
        Ok(TreeScene {
            trees: vec![
                TreeLayer {
                    tree: small,
                    color: color.clone(),
                },
                TreeLayer { tree: large, color },
            ],
            land,
        })
    }
}

impl SceneGenerator for TreeGenerator {
    fn name(&self) -> &str {
        "trees"
    }

    fn generate(
        &self,
        extent: Vector2<f32>,
        ctx: &mut SceneContext<'_, dyn RngCore>,
    ) -> Result<Vec<SceneLayer>> {
        let scene = self.trees(extent.into(), ctx)?;
        let mut layers: Vec<SceneLayer> = scene.trees.into_iter().map(SceneLayer::Tree).collect();
        layers.push(SceneLayer::Land(scene.land));
        Ok(layers)
    }
}

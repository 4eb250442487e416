//! Smooth bezier paths through a vertex sequence.
//!
//! Every vertex `b` with neighbours `a` and `c` gets an incoming and an outgoing control
//! point. Both are offsets of `b` parallel to `c - a`, split in proportion to the two edge
//! lengths, so short edges get short handles.
//!
//! Open paths start and end with two flat caps (all three points on the end vertex) so the
//! stroke does not curve past the first or last vertex.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Incoming control point, vertex, outgoing control point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlTriple {
    pub pre: Vec2,
    pub vertex: Vec2,
    pub post: Vec2,
}

impl ControlTriple {
    /// Triple whose controls coincide with the vertex.
    pub const fn flat(vertex: Vec2) -> Self {
        Self {
            pre: vertex,
            vertex,
            post: vertex,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.pre == self.vertex && self.post == self.vertex
    }
}

/// One cubic bezier segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub from: Vec2,
    pub ctrl1: Vec2,
    pub ctrl2: Vec2,
    pub to: Vec2,
}

impl CubicSegment {
    /// Point on the segment at parameter `t` in [0, 1].
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.from * (u * u * u)
            + self.ctrl1 * (3.0 * u * u * t)
            + self.ctrl2 * (3.0 * u * t * t)
            + self.to * (t * t * t)
    }
}

/// Ordered control triples plus the open/closed flag.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPath {
    triples: Vec<ControlTriple>,
    closed: bool,
}

impl BezierPath {
    pub fn triples(&self) -> &[ControlTriple] {
        &self.triples
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Cubic segments in drawing order.
    ///
    /// Closed paths yield one segment per triple and wrap around. Open paths skip the
    /// zero-length joins between duplicated caps.
    pub fn segments(&self) -> impl Iterator<Item = CubicSegment> + '_ {
        let n = self.triples.len();
        let count = if self.closed { n } else { n.saturating_sub(1) };
        (0..count).filter_map(move |k| {
            let a = &self.triples[k];
            let b = &self.triples[(k + 1) % n];
            if !self.closed && a == b {
                return None;
            }
            Some(CubicSegment {
                from: a.vertex,
                ctrl1: a.post,
                ctrl2: b.pre,
                to: b.vertex,
            })
        })
    }

    /// First point a renderer should move to.
    pub fn start(&self) -> Option<Vec2> {
        if self.closed {
            self.triples.last().map(|t| t.vertex)
        } else {
            self.triples.first().map(|t| t.vertex)
        }
    }
}

/// Build control triples for `vertices`.
///
/// `smoothness` scales every handle; 0 yields a polyline. Open paths need at least two
/// vertices and return `N + 2` triples. Closed paths need three and return `N` triples,
/// starting at vertex 1 and ending on vertex 0.
pub fn bezier_controls(vertices: &[Vec2], smoothness: f32, closed: bool) -> Result<BezierPath> {
    let n = vertices.len();
    let min = if closed { 3 } else { 2 };
    if n < min {
        return Err(Error::DegenerateGeometry(format!(
            "{} bezier path needs at least {min} vertices, got {n}",
            if closed { "closed" } else { "open" }
        )));
    }

    let triples = if closed {
        let mut triples: Vec<ControlTriple> = (0..n)
            .map(|i| {
                smooth_triple(
                    vertices[(i + n - 1) % n],
                    vertices[i],
                    vertices[(i + 1) % n],
                    smoothness,
                )
            })
            .collect();
        triples.rotate_left(1);
        triples
    } else {
        let first = ControlTriple::flat(vertices[0]);
        let last = ControlTriple::flat(vertices[n - 1]);
        let mut triples = Vec::with_capacity(n + 2);
        triples.push(first);
        triples.push(first);
        triples.extend(
            vertices
                .windows(3)
                .map(|w| smooth_triple(w[0], w[1], w[2], smoothness)),
        );
        triples.push(last);
        triples.push(last);
        triples
    };

    Ok(BezierPath { triples, closed })
}

fn smooth_triple(a: Vec2, b: Vec2, c: Vec2, smoothness: f32) -> ControlTriple {
    let la = a.distance(b);
    let lc = c.distance(b);
    let ma = (a + b) * 0.5;
    let mc = (c + b) * 0.5;
    let total = la + lc;
    let k = if total > 0.0 { la / total } else { 0.5 };
    let target = ma + (mc - ma) * k;
    ControlTriple {
        pre: b + (ma - target) * smoothness,
        vertex: b,
        post: b + (mc - target) * smoothness,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| Vec2::new(i as f32 * 10.0, if i % 2 == 0 { 0.0 } else { 5.0 }))
            .collect()
    }

    #[test]
    fn open_path_has_flat_caps_on_both_ends() {
        let v = zigzag(5);
        let path = bezier_controls(&v, 1.0, false).expect("valid");
        assert!(!path.is_closed());
        assert_eq!(path.len(), v.len() + 2);

        let t = path.triples();
        for cap in &t[..2] {
            assert_eq!(*cap, ControlTriple::flat(v[0]));
        }
        for cap in &t[t.len() - 2..] {
            assert_eq!(*cap, ControlTriple::flat(v[4]));
        }
        for (triple, vertex) in t[2..t.len() - 2].iter().zip(&v[1..4]) {
            assert_eq!(triple.vertex, *vertex);
        }
    }

    #[test]
    fn closed_path_has_one_triple_per_vertex() {
        let v = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let path = bezier_controls(&v, 1.0, true).expect("valid");
        assert!(path.is_closed());
        assert_eq!(path.len(), 4);
        assert_eq!(path.triples()[0].vertex, v[1]);
        assert_eq!(path.triples()[3].vertex, v[0]);
        assert_eq!(path.segments().count(), 4);
        assert_eq!(path.start(), Some(v[0]));
    }

    #[test]
    fn handles_are_parallel_to_the_neighbour_chord() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 10.0);
        let c = Vec2::new(30.0, 0.0);
        let t = smooth_triple(a, b, c, 1.0);
        let chord = (c - a).normalize();
        assert!((t.post - t.pre).normalize().dot(chord) > 0.9999);
        // Handle lengths follow the edge-length split.
        let ratio = (t.pre - b).length() / (t.post - b).length();
        assert!((ratio - a.distance(b) / c.distance(b)).abs() < 1e-4);
    }

    #[test]
    fn zero_smoothness_collapses_handles() {
        let path = bezier_controls(&zigzag(4), 0.0, false).expect("valid");
        assert!(path.triples().iter().all(ControlTriple::is_flat));
    }

    #[test]
    fn coincident_neighbours_do_not_produce_nan() {
        let p = Vec2::new(1.0, 1.0);
        let path = bezier_controls(&[p, p, p], 1.0, true).expect("valid");
        for t in path.triples() {
            assert!(t.pre.is_finite() && t.post.is_finite());
        }
    }

    #[test]
    fn open_segments_skip_duplicated_caps() {
        let v = zigzag(4);
        let path = bezier_controls(&v, 1.0, false).expect("valid");
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), v.len() - 1);
        assert_eq!(segments[0].from, v[0]);
        assert_eq!(segments[0].ctrl1, v[0]);
        assert_eq!(segments.last().map(|s| s.to), Some(v[3]));
        assert_eq!(segments.last().map(|s| s.ctrl2), Some(v[3]));
        assert_eq!(segments[1].point_at(0.0), v[1]);
        assert_eq!(segments[1].point_at(1.0), v[2]);
    }

    #[test]
    fn too_few_vertices_is_an_error() {
        let p = Vec2::ZERO;
        assert!(matches!(
            bezier_controls(&[p], 1.0, false),
            Err(Error::DegenerateGeometry(_))
        ));
        assert!(bezier_controls(&[p, p], 1.0, true).is_err());
        assert_eq!(
            bezier_controls(&[p, Vec2::ONE], 1.0, false)
                .expect("two vertices")
                .len(),
            4
        );
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        fn vertices(min: usize) -> impl Strategy<Value = Vec<Vec2>> {
            proptest::collection::vec((-500f32..500.0, -500f32..500.0), min..30)
                .prop_map(|v| v.into_iter().map(|(x, y)| Vec2::new(x, y)).collect())
        }

        proptest! {
            #[test]
            fn open_shape(v in vertices(2), smooth in 0f32..1.5) {
                let path = bezier_controls(&v, smooth, false).expect("valid");
                prop_assert_eq!(path.len(), v.len() + 2);
                let t = path.triples();
                prop_assert_eq!(t[0], ControlTriple::flat(v[0]));
                prop_assert_eq!(t[1], ControlTriple::flat(v[0]));
                prop_assert_eq!(t[t.len() - 1], ControlTriple::flat(v[v.len() - 1]));
                prop_assert_eq!(t[t.len() - 2], ControlTriple::flat(v[v.len() - 1]));
                prop_assert!(t.iter().all(|c| c.pre.is_finite() && c.post.is_finite()));
            }

            #[test]
            fn closed_shape(v in vertices(3), smooth in 0f32..1.5) {
                let path = bezier_controls(&v, smooth, true).expect("valid");
                prop_assert_eq!(path.len(), v.len());
                prop_assert_eq!(path.segments().count(), v.len());
            }
        }
    }
}

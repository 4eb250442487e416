//! Moon phase arithmetic and the lit-disc geometry drawn above the clouds.
//!
//! The phase is a position in the synodic cycle (0 = new, 0.5 = full). The disc is drawn as
//! an outer half circle plus an inner arc whose curvature depends on the illuminated fraction;
//! the terminator is softened with a short gradient.
use std::f64::consts::PI;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{check_canvas, Result};
use crate::scene::palette::Rgba;

/// Mean synodic month in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_2;

/// Reference new moon, in days since the Unix epoch.
pub const NEW_MOON_EPOCH_DAYS: f64 = 18_256.8;

/// Milliseconds per day.
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Gradient stop color on the lit side of the terminator.
pub const TERMINATOR_LIT: Rgba = [0.8, 0.8, 0.8, 1.0];

/// Gradient stop color on the dark side of the terminator.
pub const TERMINATOR_SHADE: Rgba = [0.0, 0.0, 0.0, 0.0];

/// Position in the synodic cycle, in [0, 1).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonPhase {
    cycle: f64,
}

impl MoonPhase {
    pub fn from_cycle(cycle: f64) -> Self {
        let cycle = if cycle.is_finite() {
            cycle.rem_euclid(1.0)
        } else {
            0.0
        };
        // rem_euclid of a tiny negative value rounds up to 1.0.
        Self {
            cycle: if cycle >= 1.0 { 0.0 } else { cycle },
        }
    }

    /// Phase at `millis` milliseconds since the Unix epoch.
    ///
    /// Times before the reference new moon mirror those after it.
    pub fn from_unix_millis(millis: f64) -> Self {
        let days = millis / MS_PER_DAY;
        let cycles = ((days - NEW_MOON_EPOCH_DAYS) / SYNODIC_MONTH_DAYS).abs();
        Self::from_cycle(cycles.fract())
    }

    /// Phase at the current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as f64;
        Self::from_unix_millis(millis)
    }

    pub fn cycle(&self) -> f64 {
        self.cycle
    }

    /// Illuminated fraction of the disc, rounded to three decimals.
    pub fn illumination(&self) -> f64 {
        let lit = 1.0 - (2.0 * self.cycle - 1.0).abs();
        (lit * 1000.0).round() / 1000.0
    }

    /// Rotation of the lit side: waning moons lean one way, waxing the other.
    pub fn tilt(&self) -> f32 {
        if self.cycle > 0.5 {
            std::f32::consts::FRAC_PI_4
        } else {
            -std::f32::consts::FRAC_PI_4
        }
    }
}

/// Circular arc from `start` to `end` radians, counter-clockwise in a y-down frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub center: Vec2,
    pub radius: f32,
    pub start: f32,
    pub end: f32,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub rgba: Rgba,
}

/// Two-stop gradient between two points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub from: Vec2,
    pub to: Vec2,
    pub stops: [GradientStop; 2],
}

/// Two-stop gradient between two concentric circles.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGradient {
    pub center: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub stops: [GradientStop; 2],
}

/// Moon disc for one phase.
///
/// All arcs and gradients are in a local frame: translate by `center`, then rotate by `tilt`.
/// The outer arc covers the lower half circle; the inner arc closes the shape.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum MoonGeometry {
    Full {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Half {
        center: Vec2,
        tilt: f32,
        outer: Arc,
        gradient: LinearGradient,
    },
    Crescent {
        center: Vec2,
        tilt: f32,
        outer: Arc,
        inner: Arc,
        gradient: RadialGradient,
    },
    Gibbous {
        center: Vec2,
        tilt: f32,
        outer: Arc,
        inner: Arc,
        gradient: RadialGradient,
    },
}

impl MoonGeometry {
    /// Disc center in canvas coordinates.
    pub fn center(&self) -> Vec2 {
        match self {
            MoonGeometry::Full { center, .. }
            | MoonGeometry::Half { center, .. }
            | MoonGeometry::Crescent { center, .. }
            | MoonGeometry::Gibbous { center, .. } => *center,
        }
    }

    /// Disc radius.
    pub fn radius(&self) -> f32 {
        match self {
            MoonGeometry::Full { radius, .. } => *radius,
            MoonGeometry::Half { outer, .. }
            | MoonGeometry::Crescent { outer, .. }
            | MoonGeometry::Gibbous { outer, .. } => outer.radius,
        }
    }
}

/// Moon for a canvas `canvas_width` wide, in the top-right corner.
pub fn moon(canvas_width: f32, phase: MoonPhase) -> Result<MoonGeometry> {
    check_canvas(canvas_width, 1.0)?;
    let center = Vec2::new(0.8 * canvas_width, canvas_width / 10.0);
    let radius = canvas_width / 20.0;
    let lit = phase.illumination();
    let tilt = phase.tilt();
    let outer = Arc {
        center: Vec2::ZERO,
        radius,
        start: 0.0,
        end: std::f32::consts::PI,
    };
    let soft = [
        GradientStop {
            offset: 0.0,
            rgba: TERMINATOR_SHADE,
        },
        GradientStop {
            offset: 1.0,
            rgba: TERMINATOR_LIT,
        },
    ];

    if lit >= 1.0 {
        return Ok(MoonGeometry::Full {
            center,
            radius,
            color: crate::scene::palette::LIGHT,
        });
    }
    if lit == 0.5 {
        return Ok(MoonGeometry::Half {
            center,
            tilt,
            outer,
            gradient: LinearGradient {
                from: Vec2::ZERO,
                to: Vec2::new(0.0, radius / 16.0),
                stops: soft,
            },
        });
    }

    let r = radius as f64;
    let crescent = lit < 0.5;
    let m = if crescent { 1.0 - 2.0 * lit } else { 2.0 * lit - 1.0 };
    let n = 1.0 / m;
    let t1 = ((n - m) / (n + m)).asin();
    let inner_radius = (r * (n + m) / 2.0) as f32;

    if crescent {
        let inner_center = Vec2::new(0.0, (r * (m - n) / 2.0) as f32);
        Ok(MoonGeometry::Crescent {
            center,
            tilt,
            outer,
            inner: Arc {
                center: inner_center,
                radius: inner_radius,
                start: t1 as f32,
                end: (PI - t1) as f32,
            },
            gradient: RadialGradient {
                center: inner_center,
                inner_radius,
                outer_radius: inner_radius + radius / 16.0,
                stops: soft,
            },
        })
    } else {
        let inner_center = Vec2::new(0.0, (r * (n - m) / 2.0) as f32);
        let feather = (r * ((n - 1.0) / 2.0).min(1.0 / 16.0)) as f32;
        Ok(MoonGeometry::Gibbous {
            center,
            tilt,
            outer,
            inner: Arc {
                center: inner_center,
                radius: inner_radius,
                start: (PI + t1) as f32,
                end: (2.0 * PI - t1) as f32,
            },
            gradient: RadialGradient {
                center: inner_center,
                inner_radius: inner_radius - feather,
                outer_radius: inner_radius,
                stops: [
                    GradientStop {
                        offset: 0.0,
                        rgba: TERMINATOR_LIT,
                    },
                    GradientStop {
                        offset: 1.0,
                        rgba: TERMINATOR_SHADE,
                    },
                ],
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_new_moon_has_no_light() {
        let phase = MoonPhase::from_unix_millis(NEW_MOON_EPOCH_DAYS * MS_PER_DAY);
        assert!(phase.cycle() < 1e-9);
        assert_eq!(phase.illumination(), 0.0);
    }

    #[test]
    fn half_a_month_later_is_full() {
        let millis = (NEW_MOON_EPOCH_DAYS + SYNODIC_MONTH_DAYS / 2.0) * MS_PER_DAY;
        let phase = MoonPhase::from_unix_millis(millis);
        assert!((phase.cycle() - 0.5).abs() < 1e-9);
        assert_eq!(phase.illumination(), 1.0);
        assert!(matches!(
            moon(1920.0, phase).expect("valid width"),
            MoonGeometry::Full { .. }
        ));
    }

    #[test]
    fn quarter_phase_is_a_half_disc() {
        let geometry = moon(1000.0, MoonPhase::from_cycle(0.25)).expect("valid width");
        match geometry {
            MoonGeometry::Half {
                center,
                tilt,
                outer,
                gradient,
            } => {
                assert_eq!(center, Vec2::new(800.0, 100.0));
                assert_eq!(outer.radius, 50.0);
                assert_eq!(tilt, -std::f32::consts::FRAC_PI_4);
                assert_eq!(gradient.to, Vec2::new(0.0, 50.0 / 16.0));
            }
            other => panic!("expected half moon, got {other:?}"),
        }
    }

    #[test]
    fn waning_moons_tilt_the_other_way() {
        assert_eq!(
            MoonPhase::from_cycle(0.75).tilt(),
            std::f32::consts::FRAC_PI_4
        );
        assert!(matches!(
            moon(1000.0, MoonPhase::from_cycle(0.75)).expect("valid"),
            MoonGeometry::Half { .. }
        ));
    }

    #[test]
    fn crescent_inner_arc_meets_the_outer_rim() {
        let geometry = moon(1000.0, MoonPhase::from_cycle(0.1)).expect("valid");
        let MoonGeometry::Crescent { outer, inner, .. } = geometry else {
            panic!("expected crescent, got {geometry:?}");
        };
        // Both ends of the inner arc lie on the outer circle.
        for angle in [inner.start, inner.end] {
            let p = inner.center + Vec2::new(angle.cos(), angle.sin()) * inner.radius;
            assert!((p.length() - outer.radius).abs() < 1e-2, "{p:?}");
        }
    }

    #[test]
    fn gibbous_inner_arc_meets_the_outer_rim() {
        let geometry = moon(1000.0, MoonPhase::from_cycle(0.4)).expect("valid");
        let MoonGeometry::Gibbous {
            outer,
            inner,
            gradient,
            ..
        } = geometry
        else {
            panic!("expected gibbous, got {geometry:?}");
        };
        for angle in [inner.start, inner.end] {
            let p = inner.center + Vec2::new(angle.cos(), angle.sin()) * inner.radius;
            assert!((p.length() - outer.radius).abs() < 1e-2, "{p:?}");
        }
        assert!(gradient.inner_radius < gradient.outer_radius);
        assert_eq!(gradient.stops[0].rgba, TERMINATOR_LIT);
    }

    #[test]
    fn new_moon_is_a_degenerate_crescent() {
        let geometry = moon(1000.0, MoonPhase::from_cycle(0.0)).expect("valid");
        let MoonGeometry::Crescent { inner, .. } = geometry else {
            panic!("expected crescent, got {geometry:?}");
        };
        assert_eq!(inner.radius, 50.0);
        assert_eq!(inner.center, Vec2::ZERO);
    }

    #[test]
    fn invalid_width_is_rejected() {
        assert!(moon(0.0, MoonPhase::from_cycle(0.3)).is_err());
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn illumination_is_a_fraction(millis in -1e13f64..1e13) {
                let phase = MoonPhase::from_unix_millis(millis);
                prop_assert!((0.0..1.0).contains(&phase.cycle()));
                prop_assert!((0.0..=1.0).contains(&phase.illumination()));
            }

            #[test]
            fn geometry_is_finite(cycle in 0f64..1.0, width in 10f32..4000.0) {
                let geometry = moon(width, MoonPhase::from_cycle(cycle)).expect("valid");
                prop_assert!(geometry.center().is_finite());
                prop_assert!(geometry.radius().is_finite());
                match geometry {
                    MoonGeometry::Crescent { inner, gradient, .. }
                    | MoonGeometry::Gibbous { inner, gradient, .. } => {
                        prop_assert!(inner.center.is_finite());
                        prop_assert!(inner.radius.is_finite() && inner.radius > 0.0);
                        prop_assert!(gradient.inner_radius.is_finite());
                    }
                    _ => {}
                }
            }
        }
    }
}

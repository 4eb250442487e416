//! Palette provider seam.
//!
//! Generators ask a [`Palette`] for a [`ColorSample`] and pass it a uniform roll drawn from
//! their own sampler, so palettes stay deterministic and free of random state.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Linear RGBA in [0, 1].
pub type Rgba = [f32; 4];

/// Background color for dark scenes; also the trunk color of trees.
pub const DARK: Rgba = [0.161, 0.161, 0.161, 1.0];

/// Background color for light scenes; also the moon disc and ground fill.
pub const LIGHT: Rgba = [0.933, 0.933, 0.925, 1.0];

/// A named color. Immutable once picked.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ColorSample {
    pub rgba: Rgba,
    pub label: String,
}

impl ColorSample {
    pub fn new(rgba: Rgba, label: impl Into<String>) -> Self {
        Self {
            rgba,
            label: label.into(),
        }
    }

    /// Copy of this color with a different alpha.
    pub fn with_alpha(&self, alpha: f32) -> Self {
        let [r, g, b, _] = self.rgba;
        Self::new([r, g, b, alpha], self.label.clone())
    }
}

/// What a generator asks the palette for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRequest {
    pub dark_background: bool,
    /// Overrides the palette's alpha when set.
    pub alpha: Option<f32>,
}

/// Color policy. `roll` is uniform in [0, 1).
pub trait Palette: Send + Sync {
    fn pick(&self, request: ColorRequest, roll: f32) -> ColorSample;
}

/// Built-in palette: a table of named colors split by luminance.
///
/// Dark backgrounds draw from the lighter half of the table, light backgrounds from the
/// darker half.
#[derive(Debug, Clone)]
pub struct NamedPalette {
    entries: Vec<ColorSample>,
}

const DEFAULT_ENTRIES: &[(&str, [u8; 3])] = &[
    ("vermilion", [0xe3, 0x42, 0x34]),
    ("indigo", [0x2e, 0x3a, 0x87]),
    ("jade", [0x00, 0xa8, 0x6b]),
    ("ochre", [0xcc, 0x77, 0x22]),
    ("plum", [0x8e, 0x45, 0x85]),
    ("teal", [0x1f, 0x6f, 0x78]),
    ("crimson", [0x9b, 0x1b, 0x30]),
    ("moss", [0x4a, 0x5d, 0x23]),
    ("apricot", [0xfb, 0xce, 0xb1]),
    ("sky", [0x87, 0xce, 0xeb]),
    ("lavender", [0xc8, 0xa2, 0xc8]),
    ("mint", [0x98, 0xe0, 0xb5]),
    ("lemon", [0xf4, 0xe2, 0x7a]),
    ("coral", [0xf8, 0x83, 0x79]),
    ("pearl", [0xea, 0xe0, 0xc8]),
    ("sakura", [0xfe, 0xdf, 0xe1]),
];

impl Default for NamedPalette {
    fn default() -> Self {
        let entries = DEFAULT_ENTRIES
            .iter()
            .map(|(label, [r, g, b])| {
                ColorSample::new(
                    [
                        *r as f32 / 255.0,
                        *g as f32 / 255.0,
                        *b as f32 / 255.0,
                        1.0,
                    ],
                    *label,
                )
            })
            .collect();
        Self::sorted(entries)
    }
}

impl NamedPalette {
    /// Build a palette from custom entries. At least one entry is required.
    pub fn new(entries: Vec<ColorSample>) -> Result<Self> {
        if entries.is_empty() {
            return Err(Error::InvalidConfig(
                "palette requires at least 1 color".into(),
            ));
        }
        Ok(Self::sorted(entries))
    }

    fn sorted(mut entries: Vec<ColorSample>) -> Self {
        entries.sort_by(|a, b| luminance(&a.rgba).total_cmp(&luminance(&b.rgba)));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered from darkest to lightest.
    pub fn entries(&self) -> &[ColorSample] {
        &self.entries
    }
}

impl Palette for NamedPalette {
    fn pick(&self, request: ColorRequest, roll: f32) -> ColorSample {
        let n = self.entries.len();
        let half = n.div_ceil(2);
        let (lo, len) = if request.dark_background {
            (n - half, half)
        } else {
            (0, half)
        };
        let offset = ((roll.clamp(0.0, 1.0) * len as f32) as usize).min(len.saturating_sub(1));
        let base = &self.entries[lo + offset];
        match request.alpha {
            Some(alpha) => base.with_alpha(alpha),
            None => base.clone(),
        }
    }
}

/// Relative luminance (Rec. 709 weights).
pub fn luminance(rgba: &Rgba) -> f32 {
    0.2126 * rgba[0] + 0.7152 * rgba[1] + 0.0722 * rgba[2]
}

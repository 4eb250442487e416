//! Canvas regions kept clear for a title.
//!
//! A [`TitleLayout`] reports the box its text or logo occupies. The builder installs the
//! result as the build's [`TextReservation`] before any generator runs; scatter families then
//! skip every cell that touches it.
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// Fraction of the canvas height inside which a motto is vertically centered.
pub const MOTTO_BAND: f32 = 2.0 / 3.0;

/// Fraction of the canvas height inside which a logo is vertically centered.
pub const LOGO_BAND: f32 = 0.8;

/// Reserved title region, or nothing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextReservation {
    rect: Option<Rect>,
}

impl TextReservation {
    /// No reserved region; nothing is excluded.
    pub const fn empty() -> Self {
        Self { rect: None }
    }

    pub const fn new(rect: Rect) -> Self {
        Self { rect: Some(rect) }
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    /// Whether `cell` touches the reserved region. Always false when empty.
    pub fn blocks(&self, cell: &Rect) -> bool {
        self.rect.is_some_and(|r| r.overlaps(cell))
    }
}

/// Measures the title for a canvas of the given extent.
pub trait TitleLayout {
    fn reserve(&self, extent: Vec2) -> Result<TextReservation>;
}

/// Text motto centered horizontally in the top part of the canvas.
///
/// `text_size` is the measured extent of the laid out text. Vertical mottos are typeset top to
/// bottom, so their box swaps width and height.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MottoLayout {
    pub text_size: Vec2,
    pub vertical: bool,
}

impl MottoLayout {
    pub fn new(text_size: Vec2) -> Self {
        Self {
            text_size,
            vertical: false,
        }
    }

    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }
}

impl TitleLayout for MottoLayout {
    fn reserve(&self, extent: Vec2) -> Result<TextReservation> {
        if !self.text_size.is_finite() || self.text_size.min_element() < 0.0 {
            return Err(Error::TitleUnavailable(format!(
                "motto text size {:?} is not a valid extent",
                self.text_size
            )));
        }
        let size = if self.vertical {
            Vec2::new(self.text_size.y, self.text_size.x)
        } else {
            self.text_size
        };
        Ok(centered(extent, MOTTO_BAND, size))
    }
}

/// Logo image whose size is provided by a loader.
///
/// The loader is called once per build; any error it returns is reported by the builder and the
/// build continues without a reservation.
pub struct LogoLayout<F>
where
    F: Fn() -> Result<Vec2>,
{
    load: F,
}

impl<F> LogoLayout<F>
where
    F: Fn() -> Result<Vec2>,
{
    pub fn new(load: F) -> Self {
        Self { load }
    }
}

impl<F> TitleLayout for LogoLayout<F>
where
    F: Fn() -> Result<Vec2>,
{
    fn reserve(&self, extent: Vec2) -> Result<TextReservation> {
        let size = (self.load)()?;
        if !size.is_finite() || size.min_element() <= 0.0 {
            return Err(Error::TitleUnavailable(format!(
                "logo size {size:?} is not a valid extent"
            )));
        }
        Ok(centered(extent, LOGO_BAND, size))
    }
}

fn centered(extent: Vec2, band: f32, size: Vec2) -> TextReservation {
    TextReservation::new(Rect::new(
        (extent.x - size.x) / 2.0,
        (band * extent.y - size.y) / 2.0,
        size.x,
        size.y,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(1920.0, 1080.0);

    #[test]
    fn empty_reservation_blocks_nothing() {
        let r = TextReservation::empty();
        assert!(r.is_empty());
        assert!(!r.blocks(&Rect::new(0.0, 0.0, 1e6, 1e6)));
    }

    #[test]
    fn motto_is_centered_in_the_upper_band() {
        let r = MottoLayout::new(Vec2::new(400.0, 60.0))
            .reserve(CANVAS)
            .expect("valid motto");
        assert_eq!(r.rect(), Some(Rect::new(760.0, 330.0, 400.0, 60.0)));
    }

    #[test]
    fn vertical_motto_swaps_its_box() {
        let r = MottoLayout::new(Vec2::new(400.0, 60.0))
            .with_vertical(true)
            .reserve(CANVAS)
            .expect("valid motto");
        let rect = r.rect().expect("reserved");
        assert_eq!(rect.size(), Vec2::new(60.0, 400.0));
        assert_eq!(rect.center().x, CANVAS.x / 2.0);
    }

    #[test]
    fn logo_uses_loader_size() {
        let logo = LogoLayout::new(|| Ok(Vec2::new(200.0, 100.0)));
        let rect = logo.reserve(CANVAS).expect("loaded").rect().expect("reserved");
        assert_eq!(rect, Rect::new(860.0, 382.0, 200.0, 100.0));
    }

    #[test]
    fn failing_loader_propagates() {
        let logo = LogoLayout::new(|| Err(Error::TitleUnavailable("missing file".into())));
        assert!(matches!(
            logo.reserve(CANVAS),
            Err(Error::TitleUnavailable(_))
        ));
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert!(MottoLayout::new(Vec2::new(f32::NAN, 1.0))
            .reserve(CANVAS)
            .is_err());
        assert!(LogoLayout::new(|| Ok(Vec2::ZERO)).reserve(CANVAS).is_err());
    }

    #[test]
    fn blocks_touching_cells() {
        let r = TextReservation::new(Rect::new(10.0, 10.0, 10.0, 10.0));
        assert!(r.blocks(&Rect::new(20.0, 0.0, 5.0, 10.0)));
        assert!(!r.blocks(&Rect::new(21.0, 0.0, 5.0, 10.0)));
    }
}

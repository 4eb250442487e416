//! 2D affine helpers.
//!
//! Transforms are plain [`glam::Affine2`] values. [`apply`] folds a list of them over a
//! point left to right, so `apply(p, &[rotate(t), translate(d)])` rotates first and then
//! translates the rotated point.
use glam::{Affine2, Mat2, Vec2};

/// Rotation by `theta` radians about the origin.
#[inline]
pub fn rotate(theta: f32) -> Affine2 {
    Affine2::from_angle(theta)
}

/// Translation by `delta`.
#[inline]
pub fn translate(delta: Vec2) -> Affine2 {
    Affine2::from_translation(delta)
}

/// Linear map keeping the x axis and sending the y axis to `(cos_scale, sin_scale)`.
///
/// Used to foreshorten a flat shape as if it were tilted away from the viewer.
#[inline]
pub fn shear_squash(cos_scale: f32, sin_scale: f32) -> Affine2 {
    Affine2::from_mat2(Mat2::from_cols(Vec2::X, Vec2::new(cos_scale, sin_scale)))
}

/// Apply `transforms` to `point` in order.
pub fn apply(point: Vec2, transforms: &[Affine2]) -> Vec2 {
    transforms
        .iter()
        .fold(point, |p, m| m.transform_point2(p))
}

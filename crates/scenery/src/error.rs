//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid configuration, non-positive canvases, inputs too small to build geometry from,
//! title collaborators that could not reserve space, and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid canvas {width}x{height}: both dimensions must be finite and > 0")]
    InvalidCanvas { width: f32, height: f32 },

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("title unavailable: {0}")]
    TitleUnavailable(String),

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

/// Rejects canvases whose extent is not finite and strictly positive.
pub(crate) fn check_canvas(width: f32, height: f32) -> Result<()> {
    if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
        return Err(Error::InvalidCanvas { width, height });
    }
    Ok(())
}

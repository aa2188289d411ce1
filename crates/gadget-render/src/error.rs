//! Error types for the render crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during graphics operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Invalid surface dimensions (zero, negative or non-finite).
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },

    /// The requested surface exceeds the factory's size limit.
    #[error("surface {width}x{height} exceeds the limit of {limit} pixels per side")]
    SurfaceTooLarge { width: u32, height: u32, limit: u32 },

    /// The pixel buffer for the requested surface exceeds the byte budget.
    #[error("surface {width}x{height} exceeds the budget of {budget} bytes")]
    SurfaceOverBudget { width: f64, height: f64, budget: u64 },

    /// An image file could not be read.
    #[error("failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image bytes could not be decoded.
    #[error("failed to decode image {name:?}: {source}")]
    ImageDecode {
        name: String,
        #[source]
        source: image::ImageError,
    },

    /// No image is registered under the given name.
    #[error("image not found: {0:?}")]
    ImageNotFound(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

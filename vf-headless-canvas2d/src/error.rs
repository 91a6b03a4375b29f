//! Error types for vf-headless-canvas2d.

use thiserror::Error;

/// Result type alias using Canvas2dError.
pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

/// Errors that can occur in Canvas 2D operations.
#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// Invalid canvas dimensions (must be positive and within limits).
    #[error("Invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Zoom factor must be finite and positive.
    #[error("Invalid zoom factor: {0}")]
    InvalidZoom(f64),

    /// Failed to parse CSS font string.
    #[error("Failed to parse font string: {0}")]
    FontParseError(String),

    /// Failed to parse color value.
    #[error("Failed to parse color: {0}")]
    ColorParseError(String),

    /// A drawing call arrived in a state the context does not allow.
    #[error("Assertion failed: {0}")]
    InvariantViolation(String),

    /// `getContext` was asked for something other than "2d".
    #[error("Unsupported context type: {0}")]
    UnsupportedContext(String),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngError(String),

    /// Failure writing the rendered surface to disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<png::EncodingError> for Canvas2dError {
    fn from(err: png::EncodingError) -> Self {
        Canvas2dError::PngError(err.to_string())
    }
}

//! Error types for the host environment.

use thiserror::Error;
use vf_headless_canvas2d::Canvas2dError;

pub type HostResult<T> = Result<T, HostError>;

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Canvas(#[from] Canvas2dError),

    #[error("Cannot create element '{0}', not supported")]
    UnsupportedElement(String),

    /// `getElementById` was called in a deployment that has no pre-built canvas.
    #[error("getElementById('{0}') is not available in this host")]
    ElementLookupUnavailable(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("structuredClone failed: {0}")]
    CloneFailed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

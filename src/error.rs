use std::path::PathBuf;

use thiserror::Error;

/// Every failure the loader, the spline builder and the sensitivity analysis can report.
#[derive(Debug, Error)]
pub enum SplineError {
    #[error("source not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("shape mismatch: x has {x_len} elements, y has {y_len}")]
    ShapeMismatch { x_len: usize, y_len: usize },

    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("x = {x} is out of range [{min}, {max}]")]
    OutOfRange { x: f64, min: f64, max: f64 },
}

impl SplineError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SplineError::InvalidInput(message.into())
    }

    pub(crate) fn degenerate(message: impl Into<String>) -> Self {
        SplineError::DegenerateInput(message.into())
    }
}

//! Reconstruction anomaly error types.

use thiserror::Error;

/// Reconstruction anomaly detection errors.
#[derive(Debug, Error)]
pub enum ReconError {
    #[error("Insufficient data: required {required}, got {got}")]
    InsufficientData { required: usize, got: usize },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Shapes are `(sectors, steps)` for windows and `(samples, sectors)` for matrices.
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("Sector mismatch: expected {expected:?}, got {got:?}")]
    SectorMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },

    #[error("Invalid date: {0}")]
    DateParse(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReconError {
    /// Shorthand for [`ReconError::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for reconstruction anomaly operations.
pub type Result<T> = std::result::Result<T, ReconError>;

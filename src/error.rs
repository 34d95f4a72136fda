use thiserror::Error;

/// Result type for Sisyphus operations
pub type Result<T> = std::result::Result<T, SisyphusError>;

/// Main error type for the Sisyphus library
#[derive(Debug, Error)]
pub enum SisyphusError {
    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Action outside of the environment's action space
    #[error("Invalid action {action}: must be less than {max_actions}")]
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Empty buffer or container
    #[error("Empty buffer: {0}")]
    EmptyBuffer(String),

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse/serialize errors
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl SisyphusError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        SisyphusError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        SisyphusError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

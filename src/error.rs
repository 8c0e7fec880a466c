use std::fmt;

/// Result type for convnet operations
pub type Result<T> = std::result::Result<T, CnnError>;

/// Main error type for the convnet library
#[derive(Debug, Clone, PartialEq)]
pub enum CnnError {
    /// A layer operation received an argument of the wrong size
    DimensionMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A layer operation received a non-square matrix
    NotSquare {
        op: &'static str,
        rows: usize,
        cols: usize,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },
}

impl fmt::Display for CnnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CnnError::DimensionMismatch { op, expected, actual } => {
                write!(
                    f,
                    "Cannot perform {} due to dimension mismatch: expected {}, actual is {}",
                    op, expected, actual
                )
            }
            CnnError::NotSquare { op, rows, cols } => {
                write!(
                    f,
                    "Cannot perform {} due to matrix not being square: {} rows, {} columns",
                    op, rows, cols
                )
            }
            CnnError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for CnnError {}

// Helper functions for common error patterns
impl CnnError {
    pub fn dimension_mismatch(op: &'static str, expected: usize, actual: usize) -> Self {
        CnnError::DimensionMismatch { op, expected, actual }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        CnnError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

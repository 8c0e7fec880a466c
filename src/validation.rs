//! Shared argument checks for layer and network operations.
//!
//! Every check returns `Err` carrying the operation name plus the offending
//! sizes or value, so a failure deep in a pipeline still names the operation
//! that rejected it.

use ndarray::ArrayView2;

use crate::error::{CnnError, Result};

/// Minimum valid learning rate (inclusive).
pub const LEARNING_RATE_MIN: f32 = 1e-10;

/// Maximum valid learning rate (inclusive).
pub const LEARNING_RATE_MAX: f32 = 1.0;

/// Require `actual == expected`, failing with the operation name otherwise.
pub fn match_dimensions(op: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(CnnError::dimension_mismatch(op, expected, actual))
    }
}

/// Require a square matrix.
pub fn require_square(op: &'static str, matrix: &ArrayView2<f32>) -> Result<()> {
    let (rows, cols) = matrix.dim();
    if rows == cols {
        Ok(())
    } else {
        Err(CnnError::NotSquare { op, rows, cols })
    }
}

/// Require a learning rate in `[LEARNING_RATE_MIN, LEARNING_RATE_MAX]`.
pub fn check_learning_rate(op: &'static str, learning_rate: f32) -> Result<()> {
    if (LEARNING_RATE_MIN..=LEARNING_RATE_MAX).contains(&learning_rate) {
        Ok(())
    } else {
        Err(CnnError::InvalidParameter {
            name: "learning_rate".to_string(),
            reason: format!(
                "cannot perform {}: {} is outside the valid range [{:e}, {}]",
                op, learning_rate, LEARNING_RATE_MIN, LEARNING_RATE_MAX
            ),
        })
    }
}

/// Require a nonzero epoch count.
pub fn check_epoch_count(op: &'static str, epoch_count: usize) -> Result<()> {
    if epoch_count > 0 {
        Ok(())
    } else {
        Err(CnnError::InvalidParameter {
            name: "epoch_count".to_string(),
            reason: format!("cannot perform {}: the value must be greater than 0", op),
        })
    }
}

/// Require a nonzero training-set count.
pub fn check_train_set_count(op: &'static str, set_count: usize) -> Result<()> {
    if set_count > 0 {
        Ok(())
    } else {
        Err(CnnError::InvalidParameter {
            name: "set_count".to_string(),
            reason: format!("cannot perform {}: the training set is empty", op),
        })
    }
}

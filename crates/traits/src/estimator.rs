//! Estimation errors.

use statrisk_math::MathError;
use statrisk_primitives::FrameError;

use crate::ConfigError;

/// Errors that can occur during estimation.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    /// Dimension mismatch in input data.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
        /// Context description.
        context: String,
    },

    /// Insufficient data for estimation.
    #[error("insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations.
        required: usize,
        /// Actual number of observations.
        actual: usize,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Numeric kernel error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Labeled table error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),
}

impl EstimatorError {
    /// Returns whether this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimator_error_is_recoverable() {
        let err = EstimatorError::InsufficientData { required: 10, actual: 5 };
        assert!(err.is_recoverable());

        let err = EstimatorError::Frame(FrameError::MissingColumn("test".to_string()));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn estimator_error_display() {
        let err = EstimatorError::DimensionMismatch {
            expected: 100,
            actual: 50,
            context: "weights".to_string(),
        };
        assert_eq!(err.to_string(), "dimension mismatch for weights: expected 100, got 50");
    }

    #[test]
    fn estimator_error_from_math() {
        let err: EstimatorError = MathError::InvalidHalfLife(0.0).into();
        assert!(matches!(err, EstimatorError::Math(_)));
    }
}

//! Error types for factor risk models.

use statrisk_math::MathError;
use statrisk_primitives::FrameError;
use statrisk_traits::{ConfigError, EstimatorError};
use statrisk_utils::UtilsError;

/// Errors that can occur while fitting or using a factor risk model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Estimator error.
    #[error("estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    /// Math error.
    #[error("math error: {0}")]
    Math(#[from] MathError),

    /// Labeled table error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Persistence error.
    #[error("persistence error: {0}")]
    Utils(#[from] UtilsError),

    /// File system error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dimension mismatch.
    #[error("dimension mismatch for {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Context description.
        context: &'static str,
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Model components do not line up.
    #[error("misaligned model: {0}")]
    Misaligned(String),

    /// Component count cannot be resolved.
    #[error("invalid number of components: {0}")]
    InvalidComponents(String),

    /// Volatility labels do not match the correlation matrix.
    #[error(
        "volatility does not align with correlation: \
         {volatility} volatility labels, {correlation} instruments"
    )]
    MisalignedVolatility {
        /// Number of volatility labels.
        volatility: usize,
        /// Number of correlation instruments.
        correlation: usize,
    },
}

impl ModelError {
    /// Returns whether this error is recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Estimator(err) if err.is_recoverable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::MisalignedVolatility { volatility: 2, correlation: 3 };
        assert!(err.to_string().contains("2 volatility labels"));

        let err = ModelError::DimensionMismatch { context: "weights", expected: 4, actual: 3 };
        assert_eq!(err.to_string(), "dimension mismatch for weights: expected 4, got 3");
    }

    #[test]
    fn error_is_recoverable() {
        let err: ModelError = EstimatorError::InsufficientData { required: 2, actual: 1 }.into();
        assert!(err.is_recoverable());

        let err = ModelError::InvalidComponents("zero".to_string());
        assert!(!err.is_recoverable());
    }
}

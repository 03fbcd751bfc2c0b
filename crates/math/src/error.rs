//! Error types for mathematical operations.

/// Errors that can occur during mathematical operations.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// Not enough observations for the requested degrees of freedom.
    #[error("insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData {
        /// Minimum number of rows.
        required: usize,
        /// Actual number of rows.
        actual: usize,
    },

    /// Invalid half-life.
    #[error("invalid half-life: {0} (must be finite and positive)")]
    InvalidHalfLife(f64),

    /// Linear algebra error.
    #[error("linear algebra error: {0}")]
    LinearAlgebra(String),

    /// Numerical instability (NaN or Inf).
    #[error("numerical instability: {0}")]
    NumericalInstability(String),
}

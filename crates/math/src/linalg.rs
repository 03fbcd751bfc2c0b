//! Closed-form weighted least squares.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::{LinalgBackend, MathError};

/// Result of a (weighted) least squares fit of `y ≈ X · beta + alpha`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    /// Coefficients (`n × k` for an `m × n` design and `m × k` response).
    pub beta: Array2<f64>,
    /// Residuals `y − X · beta` (`m × k`).
    pub alpha: Array2<f64>,
}

/// Perform weighted least squares regression.
///
/// Solves `beta = pinv(Xᵀ W X) · Xᵀ W y` with `W = diag(weights)`, and
/// returns the residuals `alpha = y − X · beta`. Weights default to ones.
///
/// The pseudo-inverse makes rank-deficient designs a supported input: the
/// minimum-norm solution is returned.
///
/// # Arguments
/// * `x` - Design matrix (m x n)
/// * `y` - Responses (m x k), one regression per column
/// * `weights` - Observation weights (m,)
/// * `backend` - Linear algebra backend
///
/// # Errors
/// Returns `MathError::DimensionMismatch` if `x`, `y` and `weights` disagree
/// on the number of observations.
pub fn weighted_least_squares<B: LinalgBackend + ?Sized>(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    backend: &B,
) -> Result<RegressionResult, MathError> {
    let m = x.nrows();
    if y.nrows() != m {
        return Err(MathError::DimensionMismatch { expected: m, actual: y.nrows() });
    }

    let weights = match weights {
        Some(w) if w.len() != m => {
            return Err(MathError::DimensionMismatch { expected: m, actual: w.len() });
        }
        Some(w) => w.to_owned(),
        None => Array1::ones(m),
    };

    // Xᵀ W, weights broadcast along the observation axis
    let xtw = &x.t() * &weights;
    let gram = xtw.dot(&x);
    let beta = backend.pinv(gram.view())?.dot(&xtw.dot(&y));
    let alpha = &y - &x.dot(&beta);

    Ok(RegressionResult { beta, alpha })
}

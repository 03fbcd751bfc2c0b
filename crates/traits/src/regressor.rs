//! Regression contract.

use ndarray::{ArrayView1, ArrayView2};
use statrisk_math::RegressionResult;

use crate::EstimatorError;

/// A multi-response linear regression `y ≈ X · beta + alpha`.
///
/// `x` is `m × n`, `y` is `m × k` and the optional `weights` have length `m`.
/// The result holds `beta` (`n × k`) and residuals `alpha` (`m × k`).
pub trait Regressor: Send + Sync {
    /// Fit the regression.
    ///
    /// # Errors
    /// Returns `EstimatorError` if the inputs disagree on the number of
    /// observations or the solve fails.
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<RegressionResult, EstimatorError>;
}

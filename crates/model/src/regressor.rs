//! Closed-form least squares regressors.

use ndarray::{ArrayView1, ArrayView2};
use statrisk_math::{
    LinalgBackend, MathError, NalgebraBackend, RegressionResult, half_life_weights,
    weighted_least_squares,
};
use statrisk_traits::{EstimatorError, Regressor};

/// Weighted least squares.
///
/// `beta = pinv(Xᵀ W X) · Xᵀ W y`, `alpha = y − X · beta`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wls<B = NalgebraBackend> {
    backend: B,
}

impl Wls {
    /// Create a regressor on the default backend.
    #[must_use]
    pub const fn new() -> Self {
        Self { backend: NalgebraBackend }
    }
}

impl<B: LinalgBackend> Wls<B> {
    /// Create a regressor on a specific backend.
    #[must_use]
    pub const fn with_backend(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: LinalgBackend> Regressor for Wls<B> {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<RegressionResult, EstimatorError> {
        check_observations(x, y, weights)?;
        Ok(weighted_least_squares(x, y, weights, &self.backend)?)
    }
}

/// Exponentially weighted least squares.
///
/// Observation `t` of `m` gets weight `2^(-(m - 1 - t) / half_life)`, so the
/// last row counts most. Weights are normalized to sum to 1 before solving.
/// Caller-supplied weights are multiplied into the decay weights.
#[derive(Debug, Clone, Copy)]
pub struct Ewls<B = NalgebraBackend> {
    half_life: f64,
    backend: B,
}

impl Ewls {
    /// Create a regressor on the default backend.
    ///
    /// # Errors
    /// Returns `EstimatorError::Math` if `half_life` is not finite and positive.
    pub fn new(half_life: f64) -> Result<Self, EstimatorError> {
        Self::with_backend(half_life, NalgebraBackend)
    }
}

impl<B: LinalgBackend> Ewls<B> {
    /// Create a regressor on a specific backend.
    ///
    /// # Errors
    /// Returns `EstimatorError::Math` if `half_life` is not finite and positive.
    pub fn with_backend(half_life: f64, backend: B) -> Result<Self, EstimatorError> {
        if !(half_life.is_finite() && half_life > 0.0) {
            return Err(MathError::InvalidHalfLife(half_life).into());
        }
        Ok(Self { half_life, backend })
    }

    /// Half-life in observations.
    #[must_use]
    pub const fn half_life(&self) -> f64 {
        self.half_life
    }
}

impl<B: LinalgBackend> Regressor for Ewls<B> {
    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<RegressionResult, EstimatorError> {
        check_observations(x, y, weights)?;

        let mut decay = half_life_weights(x.nrows(), self.half_life)?;
        if let Some(weights) = weights {
            decay *= &weights;
        }
        let total = decay.sum();
        if total > 0.0 {
            decay /= total;
        }

        Ok(weighted_least_squares(x, y, Some(decay.view()), &self.backend)?)
    }
}

fn check_observations(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
) -> Result<(), EstimatorError> {
    let m = x.nrows();
    if y.nrows() != m {
        return Err(EstimatorError::DimensionMismatch {
            expected: m,
            actual: y.nrows(),
            context: "responses".to_string(),
        });
    }
    if let Some(w) = weights
        && w.len() != m
    {
        return Err(EstimatorError::DimensionMismatch {
            expected: m,
            actual: w.len(),
            context: "weights".to_string(),
        });
    }
    Ok(())
}

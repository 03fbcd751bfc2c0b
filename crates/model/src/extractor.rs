//! Statistical factor extraction.

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use statrisk_math::weighted_covariance;
use statrisk_primitives::{LabelFrame, TimeFrame};
use statrisk_traits::EstimatorError;
use tracing::debug;

use crate::{FactorRiskModel, FactorRiskModelConfig, ModelError};

/// Values below this magnitude count as "no return".
pub const ZERO_RETURN: f64 = 1e-20;

/// Raw output of a factor extraction on an unlabeled `T × N` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Factor exposures (n × N).
    pub exposures: Array2<f64>,
    /// Factor returns (T × n).
    pub factor_returns: Array2<f64>,
    /// Residual returns (T × N).
    pub residuals: Array2<f64>,
}

/// Extracts latent factors from a return matrix.
pub trait FactorExtractor: Send + Sync {
    /// Configuration of the produced models.
    fn model_config(&self) -> FactorRiskModelConfig;

    /// Decompose a `T × N` return matrix. Optional weights are per instrument.
    ///
    /// # Errors
    /// Returns `ModelError` if the input is degenerate or the configuration
    /// cannot be satisfied.
    fn decompose(
        &self,
        returns: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<Decomposition, ModelError>;

    /// Fit a labeled factor risk model.
    ///
    /// Factors are named `factor_1..factor_n`. The factor covariance is the
    /// equally weighted sample covariance (`ddof = 1`) of the factor returns.
    ///
    /// # Errors
    /// Returns `ModelError` if decomposition fails or there are fewer than two
    /// periods.
    fn fit(
        &self,
        returns: &TimeFrame,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<FactorRiskModel, ModelError> {
        let decomposition = self.decompose(returns.values().view(), weights)?;
        let factors = factor_names(decomposition.factor_returns.ncols());
        debug!(
            periods = returns.nrows(),
            instruments = returns.ncols(),
            factors = factors.len(),
            "fitted factor model"
        );

        let factor_cov = weighted_covariance(decomposition.factor_returns.view(), None, 1)?;
        let exposures =
            LabelFrame::new(factors.clone(), returns.columns().to_vec(), decomposition.exposures)?;
        let factor_returns = TimeFrame::new(
            returns.index().to_vec(),
            factors.clone(),
            decomposition.factor_returns,
        )?;
        let residuals = returns.with_values(decomposition.residuals)?;
        let factor_cov = LabelFrame::new(factors.clone(), factors, factor_cov)?;

        FactorRiskModel::new(self.model_config(), exposures, factor_returns, residuals)?
            .with_factor_covariances(factor_cov)
    }
}

/// Factor labels `factor_1..factor_n`.
#[must_use]
pub fn factor_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("factor_{i}")).collect()
}

/// Subtract each column's mean over the full history.
pub(crate) fn demean(returns: ArrayView2<'_, f64>) -> Result<Array2<f64>, ModelError> {
    let mean = returns
        .mean_axis(Axis(0))
        .ok_or(EstimatorError::InsufficientData { required: 1, actual: 0 })?;
    Ok(&returns - &mean)
}

/// Positions of columns with at least one return of non-negligible magnitude.
pub(crate) fn active_columns(returns: ArrayView2<'_, f64>) -> Vec<usize> {
    returns
        .columns()
        .into_iter()
        .enumerate()
        .filter(|(_, col)| col.iter().any(|x| x.abs() >= ZERO_RETURN))
        .map(|(j, _)| j)
        .collect()
}

/// Scatter the columns of `values` back to positions `keep` of a zero matrix
/// with `ncols` columns.
pub(crate) fn expand_columns(values: &Array2<f64>, keep: &[usize], ncols: usize) -> Array2<f64> {
    let mut out = Array2::zeros((values.nrows(), ncols));
    for (src, &dst) in keep.iter().enumerate() {
        out.column_mut(dst).assign(&values.column(src));
    }
    out
}

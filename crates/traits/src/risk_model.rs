//! Risk model contract.

use ndarray::Array2;
use statrisk_primitives::{FrameError, LabelFrame, Series};

/// A model that can produce an instrument-level covariance matrix.
///
/// Only [`cov`](RiskModel::cov) is required. Correlation and volatility are
/// derived from it, each calling `cov` exactly once.
pub trait RiskModel {
    /// Parameters accepted by the covariance computation.
    type Params: Default;

    /// Error returned by the model.
    type Error: From<FrameError>;

    /// Instrument covariance matrix (N x N), labeled by instrument on both axes.
    ///
    /// # Errors
    /// Returns the model's error type if the covariance cannot be computed.
    fn cov(&self, params: &Self::Params) -> Result<LabelFrame, Self::Error>;

    /// Instrument correlation matrix, `cov / (vol ⊗ vol)`.
    ///
    /// # Errors
    /// Returns the model's error type if the covariance cannot be computed.
    fn corr(&self, params: &Self::Params) -> Result<LabelFrame, Self::Error> {
        let cov = self.cov(params)?;
        Ok(corr_from_cov(&cov)?)
    }

    /// Instrument volatilities, the square root of the covariance diagonal.
    ///
    /// # Errors
    /// Returns the model's error type if the covariance cannot be computed.
    fn vol(&self, params: &Self::Params) -> Result<Series, Self::Error> {
        let cov = self.cov(params)?;
        Ok(vol_from_cov(&cov)?)
    }
}

/// Square root of the diagonal of a covariance matrix, keyed by column label.
///
/// # Errors
/// Returns `FrameError::ShapeMismatch` if the matrix is not square.
pub fn vol_from_cov(cov: &LabelFrame) -> Result<Series, FrameError> {
    check_square(cov)?;
    Series::new(cov.columns().to_vec(), cov.values().diag().mapv(f64::sqrt))
}

/// Normalize a covariance matrix to a correlation matrix.
///
/// Instruments with zero variance produce NaN rows and columns.
///
/// # Errors
/// Returns `FrameError::ShapeMismatch` if the matrix is not square.
pub fn corr_from_cov(cov: &LabelFrame) -> Result<LabelFrame, FrameError> {
    check_square(cov)?;
    let vol = cov.values().diag().mapv(f64::sqrt);
    let n = vol.len();
    let corr = Array2::from_shape_fn((n, n), |(i, j)| cov.values()[[i, j]] / (vol[i] * vol[j]));
    cov.with_values(corr)
}

fn check_square(cov: &LabelFrame) -> Result<(), FrameError> {
    if cov.nrows() != cov.ncols() {
        return Err(FrameError::ShapeMismatch {
            axis: "index",
            expected: cov.ncols(),
            actual: cov.nrows(),
        });
    }
    Ok(())
}

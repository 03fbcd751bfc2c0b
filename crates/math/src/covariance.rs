//! Weighted second moments.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

use crate::MathError;

/// Weighted sample covariance of the columns of `x` (T x k).
///
/// Computes `Σ_t w_t (x_t − x̄)(x_t − x̄)ᵀ / (T − ddof)` where `x̄` is the
/// w-weighted column mean. Weights default to ones, which gives the usual
/// sample covariance.
///
/// # Errors
/// Returns `MathError` if `T <= ddof`, the weight length differs from `T`, or
/// the weights sum to zero.
pub fn weighted_covariance(
    x: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    ddof: usize,
) -> Result<Array2<f64>, MathError> {
    let (centered, weights, denom) = center(x, weights, ddof)?;
    let scaled = &centered * &weights.insert_axis(Axis(1));
    Ok(scaled.t().dot(&centered) / denom)
}

/// Weighted sample variance of each column of `x` (T x k).
///
/// The diagonal of [`weighted_covariance`], without forming the full matrix.
///
/// # Errors
/// Same conditions as [`weighted_covariance`].
pub fn weighted_variance(
    x: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    ddof: usize,
) -> Result<Array1<f64>, MathError> {
    let (centered, weights, denom) = center(x, weights, ddof)?;
    Ok(centered.mapv(|e| e * e).t().dot(&weights) / denom)
}

fn center(
    x: ArrayView2<'_, f64>,
    weights: Option<ArrayView1<'_, f64>>,
    ddof: usize,
) -> Result<(Array2<f64>, Array1<f64>, f64), MathError> {
    let t = x.nrows();
    if t <= ddof {
        return Err(MathError::InsufficientData { required: ddof + 1, actual: t });
    }

    let weights = match weights {
        Some(w) if w.len() != t => {
            return Err(MathError::DimensionMismatch { expected: t, actual: w.len() });
        }
        Some(w) => w.to_owned(),
        None => Array1::ones(t),
    };
    let total = weights.sum();
    if total <= 0.0 {
        return Err(MathError::NumericalInstability("weights sum to zero".into()));
    }

    let mean = x.t().dot(&weights) / total;
    let centered = &x - &mean;
    Ok((centered, weights, (t - ddof) as f64))
}

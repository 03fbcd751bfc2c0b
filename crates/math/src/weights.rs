//! Weight generation functions.

use ndarray::Array1;

use crate::MathError;

/// Generate half-life decay weights over `n` periods.
///
/// Weight `t` is `2^(-(n - 1 - t) / half_life)`, so the array runs oldest
/// first and the most recent period has weight 1.
///
/// # Errors
/// Returns `MathError::InvalidHalfLife` if `half_life` is not finite and
/// positive.
pub fn half_life_weights(n: usize, half_life: f64) -> Result<Array1<f64>, MathError> {
    if !(half_life.is_finite() && half_life > 0.0) {
        return Err(MathError::InvalidHalfLife(half_life));
    }

    let last = n.saturating_sub(1) as f64;
    Ok(Array1::from_shape_fn(n, |t| (-(last - t as f64) / half_life).exp2()))
}

/// Generate half-life decay weights normalized to sum to 1.
///
/// # Errors
/// Returns `MathError::InvalidHalfLife` if `half_life` is not finite and
/// positive.
pub fn normalized_half_life_weights(n: usize, half_life: f64) -> Result<Array1<f64>, MathError> {
    let mut weights = half_life_weights(n, half_life)?;
    let total = weights.sum();
    if total > 0.0 {
        weights /= total;
    }
    Ok(weights)
}

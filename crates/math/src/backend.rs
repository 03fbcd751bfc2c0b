//! Linear algebra backends.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::MathError;

/// Thin singular value decomposition `A = U · diag(s) · Vt`.
///
/// For an `m × n` input, `u` is `m × r`, `s` has length `r` and `vt` is
/// `r × n`, with `r = min(m, n)`. Singular values are sorted descending.
#[derive(Debug, Clone)]
pub struct ThinSvd {
    /// Left singular vectors (columns).
    pub u: Array2<f64>,
    /// Singular values, descending.
    pub s: Array1<f64>,
    /// Right singular vectors (rows).
    pub vt: Array2<f64>,
}

impl ThinSvd {
    /// Make the largest-magnitude entry of every left singular vector positive.
    ///
    /// The matching row of `vt` is flipped alongside, so the product is
    /// unchanged. This pins down the sign ambiguity of the decomposition.
    pub fn flip_signs(&mut self) {
        for (mut u_col, mut vt_row) in
            self.u.axis_iter_mut(Axis(1)).zip(self.vt.axis_iter_mut(Axis(0)))
        {
            let pivot = u_col
                .iter()
                .copied()
                .fold(0.0_f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
            if pivot < 0.0 {
                u_col.mapv_inplace(|x| -x);
                vt_row.mapv_inplace(|x| -x);
            }
        }
    }

    /// Number of singular triplets.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.s.len()
    }
}

/// Dense linear algebra used by the estimators.
///
/// Implementations are injected explicitly so callers can swap the numeric
/// engine without touching model code.
pub trait LinalgBackend: Send + Sync {
    /// Backend name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Thin SVD with singular values sorted descending.
    ///
    /// # Errors
    /// Returns `MathError` if the input is not finite or the decomposition
    /// fails.
    fn thin_svd(&self, a: ArrayView2<'_, f64>) -> Result<ThinSvd, MathError>;

    /// Moore-Penrose pseudo-inverse.
    ///
    /// Singular values below `1e-15 · max(σ)` are treated as zero.
    ///
    /// # Errors
    /// Returns `MathError` if the underlying SVD fails.
    fn pinv(&self, a: ArrayView2<'_, f64>) -> Result<Array2<f64>, MathError> {
        let svd = self.thin_svd(a)?;
        let cutoff = PINV_RCOND * svd.s.iter().copied().fold(0.0, f64::max);
        let inv_s = svd.s.mapv(|s| if s > cutoff { 1.0 / s } else { 0.0 });

        // V · diag(1/s) · Uᵀ
        let v_scaled = &svd.vt.t() * &inv_s;
        Ok(v_scaled.dot(&svd.u.t()))
    }
}

const PINV_RCOND: f64 = 1e-15;

/// Backend built on `nalgebra`'s dense decompositions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraBackend;

impl LinalgBackend for NalgebraBackend {
    fn name(&self) -> &'static str {
        "nalgebra"
    }

    fn thin_svd(&self, a: ArrayView2<'_, f64>) -> Result<ThinSvd, MathError> {
        let (m, n) = a.dim();
        let r = m.min(n);
        if r == 0 {
            return Ok(ThinSvd {
                u: Array2::zeros((m, 0)),
                s: Array1::zeros(0),
                vt: Array2::zeros((0, n)),
            });
        }
        if a.iter().any(|x| !x.is_finite()) {
            return Err(MathError::NumericalInstability("non-finite value in SVD input".into()));
        }

        let matrix = DMatrix::from_fn(m, n, |i, j| a[[i, j]]);
        let svd = matrix.svd(true, true);
        let u = svd.u.ok_or_else(|| MathError::LinearAlgebra("SVD did not return U".into()))?;
        let vt =
            svd.v_t.ok_or_else(|| MathError::LinearAlgebra("SVD did not return Vt".into()))?;

        let mut order: Vec<usize> = (0..r).collect();
        order.sort_by(|&i, &j| svd.singular_values[j].total_cmp(&svd.singular_values[i]));

        Ok(ThinSvd {
            u: Array2::from_shape_fn((m, r), |(i, k)| u[(i, order[k])]),
            s: Array1::from_shape_fn(r, |k| svd.singular_values[order[k]]),
            vt: Array2::from_shape_fn((r, n), |(k, j)| vt[(order[k], j)]),
        })
    }
}

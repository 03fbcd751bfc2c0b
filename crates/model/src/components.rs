//! Choosing the number of principal components.

use std::f64::consts::{LN_2, PI};

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::function::gamma::ln_gamma;

use crate::ModelError;

/// How many principal components to keep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NComponents {
    /// A fixed number of components.
    Count(usize),
    /// The fewest components whose cumulative explained-variance ratio
    /// exceeds the fraction, which must lie in (0, 1).
    Fraction(f64),
    /// Minka's maximum-likelihood estimate of the dimensionality.
    Mle,
}

impl Default for NComponents {
    fn default() -> Self {
        Self::Count(1)
    }
}

impl NComponents {
    /// Check the selection independently of the data.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidComponents` for a zero count or a fraction
    /// outside (0, 1).
    pub fn validate(&self) -> Result<(), ModelError> {
        match *self {
            Self::Count(0) => {
                Err(ModelError::InvalidComponents("count must be at least 1".to_string()))
            }
            Self::Fraction(f) if !(f > 0.0 && f < 1.0) => Err(ModelError::InvalidComponents(
                format!("fraction {f} must lie strictly between 0 and 1"),
            )),
            _ => Ok(()),
        }
    }

    /// Resolve to a concrete count given the singular values of a centered
    /// `n_samples × n_features` matrix (descending).
    ///
    /// # Errors
    /// Returns `ModelError::InvalidComponents` when the selection cannot be
    /// satisfied by the data.
    pub fn resolve(
        &self,
        singular_values: &Array1<f64>,
        n_samples: usize,
        n_features: usize,
    ) -> Result<usize, ModelError> {
        self.validate()?;
        let rank = singular_values.len();

        let k = match *self {
            Self::Count(k) => {
                if k > rank {
                    return Err(ModelError::InvalidComponents(format!(
                        "{k} components requested but at most {rank} available"
                    )));
                }
                k
            }
            Self::Fraction(f) => {
                let ratios = explained_variance_ratio(singular_values, n_samples)?;
                let mut cumulative = 0.0;
                let below = ratios
                    .iter()
                    .take_while(|&&r| {
                        cumulative += r;
                        cumulative <= f
                    })
                    .count();
                (below + 1).min(rank)
            }
            Self::Mle => {
                if n_samples < n_features {
                    return Err(ModelError::InvalidComponents(format!(
                        "mle needs at least as many samples as features, \
                         got {n_samples} < {n_features}"
                    )));
                }
                let spectrum = explained_variance(singular_values, n_samples)?;
                infer_dimension(spectrum.as_slice().unwrap_or(&[]), n_samples)
            }
        };

        if k == 0 {
            return Err(ModelError::InvalidComponents("no component selected".to_string()));
        }
        Ok(k)
    }
}

fn explained_variance(
    singular_values: &Array1<f64>,
    n_samples: usize,
) -> Result<Array1<f64>, ModelError> {
    if n_samples < 2 {
        return Err(ModelError::InvalidComponents(
            "explained variance needs at least 2 samples".to_string(),
        ));
    }
    Ok(singular_values.mapv(|s| s * s / (n_samples - 1) as f64))
}

fn explained_variance_ratio(
    singular_values: &Array1<f64>,
    n_samples: usize,
) -> Result<Array1<f64>, ModelError> {
    let variance = explained_variance(singular_values, n_samples)?;
    let total = variance.sum();
    if total <= 0.0 {
        return Err(ModelError::InvalidComponents("data has no variance".to_string()));
    }
    Ok(variance / total)
}

/// Rank maximizing the Laplace-approximated evidence; 0 is never chosen.
fn infer_dimension(spectrum: &[f64], n_samples: usize) -> usize {
    let mut best = 0;
    let mut best_ll = f64::NEG_INFINITY;
    for rank in 1..spectrum.len() {
        let ll = assess_dimension(spectrum, rank, n_samples);
        if ll > best_ll {
            best = rank;
            best_ll = ll;
        }
    }
    best
}

/// Log-likelihood of `rank` under Minka's probabilistic PCA model.
fn assess_dimension(spectrum: &[f64], rank: usize, n_samples: usize) -> f64 {
    const EPS: f64 = 1e-15;

    let n_features = spectrum.len();
    let n = n_samples as f64;
    let k = rank as f64;

    if spectrum[rank - 1] < EPS {
        return f64::NEG_INFINITY;
    }

    let mut pu = -k * LN_2;
    for i in 1..=rank {
        let dim = (n_features - i + 1) as f64;
        pu += ln_gamma(dim / 2.0) - PI.ln() * dim / 2.0;
    }

    let pl = -spectrum[..rank].iter().map(|s| s.ln()).sum::<f64>() * n / 2.0;

    let tail = (n_features - rank) as f64;
    let v = (spectrum[rank..].iter().sum::<f64>() / tail).max(EPS);
    let pv = -v.ln() * n * tail / 2.0;

    let m = n_features as f64 * k - k * (k + 1.0) / 2.0;
    let pp = (2.0 * PI).ln() * (m + k) / 2.0;

    let clipped = |j: usize| if j < rank { spectrum[j] } else { v };
    let mut pa = 0.0;
    for i in 0..rank {
        for j in (i + 1)..n_features {
            let gap = (spectrum[i] - spectrum[j]) * (1.0 / clipped(j) - 1.0 / clipped(i));
            pa += gap.ln() + n.ln();
        }
    }

    pu + pl + pv + pp - pa / 2.0 - k * n.ln() / 2.0
}

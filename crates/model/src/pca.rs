//! Principal component factor extraction.

use ndarray::{ArrayView1, ArrayView2, Axis, s};
use serde::{Deserialize, Serialize};
use statrisk_math::{LinalgBackend, NalgebraBackend, weighted_least_squares};
use statrisk_traits::{ConfigError, ModelConfig};
use tracing::debug;

use crate::{
    Decomposition, FactorExtractor, FactorRiskModelConfig, ModelError, NComponents,
    extractor::{active_columns, demean, expand_columns},
};

/// Configuration for [`Pca`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PcaConfig {
    /// Number of components.
    pub n_components: NComponents,
    /// Subtract each instrument's full-history mean before fitting.
    pub demean: bool,
    /// Leave instruments without any return out of the decomposition.
    pub speedup: bool,
    /// Configuration of the produced models.
    #[serde(flatten)]
    pub model: FactorRiskModelConfig,
}

impl Default for PcaConfig {
    fn default() -> Self {
        Self {
            n_components: NComponents::default(),
            demean: true,
            speedup: true,
            model: FactorRiskModelConfig::default(),
        }
    }
}

impl ModelConfig for PcaConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.n_components.validate().map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.model.validate()
    }
}

/// Principal component analysis in instrument space.
///
/// With `T` periods, the singular value decomposition of the centered return
/// matrix gives exposures `B = Vt[..n] · diag(σ · √T)`. Factor returns are
/// the (optionally instrument-weighted) least squares fit of the returns on
/// `B`, period by period; the residuals of that fit are the residual returns.
#[derive(Debug, Clone)]
pub struct Pca<B = NalgebraBackend> {
    config: PcaConfig,
    backend: B,
}

impl Pca {
    /// Create an extractor on the default backend.
    ///
    /// # Errors
    /// Returns `ModelError::Config` if the configuration is invalid.
    pub fn new(config: PcaConfig) -> Result<Self, ModelError> {
        Self::with_backend(config, NalgebraBackend)
    }
}

impl<B: LinalgBackend> Pca<B> {
    /// Create an extractor on a specific backend.
    ///
    /// # Errors
    /// Returns `ModelError::Config` if the configuration is invalid.
    pub fn with_backend(config: PcaConfig, backend: B) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    /// Extractor configuration.
    #[must_use]
    pub const fn config(&self) -> &PcaConfig {
        &self.config
    }
}

impl<B: LinalgBackend> FactorExtractor for Pca<B> {
    fn model_config(&self) -> FactorRiskModelConfig {
        self.config.model
    }

    fn decompose(
        &self,
        returns: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<Decomposition, ModelError> {
        let (t, n) = returns.dim();
        if let Some(w) = weights
            && w.len() != n
        {
            return Err(ModelError::DimensionMismatch {
                context: "instrument weights",
                expected: n,
                actual: w.len(),
            });
        }

        let x = if self.config.demean { demean(returns)? } else { returns.to_owned() };

        let keep: Vec<usize> =
            if self.config.speedup { active_columns(x.view()) } else { (0..n).collect() };
        if keep.len() < n {
            debug!(
                dropped = n - keep.len(),
                kept = keep.len(),
                "skipping instruments without returns"
            );
        }
        let x = x.select(Axis(1), &keep);
        let weights = weights.map(|w| w.select(Axis(0), &keep));

        let centered = match x.mean_axis(Axis(0)) {
            Some(mean) => &x - &mean,
            None => x.clone(),
        };
        let mut svd = self.backend.thin_svd(centered.view())?;
        svd.flip_signs();
        let k = self.config.n_components.resolve(&svd.s, t, keep.len())?;

        // B = Vt[..k] · diag(σ · √T)
        let scale = svd.s.slice(s![..k]).mapv(|sigma| sigma * (t as f64).sqrt());
        let exposures = &svd.vt.slice(s![..k, ..]) * &scale.insert_axis(Axis(1));

        // Cross-sectional regression R_tᵀ = Bᵀ F_tᵀ for every period at once
        let fit = weighted_least_squares(
            exposures.t(),
            x.t(),
            weights.as_ref().map(|w| w.view()),
            &self.backend,
        )?;

        Ok(Decomposition {
            exposures: expand_columns(&exposures, &keep, n),
            factor_returns: fit.beta.reversed_axes(),
            residuals: expand_columns(&fit.alpha.reversed_axes(), &keep, n),
        })
    }
}

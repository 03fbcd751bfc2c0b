//! Asymptotic principal component factor extraction.

use ndarray::{ArrayView1, ArrayView2, Axis, s};
use serde::{Deserialize, Serialize};
use statrisk_math::{LinalgBackend, NalgebraBackend, weighted_least_squares};
use statrisk_traits::{ConfigError, ModelConfig};
use tracing::debug;

use crate::{
    Decomposition, FactorExtractor, FactorRiskModelConfig, ModelError, NComponents,
    extractor::{active_columns, demean, expand_columns},
};

/// Configuration for [`Apca`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApcaConfig {
    /// Number of components.
    pub n_components: NComponents,
    /// Subtract each instrument's full-history mean before fitting.
    pub demean: bool,
    /// Configuration of the produced models.
    #[serde(flatten)]
    pub model: FactorRiskModelConfig,
}

impl Default for ApcaConfig {
    fn default() -> Self {
        Self {
            n_components: NComponents::default(),
            demean: true,
            model: FactorRiskModelConfig::default(),
        }
    }
}

impl ModelConfig for ApcaConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.n_components.validate().map_err(|e| ConfigError::Invalid(e.to_string()))?;
        self.model.validate()
    }
}

/// Asymptotic PCA in time space, suited to `N ≫ T`.
///
/// The decomposition runs on the transposed return matrix, treating
/// instruments as samples. The leading right singular vectors are the factor
/// returns (`T × n`) and exposures follow from regressing each instrument's
/// returns on them. Instruments without any return are always left out and
/// get zero exposures and residuals.
#[derive(Debug, Clone)]
pub struct Apca<B = NalgebraBackend> {
    config: ApcaConfig,
    backend: B,
}

impl Apca {
    /// Create an extractor on the default backend.
    ///
    /// # Errors
    /// Returns `ModelError::Config` if the configuration is invalid.
    pub fn new(config: ApcaConfig) -> Result<Self, ModelError> {
        Self::with_backend(config, NalgebraBackend)
    }
}

impl<B: LinalgBackend> Apca<B> {
    /// Create an extractor on a specific backend.
    ///
    /// # Errors
    /// Returns `ModelError::Config` if the configuration is invalid.
    pub fn with_backend(config: ApcaConfig, backend: B) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { config, backend })
    }

    /// Extractor configuration.
    #[must_use]
    pub const fn config(&self) -> &ApcaConfig {
        &self.config
    }
}

impl<B: LinalgBackend> FactorExtractor for Apca<B> {
    fn model_config(&self) -> FactorRiskModelConfig {
        self.config.model
    }

    fn decompose(
        &self,
        returns: ArrayView2<'_, f64>,
        weights: Option<ArrayView1<'_, f64>>,
    ) -> Result<Decomposition, ModelError> {
        if weights.is_some() {
            let message = "APCA does not accept instrument weights".to_string();
            return Err(ConfigError::Invalid(message).into());
        }
        let (t, n) = returns.dim();

        let x = if self.config.demean { demean(returns)? } else { returns.to_owned() };
        let keep = active_columns(x.view());
        if keep.is_empty() {
            return Err(ModelError::InvalidComponents("no instrument has any return".to_string()));
        }
        if keep.len() < n {
            debug!(
                dropped = n - keep.len(),
                kept = keep.len(),
                "skipping instruments without returns"
            );
        }
        let x = x.select(Axis(1), &keep);

        // Instruments are the samples: center each period across instruments
        let xt = x.t();
        let centered = match xt.mean_axis(Axis(0)) {
            Some(mean) => &xt - &mean,
            None => xt.to_owned(),
        };
        let mut svd = self.backend.thin_svd(centered.view())?;
        svd.flip_signs();
        let k = self.config.n_components.resolve(&svd.s, keep.len(), t)?;

        let factor_returns = svd.vt.slice(s![..k, ..]).t().to_owned();
        let fit = weighted_least_squares(factor_returns.view(), x.view(), None, &self.backend)?;

        Ok(Decomposition {
            exposures: expand_columns(&fit.beta, &keep, n),
            factor_returns,
            residuals: expand_columns(&fit.alpha, &keep, n),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    use super::*;
    use crate::factor_risk_model::tests::daily_returns;

    fn apca(n_components: usize) -> Apca {
        let n_components = NComponents::Count(n_components);
        Apca::new(ApcaConfig { n_components, ..ApcaConfig::default() }).unwrap()
    }

    #[test]
    fn apca_matches_reference_decomposition() {
        let model = apca(1).fit(&daily_returns(), None).unwrap();

        assert_abs_diff_eq!(
            model.factor_exposures().values().view(),
            array![[0.01162204, 0.04715992, 0.0, -0.01902376]].view(),
            epsilon = 1e-7
        );
        assert_abs_diff_eq!(
            model.factor_returns().values().column(0),
            array![
                -0.50982849,
                0.2321729,
                0.56366303,
                0.36835974,
                -0.09223446,
                0.05441901,
                0.13598935,
                -0.28669822,
                -0.15512892,
                -0.31071395
            ]
            .view(),
            epsilon = 1e-7
        );
        assert_abs_diff_eq!(
            model.residual_returns().values().row(0),
            array![-0.0091819, -0.00145047, 0.0, -0.00105986].view(),
            epsilon = 1e-7
        );
        assert_abs_diff_eq!(
            model.residual_returns().values().row(3),
            array![-0.03507582, -0.02778148, 0.0, -0.02741295].view(),
            epsilon = 1e-7
        );
    }

    #[test]
    fn apca_factor_returns_are_orthonormal() {
        let model = apca(2).fit(&daily_returns(), None).unwrap();
        let f = model.factor_returns().values();
        assert_abs_diff_eq!(f.t().dot(f), Array2::<f64>::eye(2), epsilon = 1e-12);
    }

    #[test]
    fn apca_rejects_weights() {
        let weights = array![1.0, 1.0, 1.0, 1.0];
        assert!(matches!(
            apca(1).fit(&daily_returns(), Some(weights.view())),
            Err(ModelError::Config(_))
        ));
    }

    #[test]
    fn apca_rejects_empty_universe() {
        let returns = daily_returns();
        let zeros = returns.with_values(Array2::zeros((10, 4))).unwrap();
        assert!(matches!(apca(1).fit(&zeros, None), Err(ModelError::InvalidComponents(_))));
    }

    #[test]
    fn apca_config_dict() {
        let config =
            ApcaConfig { n_components: NComponents::Fraction(0.8), ..ApcaConfig::default() };
        let dict = config.to_dict().unwrap();
        assert_eq!(ApcaConfig::from_dict(dict).unwrap(), config);
    }
}

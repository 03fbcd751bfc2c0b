//! Covariance estimation on top of a risk model.

use std::{collections::BTreeSet, str::FromStr};

use derive_more::Display;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use statrisk_primitives::{LabelFrame, Series};
use statrisk_traits::{ConfigError, ModelConfig, RiskModel};
use tracing::debug;

use crate::ModelError;

/// Covariance shrinkage method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkageMethod {
    /// Shrink towards the average variance times the identity.
    #[display("constant")]
    Constant,
}

impl FromStr for ShrinkageMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "constant" => Ok(Self::Constant),
            other => Err(ConfigError::Invalid(format!("unknown shrinkage method {other:?}"))),
        }
    }
}

impl ShrinkageMethod {
    /// Shrink a covariance matrix with intensity `delta`.
    #[must_use]
    pub fn apply(self, mut cov: Array2<f64>, delta: f64) -> Array2<f64> {
        match self {
            Self::Constant => {
                let n = cov.nrows();
                if n == 0 {
                    return cov;
                }
                let target = cov.diag().sum() / n as f64 * delta;
                cov *= 1.0 - delta;
                cov.diag_mut().mapv_inplace(|v| v + target);
                cov
            }
        }
    }
}

/// Shrinkage applied to volatility-rescaled covariances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrinkageConfig {
    /// Shrinkage method, `None` disables shrinkage.
    pub method: Option<ShrinkageMethod>,
    /// Shrinkage intensity in [0, 1], required with a method.
    pub delta: Option<f64>,
}

impl ShrinkageConfig {
    /// Constant shrinkage with intensity `delta`.
    #[must_use]
    pub const fn constant(delta: f64) -> Self {
        Self { method: Some(ShrinkageMethod::Constant), delta: Some(delta) }
    }
}

impl ModelConfig for ShrinkageConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let Some(method) = self.method else {
            return Ok(());
        };
        match self.delta {
            Some(delta) if (0.0..=1.0).contains(&delta) => Ok(()),
            Some(delta) => {
                Err(ConfigError::Invalid(format!("shrinkage delta {delta} must lie in [0, 1]")))
            }
            None => Err(ConfigError::Invalid(format!("{method} shrinkage requires a delta"))),
        }
    }
}

/// Instrument covariance from a risk model's correlation and an external
/// volatility forecast, optionally shrunk.
#[derive(Debug, Clone, Copy)]
pub struct CovarianceEstimator<'a, M> {
    model: &'a M,
    config: ShrinkageConfig,
}

impl<'a, M> CovarianceEstimator<'a, M>
where
    M: RiskModel,
    ModelError: From<M::Error>,
{
    /// Wrap a risk model.
    ///
    /// # Errors
    /// Returns `ModelError::Config` if the shrinkage configuration is invalid.
    pub fn new(model: &'a M, config: ShrinkageConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    /// Shrinkage configuration.
    #[must_use]
    pub const fn config(&self) -> &ShrinkageConfig {
        &self.config
    }

    /// The model's correlation matrix with default parameters.
    ///
    /// # Errors
    /// Returns the model's error.
    pub fn corr(&self) -> Result<LabelFrame, ModelError> {
        Ok(self.model.corr(&M::Params::default())?)
    }

    /// Covariance matrix.
    ///
    /// Without `volatility` this is the model's own covariance. Otherwise the
    /// model's correlation is rescaled by the given volatilities and shrunk as
    /// configured. With `strict`, the volatility labels must be exactly the
    /// correlation instruments; without it, the common instruments are used in
    /// correlation order.
    ///
    /// # Errors
    /// Returns `ModelError::MisalignedVolatility` on a strict label mismatch,
    /// or the model's error.
    pub fn cov(&self, volatility: Option<&Series>, strict: bool) -> Result<LabelFrame, ModelError> {
        let Some(volatility) = volatility else {
            return Ok(self.model.cov(&M::Params::default())?);
        };

        let corr = self.corr()?;
        let mismatch = || ModelError::MisalignedVolatility {
            volatility: volatility.len(),
            correlation: corr.ncols(),
        };
        if strict {
            let labels: BTreeSet<&String> = volatility.index().iter().collect();
            let instruments: BTreeSet<&String> = corr.columns().iter().collect();
            if labels != instruments {
                return Err(mismatch());
            }
        }

        let (positions, vol): (Vec<usize>, Vec<f64>) = corr
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(i, name)| volatility.get(name).map(|v| (i, v)))
            .unzip();
        if positions.len() < corr.ncols() {
            debug!(
                dropped = corr.ncols() - positions.len(),
                "instruments without volatility left out of covariance"
            );
        }

        let vol = Array1::from(vol);
        let labels: Vec<String> = positions.iter().map(|&i| corr.columns()[i].clone()).collect();
        let n = positions.len();
        let mut cov = Array2::from_shape_fn((n, n), |(i, j)| {
            corr.values()[[positions[i], positions[j]]] * vol[i] * vol[j]
        });

        if let (Some(method), Some(delta)) = (self.config.method, self.config.delta) {
            cov = method.apply(cov, delta);
        }
        Ok(LabelFrame::new(labels.clone(), labels, cov)?)
    }
}

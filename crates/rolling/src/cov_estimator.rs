//! Per-date covariance estimation over a rolling model.

use std::collections::BTreeMap;

use statrisk_model::{CovarianceEstimator, ModelError, ShrinkageConfig};
use statrisk_primitives::{Date, LabelFrame, Series, TimeFrame};
use statrisk_traits::{ModelConfig, RiskModel};

use crate::{RollingError, RollingRiskModel};

/// Applies a [`CovarianceEstimator`] to every model of a rolling model.
#[derive(Debug, Clone, Copy)]
pub struct RollingCovarianceEstimator<'a, M> {
    model: &'a RollingRiskModel<M>,
    config: ShrinkageConfig,
}

impl<'a, M> RollingCovarianceEstimator<'a, M>
where
    M: RiskModel,
    ModelError: From<M::Error>,
{
    /// Wrap a rolling model.
    ///
    /// # Errors
    /// Returns `RollingError::Config` if the shrinkage configuration is
    /// invalid.
    pub fn new(
        model: &'a RollingRiskModel<M>,
        config: ShrinkageConfig,
    ) -> Result<Self, RollingError> {
        config.validate()?;
        Ok(Self { model, config })
    }

    /// Covariance matrix for every model date.
    ///
    /// With `volatility`, each date's row rescales that date's correlation
    /// over the instruments both share; missing (NaN) volatilities leave the
    /// instrument out.
    ///
    /// # Errors
    /// Returns `RollingError::MissingDate` if a model date has no volatility
    /// row, or the model's error.
    pub fn cov(
        &self,
        volatility: Option<&TimeFrame>,
    ) -> Result<BTreeMap<Date, LabelFrame>, RollingError> {
        self.model
            .items()
            .map(|(date, model)| -> Result<(Date, LabelFrame), RollingError> {
                let estimator = CovarianceEstimator::new(model, self.config)?;
                let cov = match volatility {
                    Some(volatility) => {
                        let row = volatility_at(volatility, date)?;
                        estimator.cov(Some(&row), false)?
                    }
                    None => estimator.cov(None, false)?,
                };
                Ok((*date, cov))
            })
            .collect()
    }
}

fn volatility_at(volatility: &TimeFrame, date: &Date) -> Result<Series, RollingError> {
    let row = volatility.row(date).ok_or(RollingError::MissingDate(*date))?;
    let (labels, values): (Vec<String>, Vec<f64>) = volatility
        .columns()
        .iter()
        .zip(row.iter())
        .filter(|(_, v)| !v.is_nan())
        .map(|(name, &v)| (name.clone(), v))
        .unzip();
    Ok(Series::new(labels, values.into())?)
}

//! Factor risk model.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use statrisk_math::{half_life_weights, weighted_covariance, weighted_variance};
use statrisk_primitives::{LabelFrame, Series, TimeFrame};
use statrisk_traits::{ConfigError, ModelConfig, Regressor, RiskModel};
use tracing::debug;

use crate::ModelError;

/// Configuration shared by every factor risk model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorRiskModelConfig {
    /// Keep zero-variance instruments in `cov` / `corr` as NaN rows and
    /// columns instead of dropping them.
    pub show_all_instruments: bool,
}

impl ModelConfig for FactorRiskModelConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Parameters of the covariance reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CovParams {
    /// Half-life (in periods) for exponentially weighted second moments.
    /// `None` uses equal weights and any stored factor covariance.
    pub halflife: Option<f64>,
    /// Delta degrees of freedom.
    pub ddof: usize,
}

impl Default for CovParams {
    fn default() -> Self {
        Self { halflife: None, ddof: 1 }
    }
}

impl CovParams {
    /// Exponentially weighted parameters with the default `ddof`.
    #[must_use]
    pub fn with_halflife(halflife: f64) -> Self {
        Self { halflife: Some(halflife), ..Self::default() }
    }
}

/// A fitted factor risk model, `R = F · B + ε`.
///
/// Holds factor exposures `B` (n factors × N instruments), factor returns `F`
/// (T × n), an optional factor covariance (n × n) and residual returns `ε`
/// (T × N). Construction checks that all parts line up; the model is
/// immutable afterwards and [`transform`](Self::transform) returns a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRiskModel {
    config: FactorRiskModelConfig,
    factor_exposures: LabelFrame,
    factor_returns: TimeFrame,
    factor_covariances: Option<LabelFrame>,
    residual_returns: TimeFrame,
}

impl FactorRiskModel {
    /// Create a model from its parts.
    ///
    /// # Errors
    /// Returns `ModelError::Misaligned` if exposure columns differ from
    /// residual columns, exposure rows differ from factor-return columns, or
    /// factor and residual returns have different lengths.
    pub fn new(
        config: FactorRiskModelConfig,
        factor_exposures: LabelFrame,
        factor_returns: TimeFrame,
        residual_returns: TimeFrame,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        if factor_exposures.columns() != residual_returns.columns() {
            return Err(ModelError::Misaligned(
                "exposure instruments differ from residual instruments".to_string(),
            ));
        }
        if factor_exposures.index() != factor_returns.columns() {
            return Err(ModelError::Misaligned(
                "exposure factors differ from factor return columns".to_string(),
            ));
        }
        if factor_returns.nrows() != residual_returns.nrows() {
            return Err(ModelError::Misaligned(format!(
                "{} factor return periods but {} residual periods",
                factor_returns.nrows(),
                residual_returns.nrows()
            )));
        }

        Ok(Self {
            config,
            factor_exposures,
            factor_returns,
            factor_covariances: None,
            residual_returns,
        })
    }

    /// Attach a factor covariance matrix.
    ///
    /// # Errors
    /// Returns `ModelError::Misaligned` unless both axes are labeled by the
    /// model's factors.
    pub fn with_factor_covariances(mut self, covariances: LabelFrame) -> Result<Self, ModelError> {
        let factors = self.factors();
        if covariances.index() != factors || covariances.columns() != factors {
            return Err(ModelError::Misaligned(
                "factor covariance must be labeled by the model factors".to_string(),
            ));
        }
        self.factor_covariances = Some(covariances);
        Ok(self)
    }

    /// Model configuration.
    #[must_use]
    pub const fn config(&self) -> &FactorRiskModelConfig {
        &self.config
    }

    /// Factor exposures (n × N).
    #[must_use]
    pub const fn factor_exposures(&self) -> &LabelFrame {
        &self.factor_exposures
    }

    /// Factor returns (T × n).
    #[must_use]
    pub const fn factor_returns(&self) -> &TimeFrame {
        &self.factor_returns
    }

    /// Stored factor covariance (n × n), if any.
    #[must_use]
    pub const fn factor_covariances(&self) -> Option<&LabelFrame> {
        self.factor_covariances.as_ref()
    }

    /// Residual returns (T × N).
    #[must_use]
    pub const fn residual_returns(&self) -> &TimeFrame {
        &self.residual_returns
    }

    /// Factor names.
    #[must_use]
    pub fn factors(&self) -> &[String] {
        self.factor_exposures.index()
    }

    /// Instrument identifiers.
    #[must_use]
    pub fn instruments(&self) -> &[String] {
        self.factor_exposures.columns()
    }

    /// Weighted variance of each instrument's residual returns.
    ///
    /// # Errors
    /// Returns `ModelError` if the weight length differs from the number of
    /// periods or there are not more periods than `ddof`.
    pub fn specific_variances(
        &self,
        weights: Option<ArrayView1<'_, f64>>,
        ddof: usize,
    ) -> Result<Series, ModelError> {
        let variances = weighted_variance(self.residual_returns.values().view(), weights, ddof)?;
        Ok(Series::new(self.instruments().to_vec(), variances)?)
    }

    /// Factor covariance matrix (n × n).
    ///
    /// Without a half-life the stored covariance is returned when present.
    /// Otherwise it is computed from the factor returns, exponentially
    /// weighted when `halflife` is given.
    ///
    /// # Errors
    /// Returns `ModelError` if the half-life is invalid or there are not more
    /// periods than `ddof`.
    pub fn factor_covariance(
        &self,
        halflife: Option<f64>,
        ddof: usize,
    ) -> Result<LabelFrame, ModelError> {
        if halflife.is_none()
            && let Some(stored) = &self.factor_covariances
        {
            return Ok(stored.clone());
        }

        let weights = self.period_weights(halflife)?;
        let cov = weighted_covariance(
            self.factor_returns.values().view(),
            weights.as_ref().map(Array1::view),
            ddof,
        )?;
        Ok(LabelFrame::new(self.factors().to_vec(), self.factors().to_vec(), cov)?)
    }

    /// Regress new returns on this model's factor returns.
    ///
    /// `y` must cover the same periods as the factor returns and may hold any
    /// set of instruments. The coefficients become the new exposures and the
    /// residuals the new residual returns; factor returns and covariance are
    /// carried over unchanged.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if `y` has a different number of
    /// periods, or the regressor's error.
    pub fn transform<R: Regressor + ?Sized>(
        &self,
        y: &TimeFrame,
        regressor: &R,
    ) -> Result<Self, ModelError> {
        if y.nrows() != self.factor_returns.nrows() {
            return Err(ModelError::DimensionMismatch {
                context: "transform periods",
                expected: self.factor_returns.nrows(),
                actual: y.nrows(),
            });
        }

        let result = regressor.fit(self.factor_returns.values().view(), y.values().view(), None)?;
        let factor_exposures =
            LabelFrame::new(self.factors().to_vec(), y.columns().to_vec(), result.beta)?;
        let residual_returns =
            TimeFrame::new(y.index().to_vec(), y.columns().to_vec(), result.alpha)?;

        debug!(
            instruments = y.ncols(),
            factors = self.factors().len(),
            "transformed factor risk model"
        );

        Ok(Self {
            config: self.config,
            factor_exposures,
            factor_returns: self.factor_returns.clone(),
            factor_covariances: self.factor_covariances.clone(),
            residual_returns,
        })
    }

    fn period_weights(&self, halflife: Option<f64>) -> Result<Option<Array1<f64>>, ModelError> {
        Ok(halflife.map(|h| half_life_weights(self.factor_returns.nrows(), h)).transpose()?)
    }
}

impl RiskModel for FactorRiskModel {
    type Params = CovParams;
    type Error = ModelError;

    /// `Bᵀ · Σ_f · B + diag(specific variances)`.
    ///
    /// Instruments whose covariance row is entirely zero are dropped, or kept
    /// as NaN when `show_all_instruments` is set.
    fn cov(&self, params: &CovParams) -> Result<LabelFrame, ModelError> {
        let factor_cov = self.factor_covariance(params.halflife, params.ddof)?;
        let weights = self.period_weights(params.halflife)?;
        let specific = self.specific_variances(weights.as_ref().map(Array1::view), params.ddof)?;

        let exposures = self.factor_exposures.values();
        let mut cov = exposures.t().dot(&factor_cov.values().dot(exposures));
        cov.diag_mut().zip_mut_with(specific.values(), |c, v| *c += v);

        let zero: Vec<bool> =
            cov.rows().into_iter().map(|row| row.iter().all(|&x| x == 0.0)).collect();
        let instruments = self.instruments();
        if !zero.contains(&true) {
            return Ok(LabelFrame::new(instruments.to_vec(), instruments.to_vec(), cov)?);
        }

        let n_zero = zero.iter().filter(|&&z| z).count();
        if self.config.show_all_instruments {
            debug!(instruments = n_zero, "marking zero-variance instruments as NaN");
            for (i, _) in zero.iter().enumerate().filter(|&(_, &z)| z) {
                cov.row_mut(i).fill(f64::NAN);
                cov.column_mut(i).fill(f64::NAN);
            }
            return Ok(LabelFrame::new(instruments.to_vec(), instruments.to_vec(), cov)?);
        }

        debug!(instruments = n_zero, "dropping zero-variance instruments");
        let keep: Vec<usize> = (0..zero.len()).filter(|&i| !zero[i]).collect();
        let labels: Vec<String> = keep.iter().map(|&i| instruments[i].clone()).collect();
        let cov: Array2<f64> = cov.select(Axis(0), &keep).select(Axis(1), &keep);
        Ok(LabelFrame::new(labels.clone(), labels, cov)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{Array2, array, s};
    use statrisk_primitives::Date;

    use super::*;
    use crate::Wls;

    // Mirrored in `statrisk-rolling`'s test data.
    pub(crate) fn instruments() -> Vec<String> {
        ["A", "AAL", "AAP", "AAPL"].iter().map(ToString::to_string).collect()
    }

    /// Business days 2016-01-04 through 2016-01-15.
    pub(crate) fn dates() -> Vec<Date> {
        [4, 5, 6, 7, 8, 11, 12, 13, 14, 15]
            .iter()
            .map(|&d| Date::from_ymd_opt(2016, 1, d).unwrap())
            .collect()
    }

    pub(crate) fn daily_returns() -> TimeFrame {
        TimeFrame::new(
            dates(),
            instruments(),
            array![
                [-0.02678756, -0.03400254, 0.0, 0.000855],
                [-0.00344077, -0.00953307, 0.0, -0.02505943],
                [0.00443915, 0.01752232, 0.0, -0.01956966],
                [-0.04247514, -0.01891826, 0.0, -0.04220453],
                [-0.01051272, -0.00197782, 0.0, 0.00528776],
                [-0.01684373, 0.01758743, 0.0, 0.01619198],
                [0.00658919, 0.02239528, 0.0, 0.01451376],
                [-0.03482585, -0.0452383, 0.0, -0.02571051],
                [0.02034743, 0.01122229, 0.0, 0.02187115],
                [-0.01329412, -0.04414332, 0.0, -0.02401548],
            ],
        )
        .unwrap()
    }

    /// Full-rank model whose reconstruction equals the sample covariance.
    fn identity_model(config: FactorRiskModelConfig) -> FactorRiskModel {
        let returns = daily_returns();
        let labels = instruments();
        let exposures = LabelFrame::new(labels.clone(), labels.clone(), Array2::eye(4)).unwrap();
        let residuals = returns.with_values(Array2::zeros((10, 4))).unwrap();
        FactorRiskModel::new(config, exposures, returns, residuals).unwrap()
    }

    #[test]
    fn new_rejects_misaligned_parts() {
        let returns = daily_returns();
        let exposures = LabelFrame::new(
            vec!["factor_1".to_string()],
            instruments(),
            Array2::zeros((1, 4)),
        )
        .unwrap();
        let factor_returns =
            TimeFrame::new(dates(), vec!["factor_1".to_string()], Array2::zeros((10, 1))).unwrap();

        let short = returns.slice_rows(0..9).unwrap();
        assert!(matches!(
            FactorRiskModel::new(
                FactorRiskModelConfig::default(),
                exposures.clone(),
                factor_returns.clone(),
                short
            ),
            Err(ModelError::Misaligned(_))
        ));

        let fewer = returns.select_columns(&instruments()[..3]).unwrap();
        assert!(matches!(
            FactorRiskModel::new(
                FactorRiskModelConfig::default(),
                exposures,
                factor_returns,
                fewer
            ),
            Err(ModelError::Misaligned(_))
        ));
    }

    #[test]
    fn cov_full_rank_equals_sample_covariance() {
        let model = identity_model(FactorRiskModelConfig { show_all_instruments: true });
        let cov = model.cov(&CovParams::default()).unwrap();
        let expected = weighted_covariance(daily_returns().values().view(), None, 1).unwrap();

        // AAP has zero variance and is NaN-marked
        assert!(cov.values().row(2).iter().all(|x| x.is_nan()));
        for i in [0, 1, 3] {
            for j in [0, 1, 3] {
                assert_relative_eq!(cov.values()[[i, j]], expected[[i, j]], epsilon = 1e-15);
            }
        }
    }

    #[test]
    fn cov_drops_zero_variance_instruments() {
        let model = identity_model(FactorRiskModelConfig::default());
        let cov = model.cov(&CovParams::default()).unwrap();
        assert_eq!(cov.columns(), &["A".to_string(), "AAL".to_string(), "AAPL".to_string()]);
        assert_eq!(cov.index(), cov.columns());
        assert!(cov.values().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn corr_has_unit_diagonal() {
        let model = identity_model(FactorRiskModelConfig::default());
        let corr = model.corr(&CovParams::default()).unwrap();
        for i in 0..corr.nrows() {
            assert_relative_eq!(corr.values()[[i, i]], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn vol_is_sqrt_of_variance() {
        let model = identity_model(FactorRiskModelConfig::default());
        let vol = model.vol(&CovParams::default()).unwrap();
        let var = weighted_variance(daily_returns().values().view(), None, 1).unwrap();
        assert_relative_eq!(vol.get("A").unwrap(), var[0].sqrt(), epsilon = 1e-15);
        assert!(vol.get("AAP").is_none());
    }

    #[test]
    fn specific_variances_weight_length() {
        let model = identity_model(FactorRiskModelConfig::default());
        let weights = Array1::ones(3);
        assert!(model.specific_variances(Some(weights.view()), 1).is_err());
        let variances = model.specific_variances(None, 1).unwrap();
        assert_eq!(variances.len(), 4);
    }

    #[test]
    fn factor_covariance_prefers_stored_matrix() {
        let labels = instruments();
        let stored = LabelFrame::new(labels.clone(), labels, Array2::eye(4) * 0.5).unwrap();
        let model = identity_model(FactorRiskModelConfig::default())
            .with_factor_covariances(stored.clone())
            .unwrap();

        assert_eq!(model.factor_covariance(None, 1).unwrap(), stored);
        // A half-life always recomputes from the factor returns
        let weighted = model.factor_covariance(Some(10.0), 1).unwrap();
        assert!(weighted.values()[[0, 0]] < 0.5);
    }

    #[test]
    fn halflife_cov_weights_recent_periods() {
        let model = identity_model(FactorRiskModelConfig::default());
        let weights = half_life_weights(10, 10.0).unwrap();
        let expected = weighted_covariance(daily_returns().values().view(), Some(weights.view()), 1)
            .unwrap();
        let cov = model.cov(&CovParams::with_halflife(10.0)).unwrap();
        assert_relative_eq!(cov.values()[[0, 0]], expected[[0, 0]], epsilon = 1e-15);
        assert_relative_eq!(cov.values()[[0, 2]], expected[[0, 3]], epsilon = 1e-15);
    }

    #[test]
    fn cov_rejects_invalid_halflife() {
        let model = identity_model(FactorRiskModelConfig::default());
        assert!(matches!(model.cov(&CovParams::with_halflife(0.0)), Err(ModelError::Math(_))));
    }

    #[test]
    fn with_factor_covariances_checks_labels() {
        let model = identity_model(FactorRiskModelConfig::default());
        let wrong = LabelFrame::new(
            vec!["factor_1".to_string()],
            vec!["factor_1".to_string()],
            array![[1.0]],
        )
        .unwrap();
        assert!(matches!(model.with_factor_covariances(wrong), Err(ModelError::Misaligned(_))));
    }

    #[test]
    fn transform_extends_universe() {
        let model = identity_model(FactorRiskModelConfig::default());
        let returns = daily_returns();
        let mut values = Array2::zeros((10, 5));
        values.slice_mut(s![.., ..4]).assign(returns.values());
        values.column_mut(4).assign(&returns.values().column(0).mapv(|x| 2.0 * x));
        let mut labels = instruments();
        labels.push("ABBV".to_string());
        let y = TimeFrame::new(dates(), labels.clone(), values).unwrap();

        let transformed = model.transform(&y, &Wls::new()).unwrap();

        assert_eq!(transformed.instruments(), labels.as_slice());
        assert_eq!(transformed.factor_returns(), model.factor_returns());
        assert_eq!(transformed.factor_covariances(), model.factor_covariances());
        // The all-zero AAP factor is unidentified; every other exposure is recovered
        for i in [0, 1, 3] {
            for j in [0, 1, 3] {
                assert_abs_diff_eq!(
                    transformed.factor_exposures().values()[[i, j]],
                    model.factor_exposures().values()[[i, j]],
                    epsilon = 1e-10
                );
            }
        }
        assert_relative_eq!(transformed.factor_exposures().values()[[0, 4]], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn transform_rejects_period_mismatch() {
        let model = identity_model(FactorRiskModelConfig::default());
        let y = daily_returns().slice_rows(0..5).unwrap();
        assert!(matches!(
            model.transform(&y, &Wls::new()),
            Err(ModelError::DimensionMismatch { expected: 10, actual: 5, .. })
        ));
    }

    #[test]
    fn config_dict_round_trip() {
        let config = FactorRiskModelConfig { show_all_instruments: true };
        let restored = FactorRiskModelConfig::from_dict(config.to_dict().unwrap()).unwrap();
        assert_eq!(restored, config);
    }
}

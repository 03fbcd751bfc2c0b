//! Date-keyed collection of risk models.

use std::collections::{BTreeMap, btree_map};

use statrisk_model::FactorRiskModel;
use statrisk_primitives::Date;
use statrisk_traits::ModelConfig;

use crate::{RollingConfig, RollingError};

/// Risk models keyed by the date their window ends on, in date order.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingRiskModel<M> {
    pub(crate) config: RollingConfig,
    pub(crate) values: BTreeMap<Date, M>,
}

/// Rolling collection of factor risk models.
pub type RollingFactorRiskModel = RollingRiskModel<FactorRiskModel>;

impl<M> RollingRiskModel<M> {
    /// Create an empty, unfitted rolling model.
    ///
    /// # Errors
    /// Returns `RollingError::Config` if the configuration is invalid.
    pub fn new(config: RollingConfig) -> Result<Self, RollingError> {
        Self::from_values(config, BTreeMap::new())
    }

    /// Create a rolling model from already fitted models.
    ///
    /// # Errors
    /// Returns `RollingError::Config` if the configuration is invalid.
    pub fn from_values(
        config: RollingConfig,
        values: BTreeMap<Date, M>,
    ) -> Result<Self, RollingError> {
        config.validate()?;
        Ok(Self { config, values })
    }

    /// Rolling configuration.
    #[must_use]
    pub const fn config(&self) -> &RollingConfig {
        &self.config
    }

    /// Model for `date`, if any.
    #[must_use]
    pub fn get(&self, date: &Date) -> Option<&M> {
        self.values.get(date)
    }

    /// Model dates in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, Date, M> {
        self.values.keys()
    }

    /// Models in date order.
    pub fn values(&self) -> btree_map::Values<'_, Date, M> {
        self.values.values()
    }

    /// `(date, model)` pairs in date order.
    pub fn items(&self) -> btree_map::Iter<'_, Date, M> {
        self.values.iter()
    }

    /// Number of models.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether any model has been fitted.
    #[must_use]
    pub fn is_fit(&self) -> bool {
        !self.values.is_empty()
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_values(self) -> BTreeMap<Date, M> {
        self.values
    }
}

impl<'a, M> IntoIterator for &'a RollingRiskModel<M> {
    type Item = (&'a Date, &'a M);
    type IntoIter = btree_map::Iter<'a, Date, M>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> Date {
        Date::from_ymd_opt(2016, 1, day).unwrap()
    }

    #[test]
    fn keys_are_ordered() {
        let values = BTreeMap::from([(date(12), "b"), (date(11), "a"), (date(13), "c")]);
        let rolling = RollingRiskModel::from_values(RollingConfig::with_window(5), values).unwrap();

        assert_eq!(rolling.keys().copied().collect::<Vec<_>>(), vec![date(11), date(12), date(13)]);
        assert_eq!(rolling.values().copied().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(rolling.get(&date(12)), Some(&"b"));
        assert_eq!(rolling.get(&date(14)), None);
        assert_eq!((&rolling).into_iter().count(), 3);
        assert!(rolling.is_fit());
    }

    #[test]
    fn new_is_unfitted() {
        let rolling = RollingRiskModel::<()>::new(RollingConfig::with_window(5)).unwrap();
        assert!(rolling.is_empty());
        assert!(!rolling.is_fit());
        assert_eq!(rolling.len(), 0);
    }

    #[test]
    fn new_validates_config() {
        assert!(matches!(
            RollingRiskModel::<()>::new(RollingConfig::with_window(0)),
            Err(RollingError::Config(_))
        ));
    }
}

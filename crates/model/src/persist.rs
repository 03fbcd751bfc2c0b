//! Directory persistence for factor risk models.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use statrisk_primitives::{LabelFrame, TimeFrame};
use statrisk_utils::{TableFormat, read_frame, read_json, table_path, write_frame, write_json};

use crate::{FactorRiskModel, FactorRiskModelConfig, ModelError};

const FACTOR_EXPOSURES: &str = "factor_exposures";
const FACTOR_RETURNS: &str = "factor_returns";
const FACTOR_COVARIANCES: &str = "factor_covariances";
const RESIDUAL_RETURNS: &str = "residual_returns";
const META_FILE: &str = "meta.json";

#[derive(Debug, Serialize, Deserialize)]
struct ModelMeta {
    config: FactorRiskModelConfig,
    has_factor_covariances: bool,
}

impl FactorRiskModel {
    /// Write the model's tables and configuration into `path`.
    ///
    /// The directory is created if needed. Tables are named
    /// `factor_exposures`, `factor_returns`, `factor_covariances` (when
    /// present) and `residual_returns`; the configuration goes to `meta.json`.
    ///
    /// # Errors
    /// Returns `ModelError` if any file cannot be written.
    pub fn write_directory(&self, path: &Path, format: TableFormat) -> Result<(), ModelError> {
        fs::create_dir_all(path)?;

        write_frame(self.factor_exposures(), &table_path(path, FACTOR_EXPOSURES, format), format)?;
        write_frame(self.factor_returns(), &table_path(path, FACTOR_RETURNS, format), format)?;
        write_frame(self.residual_returns(), &table_path(path, RESIDUAL_RETURNS, format), format)?;
        if let Some(cov) = self.factor_covariances() {
            write_frame(cov, &table_path(path, FACTOR_COVARIANCES, format), format)?;
        }

        let meta = ModelMeta {
            config: *self.config(),
            has_factor_covariances: self.factor_covariances().is_some(),
        };
        write_json(&meta, &path.join(META_FILE))?;
        Ok(())
    }

    /// Read a model previously written with [`write_directory`](Self::write_directory).
    ///
    /// # Errors
    /// Returns `ModelError` if a file is missing or the tables do not line up.
    pub fn read_directory(path: &Path, format: TableFormat) -> Result<Self, ModelError> {
        let meta: ModelMeta = read_json(&path.join(META_FILE))?;

        let factor_exposures: LabelFrame =
            read_frame(&table_path(path, FACTOR_EXPOSURES, format), format)?;
        let factor_returns: TimeFrame =
            read_frame(&table_path(path, FACTOR_RETURNS, format), format)?;
        let residual_returns: TimeFrame =
            read_frame(&table_path(path, RESIDUAL_RETURNS, format), format)?;

        let model = Self::new(meta.config, factor_exposures, factor_returns, residual_returns)?;
        if meta.has_factor_covariances {
            let cov: LabelFrame =
                read_frame(&table_path(path, FACTOR_COVARIANCES, format), format)?;
            return model.with_factor_covariances(cov);
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        FactorExtractor, NComponents, Pca, PcaConfig,
        factor_risk_model::tests::daily_returns,
    };

    fn fitted() -> FactorRiskModel {
        let config = PcaConfig {
            n_components: NComponents::Count(2),
            model: FactorRiskModelConfig { show_all_instruments: true },
            ..PcaConfig::default()
        };
        Pca::new(config).unwrap().fit(&daily_returns(), None).unwrap()
    }

    #[rstest]
    #[case(TableFormat::Csv)]
    #[case(TableFormat::Parquet)]
    fn directory_round_trip(#[case] format: TableFormat) {
        let dir = tempfile::tempdir().unwrap();
        let model = fitted();

        model.write_directory(dir.path(), format).unwrap();
        let restored = FactorRiskModel::read_directory(dir.path(), format).unwrap();

        assert_eq!(restored, model);
        assert!(restored.config().show_all_instruments);
    }

    #[test]
    fn round_trip_without_covariance() {
        let dir = tempfile::tempdir().unwrap();
        let model = fitted();
        let bare = FactorRiskModel::new(
            *model.config(),
            model.factor_exposures().clone(),
            model.factor_returns().clone(),
            model.residual_returns().clone(),
        )
        .unwrap();

        bare.write_directory(dir.path(), TableFormat::Parquet).unwrap();
        assert!(!table_path(dir.path(), FACTOR_COVARIANCES, TableFormat::Parquet).exists());

        let restored = FactorRiskModel::read_directory(dir.path(), TableFormat::Parquet).unwrap();
        assert!(restored.factor_covariances().is_none());
        assert_eq!(restored, bare);
    }

    #[test]
    fn read_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent");
        assert!(FactorRiskModel::read_directory(&absent, TableFormat::Csv).is_err());
    }
}

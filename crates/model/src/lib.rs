#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod regressor;
pub use regressor::{Ewls, Wls};

mod factor_risk_model;
pub use factor_risk_model::{CovParams, FactorRiskModel, FactorRiskModelConfig};

mod persist;

mod components;
pub use components::NComponents;

mod extractor;
pub use extractor::{Decomposition, FactorExtractor, ZERO_RETURN, factor_names};

mod pca;
pub use pca::{Pca, PcaConfig};

mod apca;
pub use apca::{Apca, ApcaConfig};

mod cov_estimator;
pub use cov_estimator::{CovarianceEstimator, ShrinkageConfig, ShrinkageMethod};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use statrisk_traits::{ModelConfig, Regressor, RiskModel};

    pub use super::{
        Apca, CovParams, CovarianceEstimator, FactorExtractor, FactorRiskModel, ModelError,
        NComponents, Pca, Wls,
    };
}

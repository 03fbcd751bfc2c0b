#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod config;
pub use config::{DEFAULT_WINDOW, RollingConfig};

mod rolling;
pub use rolling::{RollingFactorRiskModel, RollingRiskModel};

mod window;

mod persist;
pub use persist::MANIFEST_FILE;

mod cov_estimator;
pub use cov_estimator::RollingCovarianceEstimator;

mod progress;

mod error;
pub use error::RollingError;

#[cfg(test)]
mod test_data;

/// Re-export commonly used types.
pub mod prelude {
    pub use super::{
        RollingConfig, RollingCovarianceEstimator, RollingError, RollingFactorRiskModel,
        RollingRiskModel,
    };
}

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod risk_model;
pub use risk_model::{RiskModel, corr_from_cov, vol_from_cov};

mod regressor;
pub use regressor::Regressor;

mod config;
pub use config::{ConfigError, ModelConfig};

mod estimator;
pub use estimator::EstimatorError;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod backend;
pub use backend::{LinalgBackend, NalgebraBackend, ThinSvd};

mod linalg;
pub use linalg::{RegressionResult, weighted_least_squares};

mod weights;
pub use weights::{half_life_weights, normalized_half_life_weights};

mod covariance;
pub use covariance::{weighted_covariance, weighted_variance};

mod error;
pub use error::MathError;

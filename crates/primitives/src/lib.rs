#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod frame;
pub use frame::Frame;

mod series;
pub use series::Series;

mod label;
pub use label::Label;

mod error;
pub use error::FrameError;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

/// Table indexed by date: instrument returns, factor returns, residual returns.
pub type TimeFrame = Frame<Date>;

/// Table indexed by string labels: factor exposures, covariance matrices.
pub type LabelFrame = Frame<String>;

/// Per-date instrument validity flags.
pub type Validity = Frame<Date, bool>;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use statrisk_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use statrisk_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use statrisk_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use statrisk_model as model;
#[cfg(feature = "rolling")]
#[doc(inline)]
pub use statrisk_rolling as rolling;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use statrisk_utils as utils;

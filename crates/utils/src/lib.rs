#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/statrisk-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod format;
pub use format::TableFormat;

mod convert;
pub use convert::{INDEX_COLUMN, dataframe_to_frame, frame_to_dataframe};

mod io;
pub use io::{read_frame, read_json, table_path, write_frame, write_json};

mod error;
pub use error::UtilsError;

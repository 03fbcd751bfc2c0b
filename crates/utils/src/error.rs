//! Error types for persistence utilities.

use statrisk_primitives::FrameError;

/// Errors that can occur while converting or persisting tables.
#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    /// Polars error.
    #[error("polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// File system error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Labeled table error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Missing column.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Column label reserved for row labels.
    #[error("column name is reserved for row labels: {0}")]
    ReservedColumn(String),

    /// Null row label.
    #[error("null label in column: {0}")]
    NullLabel(String),

    /// Row label that does not parse.
    #[error("invalid label: {0}")]
    InvalidLabel(String),

    /// Unknown table format name.
    #[error("unknown table format: {0}")]
    UnknownFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = UtilsError::UnknownFormat("xlsx".to_string());
        assert_eq!(err.to_string(), "unknown table format: xlsx");

        let err = UtilsError::InvalidLabel("2016-13-01".to_string());
        assert!(err.to_string().contains("2016-13-01"));
    }
}

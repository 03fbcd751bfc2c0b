//! Error types for labeled tables.

/// Errors that can occur when building or slicing labeled tables.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Label count does not match the value shape.
    #[error("shape mismatch on {axis}: expected {expected} labels, got {actual}")]
    ShapeMismatch {
        /// Axis name ("index" or "columns").
        axis: &'static str,
        /// Expected number of labels.
        expected: usize,
        /// Actual number of labels.
        actual: usize,
    },

    /// The same column label appears twice.
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    /// Requested column does not exist.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// Requested row range is outside the table.
    #[error("row range {start}..{end} out of bounds for {len} rows")]
    RowOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Number of rows.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FrameError::ShapeMismatch { axis: "columns", expected: 4, actual: 3 };
        assert_eq!(err.to_string(), "shape mismatch on columns: expected 4 labels, got 3");

        let err = FrameError::RowOutOfBounds { start: 5, end: 12, len: 10 };
        assert!(err.to_string().contains("5..12"));
    }
}

//! Labeled vectors.

use ndarray::Array1;

use crate::FrameError;

/// A vector of values keyed by instrument (or factor) label.
///
/// Used for volatilities, specific variances and per-instrument weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    index: Vec<String>,
    values: Array1<f64>,
}

impl Series {
    /// Create a new series.
    ///
    /// # Errors
    /// Returns `FrameError::ShapeMismatch` if the label count differs from
    /// the number of values.
    pub fn new(index: Vec<String>, values: Array1<f64>) -> Result<Self, FrameError> {
        if index.len() != values.len() {
            return Err(FrameError::ShapeMismatch {
                axis: "index",
                expected: values.len(),
                actual: index.len(),
            });
        }
        Ok(Self { index, values })
    }

    /// Create a series with the same value for every label.
    #[must_use]
    pub fn constant(index: Vec<String>, value: f64) -> Self {
        let values = Array1::from_elem(index.len(), value);
        Self { index, values }
    }

    /// Labels.
    #[must_use]
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Values.
    #[must_use]
    pub const fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Get the value for a specific label.
    #[must_use]
    pub fn get(&self, label: &str) -> Option<f64> {
        self.index.iter().position(|s| s == label).map(|i| self.values[i])
    }

    /// Decompose into `(index, values)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Array1<f64>) {
        (self.index, self.values)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn series_get() {
        let vol =
            Series::new(vec!["AAPL".to_string(), "GOOG".to_string()], array![0.2, 0.3]).unwrap();

        assert_eq!(vol.get("AAPL"), Some(0.2));
        assert_eq!(vol.get("GOOG"), Some(0.3));
        assert_eq!(vol.get("MSFT"), None);
    }

    #[test]
    fn series_length_mismatch() {
        assert!(Series::new(vec!["A".to_string()], array![0.1, 0.2]).is_err());
    }

    #[test]
    fn series_constant() {
        let vol = Series::constant(vec!["A".to_string(), "B".to_string()], 0.2);
        assert_eq!(vol.len(), 2);
        assert!(!vol.is_empty());
        assert_eq!(vol.get("B"), Some(0.2));
    }
}

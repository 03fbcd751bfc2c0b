//! Labeled two-dimensional tables.

use std::{collections::HashSet, ops::Range};

use ndarray::{Array2, ArrayView1, Axis, s};

use crate::{FrameError, Label};

/// A matrix with labeled rows and named columns.
///
/// Rows are typically dates (returns, residuals) or factor names (exposures),
/// columns are instrument identifiers or factor names. Column labels are
/// unique; the row order is whatever the caller supplies.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<R, V = f64> {
    index: Vec<R>,
    columns: Vec<String>,
    values: Array2<V>,
}

impl<R: Label, V: Clone> Frame<R, V> {
    /// Create a new frame.
    ///
    /// # Errors
    /// Returns `FrameError` if the label counts do not match the value shape or
    /// a column label is repeated.
    pub fn new(index: Vec<R>, columns: Vec<String>, values: Array2<V>) -> Result<Self, FrameError> {
        if index.len() != values.nrows() {
            return Err(FrameError::ShapeMismatch {
                axis: "index",
                expected: values.nrows(),
                actual: index.len(),
            });
        }
        if columns.len() != values.ncols() {
            return Err(FrameError::ShapeMismatch {
                axis: "columns",
                expected: values.ncols(),
                actual: columns.len(),
            });
        }
        check_unique(&columns)?;

        Ok(Self { index, columns, values })
    }

    /// Row labels.
    #[must_use]
    pub fn index(&self) -> &[R] {
        &self.index
    }

    /// Column labels.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Underlying values.
    #[must_use]
    pub const fn values(&self) -> &Array2<V> {
        &self.values
    }

    /// Number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Check if the frame has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decompose into `(index, columns, values)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<R>, Vec<String>, Array2<V>) {
        (self.index, self.columns, self.values)
    }

    /// Position of a row label.
    #[must_use]
    pub fn row_position(&self, label: &R) -> Option<usize> {
        self.index.iter().position(|r| r == label)
    }

    /// Position of a column label.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Get a single cell by labels.
    #[must_use]
    pub fn get(&self, row: &R, column: &str) -> Option<&V> {
        let i = self.row_position(row)?;
        let j = self.column_position(column)?;
        self.values.get((i, j))
    }

    /// Get a row by label.
    #[must_use]
    pub fn row(&self, label: &R) -> Option<ArrayView1<'_, V>> {
        self.row_position(label).map(|i| self.values.row(i))
    }

    /// Get a column by label.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, V>> {
        self.column_position(name).map(|j| self.values.column(j))
    }

    /// Replace the values, keeping the labels.
    ///
    /// # Errors
    /// Returns `FrameError` if the new values have a different shape.
    pub fn with_values(&self, values: Array2<V>) -> Result<Self, FrameError> {
        Self::new(self.index.clone(), self.columns.clone(), values)
    }

    /// Select a contiguous range of rows by position.
    ///
    /// # Errors
    /// Returns `FrameError::RowOutOfBounds` if the range exceeds the frame.
    pub fn slice_rows(&self, range: Range<usize>) -> Result<Self, FrameError> {
        if range.start > range.end || range.end > self.nrows() {
            return Err(FrameError::RowOutOfBounds {
                start: range.start,
                end: range.end,
                len: self.nrows(),
            });
        }

        Ok(Self {
            index: self.index[range.clone()].to_vec(),
            columns: self.columns.clone(),
            values: self.values.slice(s![range, ..]).to_owned(),
        })
    }

    /// Select columns by label, in the given order.
    ///
    /// # Errors
    /// Returns `FrameError::MissingColumn` if any label is absent.
    pub fn select_columns(&self, names: &[String]) -> Result<Self, FrameError> {
        check_unique(names)?;
        let positions = names
            .iter()
            .map(|name| {
                self.column_position(name).ok_or_else(|| FrameError::MissingColumn(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            index: self.index.clone(),
            columns: names.to_vec(),
            values: self.values.select(Axis(1), &positions),
        })
    }

    /// Conform the columns to `names`, filling absent columns with `fill`.
    ///
    /// # Errors
    /// Returns `FrameError::DuplicateLabel` if `names` repeats a label.
    pub fn reindex_columns(&self, names: &[String], fill: V) -> Result<Self, FrameError> {
        check_unique(names)?;
        let mut values = Array2::from_elem((self.nrows(), names.len()), fill);
        for (j, name) in names.iter().enumerate() {
            if let Some(src) = self.column_position(name) {
                values.column_mut(j).assign(&self.values.column(src));
            }
        }

        Ok(Self { index: self.index.clone(), columns: names.to_vec(), values })
    }
}

impl<R: Label> Frame<R, f64> {
    /// Replace NaN cells with `value`.
    #[must_use]
    pub fn fill_nan(&self, value: f64) -> Self {
        Self {
            index: self.index.clone(),
            columns: self.columns.clone(),
            values: self.values.mapv(|x| if x.is_nan() { value } else { x }),
        }
    }
}

fn check_unique(labels: &[String]) -> Result<(), FrameError> {
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(FrameError::DuplicateLabel(label.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rstest::rstest;

    use super::*;
    use crate::{Date, TimeFrame};

    fn sample() -> TimeFrame {
        let dates = (4..=6).map(|d| Date::from_ymd_opt(2016, 1, d).unwrap()).collect();
        Frame::new(
            dates,
            vec!["A".to_string(), "AAL".to_string(), "AAP".to_string()],
            array![[0.01, 0.02, 0.0], [0.03, f64::NAN, 0.0], [0.05, 0.06, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn frame_rejects_bad_shape() {
        let result = Frame::<String>::new(
            vec!["x".to_string()],
            vec!["A".to_string(), "B".to_string()],
            array![[1.0, 2.0, 3.0]],
        );
        assert!(matches!(result, Err(FrameError::ShapeMismatch { axis: "columns", .. })));
    }

    #[test]
    fn frame_rejects_duplicate_columns() {
        let result = Frame::<String>::new(
            vec!["x".to_string()],
            vec!["A".to_string(), "A".to_string()],
            array![[1.0, 2.0]],
        );
        assert!(matches!(result, Err(FrameError::DuplicateLabel(_))));
    }

    #[test]
    fn frame_lookup() {
        let frame = sample();
        let date = Date::from_ymd_opt(2016, 1, 6).unwrap();
        assert_eq!(frame.row_position(&date), Some(2));
        assert_eq!(frame.get(&date, "AAL"), Some(&0.06));
        assert_eq!(frame.column("A").unwrap().to_vec(), vec![0.01, 0.03, 0.05]);
        assert!(frame.column("AAPL").is_none());
    }

    #[rstest]
    #[case(0..2, 2)]
    #[case(1..3, 2)]
    #[case(2..2, 0)]
    fn frame_slice_rows(#[case] range: Range<usize>, #[case] expected: usize) {
        let frame = sample();
        let sliced = frame.slice_rows(range.clone()).unwrap();
        assert_eq!(sliced.nrows(), expected);
        assert_eq!(sliced.index(), &frame.index()[range]);
    }

    #[test]
    fn frame_slice_rows_out_of_bounds() {
        assert!(sample().slice_rows(1..4).is_err());
    }

    #[test]
    fn frame_select_and_reindex() {
        let frame = sample();
        let selected = frame.select_columns(&["AAP".to_string(), "A".to_string()]).unwrap();
        assert_eq!(selected.columns(), &["AAP".to_string(), "A".to_string()]);
        assert_eq!(selected.values()[[2, 1]], 0.05);

        assert!(frame.select_columns(&["AAPL".to_string()]).is_err());

        let reindexed = frame.reindex_columns(&["AAPL".to_string(), "A".to_string()], 0.0).unwrap();
        assert_eq!(reindexed.column("AAPL").unwrap().to_vec(), vec![0.0, 0.0, 0.0]);
        assert_eq!(reindexed.column("A").unwrap().to_vec(), vec![0.01, 0.03, 0.05]);
    }

    #[test]
    fn frame_fill_nan() {
        let filled = sample().fill_nan(0.0);
        assert!(filled.values().iter().all(|x| x.is_finite()));
        assert_eq!(filled.values()[[1, 1]], 0.0);
    }
}

//! Conversion between labeled frames and polars data frames.

use ndarray::Array2;
use polars::prelude::*;
use statrisk_primitives::{Frame, Label};

use crate::UtilsError;

/// Name of the column holding row labels.
pub const INDEX_COLUMN: &str = "index";

/// Convert a frame into a `DataFrame` with a leading string `index` column.
///
/// # Errors
/// Returns `UtilsError::ReservedColumn` if a frame column is also named
/// `index`.
pub fn frame_to_dataframe<R: Label>(frame: &Frame<R>) -> Result<DataFrame, UtilsError> {
    if frame.column_position(INDEX_COLUMN).is_some() {
        return Err(UtilsError::ReservedColumn(INDEX_COLUMN.to_string()));
    }
    let index: Vec<String> = frame.index().iter().map(ToString::to_string).collect();

    let mut columns = Vec::with_capacity(frame.ncols() + 1);
    columns.push(Column::new(INDEX_COLUMN.into(), index));
    for (name, values) in frame.columns().iter().zip(frame.values().columns()) {
        columns.push(Column::new(name.as_str().into(), values.to_vec()));
    }

    Ok(DataFrame::new(columns)?)
}

/// Convert a `DataFrame` with an `index` column back into a frame.
///
/// Row labels are parsed from their string form. Value columns are cast to
/// `Float64`; nulls become NaN.
///
/// # Errors
/// Returns `UtilsError` if the index column is missing, a label does not
/// parse, or a value column cannot be cast to float.
pub fn dataframe_to_frame<R: Label>(df: &DataFrame) -> Result<Frame<R>, UtilsError> {
    let index_column = df
        .column(INDEX_COLUMN)
        .map_err(|_| UtilsError::MissingColumn(INDEX_COLUMN.to_string()))?
        .cast(&DataType::String)?;
    let index = index_column
        .str()?
        .into_iter()
        .map(|label| {
            let label = label.ok_or_else(|| UtilsError::NullLabel(INDEX_COLUMN.to_string()))?;
            label.parse::<R>().map_err(|_| UtilsError::InvalidLabel(label.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.as_str() != INDEX_COLUMN)
        .map(ToString::to_string)
        .collect();

    let mut values = Array2::from_elem((df.height(), names.len()), f64::NAN);
    for (j, name) in names.iter().enumerate() {
        let column = df.column(name)?.cast(&DataType::Float64)?;
        for (i, value) in column.f64()?.into_iter().enumerate() {
            values[[i, j]] = value.unwrap_or(f64::NAN);
        }
    }

    Ok(Frame::new(index, names, values)?)
}

//! Table and sidecar file IO.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use polars::prelude::*;
use serde::{Serialize, de::DeserializeOwned};
use statrisk_primitives::{Frame, Label};
use tracing::debug;

use crate::{TableFormat, UtilsError, dataframe_to_frame, frame_to_dataframe};

/// Path of table `name` inside `dir` for the given format.
#[must_use]
pub fn table_path(dir: &Path, name: &str, format: TableFormat) -> PathBuf {
    dir.join(format!("{name}.{}", format.extension()))
}

/// Write a frame to `path`.
///
/// # Errors
/// Returns `UtilsError` if the file cannot be created or encoding fails.
pub fn write_frame<R: Label>(
    frame: &Frame<R>,
    path: &Path,
    format: TableFormat,
) -> Result<(), UtilsError> {
    let mut df = frame_to_dataframe(frame)?;
    let mut file = File::create(path)?;
    match format {
        TableFormat::Csv => CsvWriter::new(&mut file).include_header(true).finish(&mut df)?,
        TableFormat::Parquet => {
            ParquetWriter::new(&mut file).finish(&mut df)?;
        }
    }
    debug!(
        path = %path.display(),
        %format,
        rows = frame.nrows(),
        cols = frame.ncols(),
        "wrote table"
    );
    Ok(())
}

/// Read a frame previously written with [`write_frame`].
///
/// # Errors
/// Returns `UtilsError` if the file cannot be read or decoded.
pub fn read_frame<R: Label>(path: &Path, format: TableFormat) -> Result<Frame<R>, UtilsError> {
    let df = match format {
        TableFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?,
        TableFormat::Parquet => ParquetReader::new(File::open(path)?).finish()?,
    };
    debug!(path = %path.display(), %format, rows = df.height(), "read table");
    dataframe_to_frame(&df)
}

/// Write a value as pretty-printed JSON.
///
/// # Errors
/// Returns `UtilsError` if the file cannot be created or serialization fails.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), UtilsError> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Read a JSON value.
///
/// # Errors
/// Returns `UtilsError` if the file cannot be opened or deserialization fails.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, UtilsError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ndarray::array;
    use rstest::rstest;
    use statrisk_primitives::{Date, LabelFrame, TimeFrame};

    use super::*;

    fn returns() -> TimeFrame {
        TimeFrame::new(
            (4..=6).map(|d| Date::from_ymd_opt(2016, 1, d).unwrap()).collect(),
            vec!["A".to_string(), "AAL".to_string(), "AAP".to_string()],
            array![
                [0.1234567890123456, -1.0e-12, 0.0],
                [f64::NAN, 3.0e8, 0.0],
                [-0.000_001, 1.0 / 3.0, 0.0]
            ],
        )
        .unwrap()
    }

    #[rstest]
    #[case(TableFormat::Csv)]
    #[case(TableFormat::Parquet)]
    fn frame_round_trip(#[case] format: TableFormat) {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), "returns", format);
        let frame = returns();

        write_frame(&frame, &path, format).unwrap();
        let restored: TimeFrame = read_frame(&path, format).unwrap();

        assert_eq!(restored.index(), frame.index());
        assert_eq!(restored.columns(), frame.columns());
        for (a, b) in restored.values().iter().zip(frame.values().iter()) {
            assert!(a == b || (a.is_nan() && b.is_nan()), "{a} != {b}");
        }
    }

    #[rstest]
    #[case(TableFormat::Csv)]
    #[case(TableFormat::Parquet)]
    fn label_frame_round_trip(#[case] format: TableFormat) {
        let dir = tempfile::tempdir().unwrap();
        let path = table_path(dir.path(), "exposures", format);
        let frame = LabelFrame::new(
            vec!["factor_1".to_string(), "factor_2".to_string()],
            vec!["A".to_string(), "B".to_string()],
            array![[-0.15454215, -0.22795166], [0.00706732, 0.08354979]],
        )
        .unwrap();

        write_frame(&frame, &path, format).unwrap();
        let restored: LabelFrame = read_frame(&path, format).unwrap();
        assert_eq!(restored, frame);
    }

    #[test]
    fn table_path_has_extension() {
        let path = table_path(Path::new("/tmp/model"), "factor_returns", TableFormat::Parquet);
        assert_eq!(path, PathBuf::from("/tmp/model/factor_returns.parquet"));
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.json");
        let value: BTreeMap<String, usize> = [("window".to_string(), 5)].into_iter().collect();

        write_json(&value, &path).unwrap();
        let restored: BTreeMap<String, usize> = read_json(&path).unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<TimeFrame, _> =
            read_frame(&dir.path().join("absent.parquet"), TableFormat::Parquet);
        assert!(matches!(result, Err(UtilsError::Io(_))));
    }
}

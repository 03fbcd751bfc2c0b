//! On-disk table formats.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::UtilsError;

/// File format used to persist tables.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    /// Comma separated values with a header row.
    #[default]
    #[display("csv")]
    Csv,
    /// Apache Parquet.
    #[display("parquet")]
    Parquet,
}

impl TableFormat {
    /// File extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

impl FromStr for TableFormat {
    type Err = UtilsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(UtilsError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("csv", TableFormat::Csv)]
    #[case("Parquet", TableFormat::Parquet)]
    fn parse_format(#[case] input: &str, #[case] expected: TableFormat) {
        assert_eq!(input.parse::<TableFormat>().unwrap(), expected);
    }

    #[test]
    fn unknown_format() {
        assert!(matches!("xlsx".parse::<TableFormat>(), Err(UtilsError::UnknownFormat(_))));
    }

    #[test]
    fn display_matches_extension() {
        assert_eq!(TableFormat::Parquet.to_string(), TableFormat::Parquet.extension());
        assert_eq!(TableFormat::default().to_string(), "csv");
    }
}

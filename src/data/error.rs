//! Pipeline error types.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Coarse classification of pipeline failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input table is missing columns or carries unusable cells.
    Schema,
    /// A rate computation hit a zero denominator.
    Division,
    /// The requested year range is inverted or outside the data.
    Range,
    /// The source could not be read or parsed at all.
    Io,
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Missing or non-numeric value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },
    #[error("Negative {column} count {value} at row {row}")]
    NegativeCount {
        column: String,
        row: usize,
        value: i64,
    },
    #[error("Fractional {column} count {value} at row {row}")]
    FractionalCount {
        column: String,
        row: usize,
        value: f64,
    },
    /// Summed counts for `scope` exceed the `u64` range.
    #[error("{column} total for {scope} overflows")]
    CountOverflow { column: String, scope: String },
    #[error("Data source contains no rows")]
    EmptyDataset,
    /// `scope` names the clinic, and the year when the failure is row-level.
    #[error("Zero births for {scope}, mortality rate is undefined")]
    ZeroBirths { scope: String },
    #[error("Invalid year range: start {start} is after end {end}")]
    InvertedRange { start: i32, end: i32 },
    #[error("Year range {start}-{end} lies outside the data span {min}-{max}")]
    RangeOutOfBounds {
        start: i32,
        end: i32,
        min: i32,
        max: i32,
    },
    #[error("No records to filter")]
    NoRecords,
}

impl DataError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::Csv(_) => ErrorKind::Io,
            DataError::MissingColumn(_)
            | DataError::MissingValue { .. }
            | DataError::NegativeCount { .. }
            | DataError::FractionalCount { .. }
            | DataError::CountOverflow { .. }
            | DataError::EmptyDataset => ErrorKind::Schema,
            DataError::ZeroBirths { .. } => ErrorKind::Division,
            DataError::InvertedRange { .. }
            | DataError::RangeOutOfBounds { .. }
            | DataError::NoRecords => ErrorKind::Range,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_births_message() {
        let err = DataError::ZeroBirths {
            scope: "Clinic 1 in 1843".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Zero births for Clinic 1 in 1843, mortality rate is undefined"
        );
        assert_eq!(err.kind(), ErrorKind::Division);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            DataError::MissingColumn("Deaths".into()).kind(),
            ErrorKind::Schema
        );
        assert_eq!(DataError::EmptyDataset.kind(), ErrorKind::Schema);
        assert_eq!(
            DataError::CountOverflow {
                column: "Birth".into(),
                scope: "Clinic 1".into()
            }
            .kind(),
            ErrorKind::Schema
        );
        assert_eq!(
            DataError::InvertedRange { start: 2, end: 1 }.kind(),
            ErrorKind::Range
        );
        assert_eq!(
            DataError::RangeOutOfBounds {
                start: 1900,
                end: 1910,
                min: 1841,
                max: 1846
            }
            .kind(),
            ErrorKind::Range
        );
    }

    #[test]
    fn test_out_of_bounds_message() {
        let err = DataError::RangeOutOfBounds {
            start: 1900,
            end: 1910,
            min: 1841,
            max: 1846,
        };
        assert_eq!(
            err.to_string(),
            "Year range 1900-1910 lies outside the data span 1841-1846"
        );
    }
}

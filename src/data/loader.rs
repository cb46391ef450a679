//! CSV Data Loader Module
//! Reads the yearly clinic table with Polars, checks the schema, renames the
//! columns and derives the per-row mortality rate.

use super::error::{DataError, Result};
use super::model::{Dataset, YearlyRecord};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

/// Source column names and the names they are normalized to.
pub const COLUMN_MAP: [(&str, &str); 4] = [
    ("Year", "year"),
    ("Birth", "births"),
    ("Deaths", "deaths"),
    ("Clinic", "clinic"),
];

/// Turns a CSV source into an immutable [`Dataset`].
pub struct DataLoader;

impl DataLoader {
    /// Load and validate a CSV file using Polars.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        tracing::debug!("Reading {}", path.display());

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        let dataset = Self::from_dataframe(&df)?;
        let span = dataset.year_span();
        tracing::info!(
            "Loaded {} rows for {} clinics ({}) from {}",
            dataset.len(),
            dataset.clinics().len(),
            span,
            path.display()
        );
        Ok(dataset)
    }

    /// Normalize an already parsed table.
    ///
    /// Output records carry the renamed fields (`year`, `births`, `deaths`,
    /// `clinic`) and a derived `mortality_rate`. Every row must have all four
    /// source columns filled; any zero-birth row fails the whole load.
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset> {
        Self::check_schema(df)?;
        if df.height() == 0 {
            return Err(DataError::EmptyDataset);
        }
        Self::check_whole_numbers(df)?;

        let normalized = df
            .clone()
            .lazy()
            .select(
                COLUMN_MAP
                    .iter()
                    .map(|(source, target)| {
                        let dtype = if *target == "clinic" {
                            DataType::String
                        } else {
                            DataType::Int64
                        };
                        col(*source).cast(dtype).alias(*target)
                    })
                    .collect::<Vec<_>>(),
            )
            .collect()?;

        let years = normalized.column("year")?.as_materialized_series().i64()?;
        let births = normalized.column("births")?.as_materialized_series().i64()?;
        let deaths = normalized.column("deaths")?.as_materialized_series().i64()?;
        let clinics = normalized.column("clinic")?.as_materialized_series().str()?;

        let mut records = Vec::with_capacity(normalized.height());
        for i in 0..normalized.height() {
            let row = i + 1;

            let year = years
                .get(i)
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| Self::missing("Year", row))?;
            let clinic = clinics
                .get(i)
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| Self::missing("Clinic", row))?;
            let birth_count = Self::count(births.get(i), "Birth", row)?;
            let death_count = Self::count(deaths.get(i), "Deaths", row)?;

            if death_count > birth_count {
                tracing::warn!(
                    "{} {}: deaths ({}) exceed births ({})",
                    clinic,
                    year,
                    death_count,
                    birth_count
                );
            }

            records.push(YearlyRecord::new(year, clinic, birth_count, death_count)?);
        }

        for (clinic, year) in Self::duplicate_pairs(&records) {
            tracing::warn!("{} {} appears more than once, totals count it twice", clinic, year);
        }

        Dataset::from_records(records)
    }

    /// (clinic, year) pairs seen more than once, reported once each.
    pub fn duplicate_pairs(records: &[YearlyRecord]) -> Vec<(&str, i32)> {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();
        for r in records {
            let key = (r.clinic.as_str(), r.year);
            if !seen.insert(key) && !repeated.contains(&key) {
                repeated.push(key);
            }
        }
        repeated
    }

    fn check_schema(df: &DataFrame) -> Result<()> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for (source, _) in COLUMN_MAP {
            if !names.iter().any(|n| n == source) {
                return Err(DataError::MissingColumn(source.to_string()));
            }
        }
        Ok(())
    }

    /// Float columns are only accepted when every value is integral; the
    /// integer cast below would otherwise truncate silently.
    fn check_whole_numbers(df: &DataFrame) -> Result<()> {
        for (source, target) in COLUMN_MAP {
            if target == "clinic" {
                continue;
            }
            let column = df.column(source)?;
            if !column.dtype().is_float() {
                continue;
            }
            let values = column.as_materialized_series().cast(&DataType::Float64)?;
            for (i, value) in values.f64()?.into_iter().enumerate() {
                if let Some(value) = value.filter(|v| v.fract() != 0.0) {
                    return Err(DataError::FractionalCount {
                        column: source.to_string(),
                        row: i + 1,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    fn count(value: Option<i64>, column: &str, row: usize) -> Result<u64> {
        let value = value.ok_or_else(|| Self::missing(column, row))?;
        u64::try_from(value).map_err(|_| DataError::NegativeCount {
            column: column.to_string(),
            row,
            value,
        })
    }

    fn missing(column: &str, row: usize) -> DataError {
        DataError::MissingValue {
            column: column.to_string(),
            row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::ErrorKind;
    use crate::data::fixtures::CANONICAL_CSV;
    use crate::data::YearRange;
    use std::fs;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("clinics.csv");
        fs::write(&path, contents).expect("write csv");
        path
    }

    #[test]
    fn test_load_canonical() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, CANONICAL_CSV);

        let dataset = DataLoader::load_csv(&path).expect("load");
        assert_eq!(dataset.len(), 12);
        assert_eq!(dataset.year_span(), YearRange::new(1841, 1846).unwrap());
        assert_eq!(dataset.clinics(), vec!["Clinic 1", "Clinic 2"]);

        let first = &dataset.records()[0];
        assert_eq!(first.year, 1841);
        assert_eq!(first.clinic, "Clinic 1");
        assert_eq!(first.births, 3036);
        assert_eq!(first.deaths, 237);
        assert!((first.mortality_rate - 237.0 / 3036.0).abs() < 1e-12);
    }

    #[test]
    fn test_every_row_has_rate() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, CANONICAL_CSV);

        let dataset = DataLoader::load_csv(&path).expect("load");
        for r in dataset.records() {
            assert!((r.mortality_rate - r.deaths as f64 / r.births as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_deaths_column() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "Year,Birth,Clinic\n1841,3036,Clinic 1\n");

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(matches!(err, DataError::MissingColumn(ref c) if c == "Deaths"));
    }

    #[test]
    fn test_zero_births_fails_load() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(
            &dir,
            "Year,Birth,Deaths,Clinic\n1841,3036,237,Clinic 1\n1842,0,0,Clinic 2\n",
        );

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Division);
        assert!(err.to_string().contains("Clinic 2 in 1842"));
    }

    #[test]
    fn test_missing_value() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(
            &dir,
            "Year,Birth,Deaths,Clinic\n1841,3036,237,Clinic 1\n1842,,518,Clinic 1\n",
        );

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(matches!(
            err,
            DataError::MissingValue { ref column, row: 2 } if column == "Birth"
        ));
    }

    #[test]
    fn test_negative_count() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "Year,Birth,Deaths,Clinic\n1841,3036,-4,Clinic 1\n");

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert!(matches!(err, DataError::NegativeCount { value: -4, .. }));
    }

    #[test]
    fn test_extra_columns_and_order() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(
            &dir,
            "Clinic,Note,Deaths,Year,Birth\nClinic 1,x,10,1850,100\nClinic 2,y,5,1851,50\n",
        );

        let dataset = DataLoader::load_csv(&path).expect("load");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].clinic, "Clinic 2");
        assert_eq!(dataset.records()[1].year, 1851);
        assert!((dataset.records()[1].mortality_rate - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_deaths_above_births_accepted() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "Year,Birth,Deaths,Clinic\n1841,10,12,Clinic 1\n");

        let dataset = DataLoader::load_csv(&path).expect("load");
        assert!((dataset.records()[0].mortality_rate - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_count_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(
            &dir,
            "Year,Birth,Deaths,Clinic\n1841,3036,237,Clinic 1\n1842,3036.9,237.8,Clinic 1\n",
        );

        let err = DataLoader::load_csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert!(matches!(
            err,
            DataError::FractionalCount { ref column, row: 2, .. } if column == "Birth"
        ));
    }

    #[test]
    fn test_integral_floats_accepted() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, "Year,Birth,Deaths,Clinic\n1841,3036.0,237,Clinic 1\n");

        let dataset = DataLoader::load_csv(&path).expect("load");
        assert_eq!(dataset.records()[0].births, 3036);
    }

    #[test]
    fn test_duplicate_pairs_accepted_and_reported() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(
            &dir,
            "Year,Birth,Deaths,Clinic\n\
             1841,100,10,Clinic 1\n\
             1841,100,12,Clinic 1\n\
             1841,100,5,Clinic 2\n\
             1841,100,11,Clinic 1\n",
        );

        let dataset = DataLoader::load_csv(&path).expect("load");
        assert_eq!(dataset.len(), 4);
        assert_eq!(
            DataLoader::duplicate_pairs(dataset.records()),
            vec![("Clinic 1", 1841)]
        );
    }

    #[test]
    fn test_canonical_has_no_duplicates() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_csv(&dir, CANONICAL_CSV);

        let dataset = DataLoader::load_csv(&path).expect("load");
        assert!(DataLoader::duplicate_pairs(dataset.records()).is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().expect("tempdir");
        let err = DataLoader::load_csv(dir.path().join("nope.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}

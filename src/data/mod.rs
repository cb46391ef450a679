//! Data module - CSV loading, record types and range filtering

mod error;
mod loader;
mod model;
mod processor;

pub use error::{DataError, ErrorKind};
pub use loader::DataLoader;
pub use model::{ClinicSummary, Dataset, YearRange, YearlyRecord};
pub use processor::DataProcessor;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Dataset, YearlyRecord};

    pub const CANONICAL_CSV: &str = include_str!("../../data/yearly_deaths_by_clinic.csv");

    /// Parse the bundled CSV without going through Polars.
    pub fn canonical_records() -> Vec<YearlyRecord> {
        CANONICAL_CSV
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let fields: Vec<&str> = line.split(',').collect();
                YearlyRecord::new(
                    fields[0].parse().unwrap(),
                    fields[3],
                    fields[1].parse().unwrap(),
                    fields[2].parse().unwrap(),
                )
                .unwrap()
            })
            .collect()
    }

    pub fn canonical_dataset() -> Dataset {
        Dataset::from_records(canonical_records()).unwrap()
    }
}

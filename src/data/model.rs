//! Record types shared by the loader, processor and calculator.

use super::error::{DataError, Result};
use serde::Serialize;

/// One row per (clinic, year) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyRecord {
    pub year: i32,
    pub clinic: String,
    pub births: u64,
    pub deaths: u64,
    pub mortality_rate: f64,
}

impl YearlyRecord {
    /// Build a record, deriving `mortality_rate` from the counts.
    pub fn new(year: i32, clinic: impl Into<String>, births: u64, deaths: u64) -> Result<Self> {
        let clinic = clinic.into();
        if births == 0 {
            return Err(DataError::ZeroBirths {
                scope: format!("{} in {}", clinic, year),
            });
        }

        Ok(Self {
            year,
            clinic,
            births,
            deaths,
            mortality_rate: deaths as f64 / births as f64,
        })
    }
}

/// Aggregate over the selected years for one clinic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicSummary {
    pub clinic: String,
    pub total_births: u64,
    pub total_deaths: u64,
    pub mortality_rate: f64,
}

/// Inclusive closed interval of years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            return Err(DataError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(year: i32) -> Self {
        Self {
            start: year,
            end: year,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year <= self.end
    }

    pub fn overlaps(&self, other: &YearRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Clamp both ends into `span`. A range wholly outside `span` collapses
    /// onto the nearest edge.
    pub fn clamp_to(&self, span: &YearRange) -> YearRange {
        let start = self.start.clamp(span.start, span.end);
        let end = self.end.clamp(span.start, span.end);
        YearRange { start, end }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}–{}", self.start, self.end)
    }
}

/// The loaded table. Built once by the loader and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<YearlyRecord>,
    span: YearRange,
}

impl Dataset {
    /// Wrap already validated records. Fails on an empty table since the
    /// year span would be undefined.
    pub fn from_records(records: Vec<YearlyRecord>) -> Result<Self> {
        let min = records.iter().map(|r| r.year).min();
        let max = records.iter().map(|r| r.year).max();
        let (Some(min), Some(max)) = (min, max) else {
            return Err(DataError::EmptyDataset);
        };

        Ok(Self {
            records,
            span: YearRange {
                start: min,
                end: max,
            },
        })
    }

    pub fn records(&self) -> &[YearlyRecord] {
        &self.records
    }

    /// Observed `[min_year, max_year]`.
    pub fn year_span(&self) -> YearRange {
        self.span
    }

    /// Distinct clinics in order of first appearance.
    pub fn clinics(&self) -> Vec<String> {
        let mut clinics: Vec<String> = Vec::new();
        for record in &self.records {
            if !clinics.iter().any(|c| c == &record.clinic) {
                clinics.push(record.clinic.clone());
            }
        }
        clinics
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

//! Statistics Calculator Module
//! Aggregates yearly records into per-clinic totals and assembles the
//! complete result of one pipeline run.

use crate::data::{
    ClinicSummary, DataError, DataProcessor, Dataset, YearRange, YearlyRecord,
};
use anyhow::Context;
use serde::Serialize;
use std::path::Path;

/// Everything the presentation layer needs for one selected range.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub range: YearRange,
    pub records: Vec<YearlyRecord>,
    pub summaries: Vec<ClinicSummary>,
}

impl DashboardView {
    /// Write the view as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize view")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Exported {} to {}", self.range, path.display());
        Ok(())
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// One summary per distinct clinic, in order of first appearance.
    ///
    /// The rate is recomputed from the summed counts, so years with more
    /// births weigh more than in a plain mean of the yearly rates.
    pub fn summarize_by_clinic(records: &[YearlyRecord]) -> Result<Vec<ClinicSummary>, DataError> {
        let mut totals: Vec<(String, u64, u64)> = Vec::new();

        for record in records {
            match totals.iter_mut().find(|(clinic, _, _)| clinic == &record.clinic) {
                Some((clinic, births, deaths)) => {
                    *births = Self::add_count(*births, record.births, "Birth", clinic)?;
                    *deaths = Self::add_count(*deaths, record.deaths, "Deaths", clinic)?;
                }
                None => totals.push((record.clinic.clone(), record.births, record.deaths)),
            }
        }

        totals
            .into_iter()
            .map(|(clinic, total_births, total_deaths)| {
                if total_births == 0 {
                    return Err(DataError::ZeroBirths { scope: clinic });
                }
                Ok(ClinicSummary {
                    mortality_rate: total_deaths as f64 / total_births as f64,
                    clinic,
                    total_births,
                    total_deaths,
                })
            })
            .collect()
    }

    fn add_count(total: u64, value: u64, column: &str, clinic: &str) -> Result<u64, DataError> {
        total
            .checked_add(value)
            .ok_or_else(|| DataError::CountOverflow {
                column: column.to_string(),
                scope: clinic.to_string(),
            })
    }

    /// Filter then summarize. Either both succeed or nothing is returned.
    pub fn build_view(dataset: &Dataset, range: YearRange) -> Result<DashboardView, DataError> {
        let records = DataProcessor::filter_by_year_range(dataset.records(), range)?;
        let summaries = Self::summarize_by_clinic(&records)?;

        tracing::debug!(
            "Built view for {}: {} rows, {} clinics",
            range,
            records.len(),
            summaries.len()
        );

        Ok(DashboardView {
            range,
            records,
            summaries,
        })
    }
}

//! Data Processor Module
//! Year range filtering over loaded records.

use super::error::{DataError, Result};
use super::model::{YearRange, YearlyRecord};

/// The 1841-1846 window before hand disinfection was introduced.
pub const PRE_HANDWASHING: (i32, i32) = (1841, 1846);

/// Handles record selection operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Observed year span of `records`, or `None` when there are none.
    pub fn year_span(records: &[YearlyRecord]) -> Option<YearRange> {
        let min = records.iter().map(|r| r.year).min()?;
        let max = records.iter().map(|r| r.year).max()?;
        YearRange::new(min, max).ok()
    }

    /// Keep the records whose year falls inside `range`, in their original order.
    ///
    /// A range that only partly overlaps the observed span returns the rows in
    /// the overlap. A range with no overlap at all is an error rather than an
    /// empty result.
    pub fn filter_by_year_range(
        records: &[YearlyRecord],
        range: YearRange,
    ) -> Result<Vec<YearlyRecord>> {
        let span = Self::year_span(records).ok_or(DataError::NoRecords)?;
        if !range.overlaps(&span) {
            return Err(DataError::RangeOutOfBounds {
                start: range.start(),
                end: range.end(),
                min: span.start(),
                max: span.end(),
            });
        }

        Ok(records
            .iter()
            .filter(|r| range.contains(r.year))
            .cloned()
            .collect())
    }

    /// Initial selection: the pre-handwashing window clamped to `span`, or the
    /// whole span when the window lies outside it.
    pub fn default_range(span: YearRange) -> YearRange {
        let (start, end) = PRE_HANDWASHING;
        let window = YearRange::new(start, end).unwrap_or(span);
        if window.overlaps(&span) {
            window.clamp_to(&span)
        } else {
            span
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::error::ErrorKind;
    use crate::data::fixtures::canonical_records;

    #[test]
    fn test_filter_returns_only_matching_rows_in_order() {
        let records = canonical_records();
        let range = YearRange::new(1842, 1844).unwrap();

        let filtered = DataProcessor::filter_by_year_range(&records, range).unwrap();
        let expected: Vec<YearlyRecord> = records
            .iter()
            .filter(|r| (1842..=1844).contains(&r.year))
            .cloned()
            .collect();

        assert_eq!(filtered, expected);
        assert_eq!(filtered.len(), 6);
        assert!(filtered.iter().all(|r| range.contains(r.year)));
        // Clinic 1 rows precede Clinic 2 rows as in the source.
        assert_eq!(filtered[0].clinic, "Clinic 1");
        assert_eq!(filtered[3].clinic, "Clinic 2");
    }

    #[test]
    fn test_filter_every_valid_range() {
        let records = canonical_records();
        for start in 1841..=1846 {
            for end in start..=1846 {
                let range = YearRange::new(start, end).unwrap();
                let filtered = DataProcessor::filter_by_year_range(&records, range).unwrap();
                let expected = records.iter().filter(|r| range.contains(r.year)).count();
                assert_eq!(filtered.len(), expected, "range {}", range);
                assert!(filtered.iter().all(|r| start <= r.year && r.year <= end));
            }
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let records = canonical_records();
        let range = YearRange::new(1843, 1845).unwrap();

        let once = DataProcessor::filter_by_year_range(&records, range).unwrap();
        let twice = DataProcessor::filter_by_year_range(&once, range).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_single_year_boundary() {
        let records = canonical_records();
        let filtered =
            DataProcessor::filter_by_year_range(&records, YearRange::single(1841)).unwrap();

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|r| r.year == 1841));
    }

    #[test]
    fn test_partial_overlap_keeps_overlap() {
        let records = canonical_records();
        let range = YearRange::new(1830, 1842).unwrap();

        let filtered = DataProcessor::filter_by_year_range(&records, range).unwrap();
        assert_eq!(filtered.len(), 4);
    }

    #[test]
    fn test_disjoint_range_is_error() {
        let records = canonical_records();
        let err = DataProcessor::filter_by_year_range(&records, YearRange::new(1900, 1910).unwrap())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(matches!(
            err,
            DataError::RangeOutOfBounds {
                min: 1841,
                max: 1846,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_records_is_error() {
        let err = DataProcessor::filter_by_year_range(&[], YearRange::single(1841)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
    }

    #[test]
    fn test_default_range() {
        let span = YearRange::new(1841, 1849).unwrap();
        assert_eq!(
            DataProcessor::default_range(span),
            YearRange::new(1841, 1846).unwrap()
        );

        let late = YearRange::new(1844, 1860).unwrap();
        assert_eq!(
            DataProcessor::default_range(late),
            YearRange::new(1844, 1846).unwrap()
        );

        let modern = YearRange::new(1990, 2000).unwrap();
        assert_eq!(DataProcessor::default_range(modern), modern);
    }
}

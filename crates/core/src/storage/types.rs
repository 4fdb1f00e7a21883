use chrono::NaiveDate;

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates the April-to-March range for the financial year beginning in
    /// `start_year` (e.g. 2024 covers 2024-04-01 through 2025-03-31).
    pub fn financial_year(start_year: i32) -> Self {
        let start = NaiveDate::from_ymd_opt(start_year, 4, 1)
            .expect("April 1st exists in every year");
        let end = NaiveDate::from_ymd_opt(start_year + 1, 3, 31)
            .expect("March 31st exists in every year");

        Self { start, end }
    }

    /// The first date after the range, for exclusive upper-bound queries
    /// against datetime columns stored as ISO-8601 text.
    pub fn end_exclusive(&self) -> NaiveDate {
        self.end.succ_opt().expect("date range end is not NaiveDate::MAX")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_range_construction() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let range = DateRange::new(start, end).unwrap();

        assert_eq!(range.start, start);
        assert_eq!(range.end, end);
    }

    #[test]
    fn test_same_day_range_is_valid() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let range = DateRange::new(date, date).unwrap();

        assert_eq!(range.start, date);
        assert_eq!(range.end, date);
    }

    #[test]
    fn test_invalid_range_returns_error() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let result = DateRange::new(start, end);

        assert_eq!(result, Err(DateRangeError::InvalidRange));
    }

    #[test]
    fn test_financial_year_factory() {
        let range = DateRange::financial_year(2024);

        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_end_exclusive_crosses_month_boundary() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();

        assert_eq!(
            range.end_exclusive(),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}

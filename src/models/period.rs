//! Payroll period model.
//!
//! A [`Period`] is a validated (year, month) pair together with the first and
//! last calendar day it covers.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{EngineError, EngineResult};

/// Represents one payroll cycle: a calendar month of a four-digit year.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Period;
/// use chrono::NaiveDate;
///
/// let period = Period::new(2024, 2).unwrap();
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
///
/// assert!(Period::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Period {
    /// Smallest accepted year.
    pub const MIN_YEAR: i32 = 1000;
    /// Largest accepted year.
    pub const MAX_YEAR: i32 = 9999;

    /// Validates a year/month pair.
    ///
    /// # Returns
    ///
    /// Returns `InvalidPeriod` if the year is not a four-digit year or the
    /// month is outside 1..=12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = |message: &str| EngineError::InvalidPeriod {
            year,
            month,
            message: message.to_string(),
        };

        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(invalid("year must have four digits"));
        }
        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 1 and 12"));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| invalid("no such calendar month"))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| invalid("no such calendar month"))?;

        Ok(Self {
            year,
            month,
            first_day,
            last_day,
        })
    }

    /// The year of the period.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the period (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// First calendar day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// Last calendar day of the month.
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Checks if a date falls inside the month, both ends inclusive.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_march_bounds() {
        let period = Period::new(2024, 3).unwrap();
        assert_eq!(period.first_day(), date(2024, 3, 1));
        assert_eq!(period.last_day(), date(2024, 3, 31));
    }

    #[test]
    fn test_february_non_leap_year() {
        let period = Period::new(2023, 2).unwrap();
        assert_eq!(period.last_day(), date(2023, 2, 28));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let period = Period::new(2024, 12).unwrap();
        assert_eq!(period.last_day(), date(2024, 12, 31));
    }

    #[test]
    fn test_contains_first_and_last_day() {
        let period = Period::new(2024, 3).unwrap();
        assert!(period.contains_date(date(2024, 3, 1)));
        assert!(period.contains_date(date(2024, 3, 31)));
    }

    #[test]
    fn test_excludes_adjacent_days() {
        let period = Period::new(2024, 3).unwrap();
        assert!(!period.contains_date(date(2024, 2, 29)));
        assert!(!period.contains_date(date(2024, 4, 1)));
        assert!(!period.contains_date(date(2023, 3, 15)));
    }

    #[test]
    fn test_month_zero_is_invalid() {
        match Period::new(2024, 0) {
            Err(EngineError::InvalidPeriod { month, .. }) => assert_eq!(month, 0),
            other => panic!("Expected InvalidPeriod, got {:?}", other),
        }
    }

    #[test]
    fn test_three_digit_year_is_invalid() {
        assert!(Period::new(999, 5).is_err());
        assert!(Period::new(10000, 5).is_err());
    }

    #[test]
    fn test_display_pads_month() {
        assert_eq!(Period::new(2024, 3).unwrap().to_string(), "2024-03");
    }
}

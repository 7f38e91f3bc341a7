//! Extra-hours scoping.
//!
//! Sums the hours of the ledger entries that fall inside a period.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{ExtraHoursEntry, Period};

/// Total extra hours worked within `period`.
///
/// Entries dated outside the period are ignored, so callers may pass a ledger
/// result that is wider than the month. The first and last day of the month
/// are included. A sum beyond the range of `Decimal` is a
/// [`EngineError::CalculationError`].
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::total_extra_hours;
/// use payroll_engine::models::{ExtraHoursEntry, Period, Rut};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let rut = Rut::parse("1-9").unwrap();
/// let entry = |id, day, hours| ExtraHoursEntry {
///     id,
///     rut: rut.clone(),
///     date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
///     num_extra_hours: Decimal::from(hours),
/// };
///
/// let period = Period::new(2024, 3).unwrap();
/// let total = total_extra_hours(&[entry(1, 5, 4), entry(2, 20, 6)], &period).unwrap();
/// assert_eq!(total, Decimal::from(10));
/// ```
pub fn total_extra_hours(entries: &[ExtraHoursEntry], period: &Period) -> EngineResult<Decimal> {
    entries
        .iter()
        .filter(|e| period.contains_date(e.date))
        .try_fold(Decimal::ZERO, |total, e| {
            total
                .checked_add(e.num_extra_hours)
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!("extra hours of {} overflow in {}", e.rut, period),
                })
        })
}

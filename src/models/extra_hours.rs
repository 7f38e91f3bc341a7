//! Extra-hours ledger entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::Rut;

/// Extra hours worked by one employee on one date.
///
/// Several entries may exist for the same employee and month; the calculator
/// sums them.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ExtraHoursEntry, Rut};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let entry = ExtraHoursEntry {
///     id: 1,
///     rut: Rut::parse("12.345.678-5").unwrap(),
///     date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
///     num_extra_hours: Decimal::from(4),
/// };
/// assert!(entry.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraHoursEntry {
    /// Ledger-assigned identifier.
    pub id: u64,
    /// The employee who worked the hours.
    pub rut: Rut,
    /// The date the hours were worked.
    pub date: NaiveDate,
    /// Number of extra hours, may be fractional.
    pub num_extra_hours: Decimal,
}

impl ExtraHoursEntry {
    /// Checks that the entry carries a positive number of hours.
    pub fn validate(&self) -> EngineResult<()> {
        validate_hours(self.num_extra_hours)
    }
}

/// An extra-hours entry that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExtraHours {
    /// The employee who worked the hours.
    pub rut: Rut,
    /// The date the hours were worked.
    pub date: NaiveDate,
    /// Number of extra hours.
    pub num_extra_hours: Decimal,
}

impl NewExtraHours {
    /// Checks the same rules as [`ExtraHoursEntry::validate`].
    pub fn validate(&self) -> EngineResult<()> {
        validate_hours(self.num_extra_hours)
    }

    /// Attaches an identifier.
    pub fn with_id(self, id: u64) -> ExtraHoursEntry {
        ExtraHoursEntry {
            id,
            rut: self.rut,
            date: self.date,
            num_extra_hours: self.num_extra_hours,
        }
    }
}

fn validate_hours(hours: Decimal) -> EngineResult<()> {
    if hours <= Decimal::ZERO {
        return Err(EngineError::InvalidExtraHours {
            field: "numExtraHours".to_string(),
            message: format!("must be positive, got {}", hours),
        });
    }
    Ok(())
}

//! Paycheck model.
//!
//! A [`Paycheck`] is the persisted result of calculating one employee's pay
//! for one period. Its total is always derived from its components; there is
//! no way to build or deserialize a paycheck whose total does not add up.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{Period, Rut};

/// Natural key of a paycheck: (employee rut, year, month).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaycheckKey {
    /// The employee.
    pub rut: Rut,
    /// Period year.
    pub year: i32,
    /// Period month.
    pub month: u32,
}

impl PaycheckKey {
    /// Builds the key for an employee and period.
    pub fn new(rut: Rut, period: Period) -> Self {
        Self {
            rut,
            year: period.year(),
            month: period.month(),
        }
    }
}

/// The monetary components of a paycheck, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayComponents {
    /// Base salary copied from the employee at calculation time.
    pub monthly_salary: i64,
    /// Category-dependent bonus.
    pub salary_bonus: i64,
    /// Per-child bonus.
    pub children_bonus: i64,
    /// Bonus for extra hours worked in the period.
    pub extra_hours_bonus: i64,
}

impl PayComponents {
    /// Sums the components, failing on a negative component or overflow.
    fn checked_total(&self) -> Result<i64, String> {
        let parts = [
            ("monthlySalary", self.monthly_salary),
            ("salaryBonus", self.salary_bonus),
            ("childrenBonus", self.children_bonus),
            ("extraHoursBonus", self.extra_hours_bonus),
        ];

        let mut total: i64 = 0;
        for (name, value) in parts {
            if value < 0 {
                return Err(format!("{} is negative ({})", name, value));
            }
            total = total
                .checked_add(value)
                .ok_or_else(|| "totalSalary overflows".to_string())?;
        }
        Ok(total)
    }
}

/// A calculated paycheck.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayComponents, Paycheck, Period, Rut};
///
/// let paycheck = Paycheck::new(
///     Rut::parse("12.345.678-5").unwrap(),
///     Period::new(2024, 3).unwrap(),
///     PayComponents {
///         monthly_salary: 1_000_000,
///         salary_bonus: 150_000,
///         children_bonus: 50_000,
///         extra_hours_bonus: 83_333,
///     },
/// )
/// .unwrap();
///
/// assert_eq!(paycheck.total_salary(), 1_283_333);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PaycheckRecord")]
pub struct Paycheck {
    rut: Rut,
    year: i32,
    month: u32,
    monthly_salary: i64,
    salary_bonus: i64,
    children_bonus: i64,
    extra_hours_bonus: i64,
    total_salary: i64,
}

impl Paycheck {
    /// Builds a paycheck, deriving `totalSalary` from the components.
    ///
    /// # Returns
    ///
    /// Returns `ConsistencyViolation` if any component is negative or the
    /// total does not fit in an `i64`.
    pub fn new(rut: Rut, period: Period, components: PayComponents) -> EngineResult<Self> {
        let total_salary =
            components
                .checked_total()
                .map_err(|message| EngineError::ConsistencyViolation {
                    rut: rut.to_string(),
                    message,
                })?;

        Ok(Self {
            rut,
            year: period.year(),
            month: period.month(),
            monthly_salary: components.monthly_salary,
            salary_bonus: components.salary_bonus,
            children_bonus: components.children_bonus,
            extra_hours_bonus: components.extra_hours_bonus,
            total_salary,
        })
    }

    /// The natural key of this paycheck.
    pub fn key(&self) -> PaycheckKey {
        PaycheckKey {
            rut: self.rut.clone(),
            year: self.year,
            month: self.month,
        }
    }

    /// The employee.
    pub fn rut(&self) -> &Rut {
        &self.rut
    }

    /// Period year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Period month.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Base salary at calculation time.
    pub fn monthly_salary(&self) -> i64 {
        self.monthly_salary
    }

    /// Category bonus.
    pub fn salary_bonus(&self) -> i64 {
        self.salary_bonus
    }

    /// Children bonus.
    pub fn children_bonus(&self) -> i64 {
        self.children_bonus
    }

    /// Extra-hours bonus.
    pub fn extra_hours_bonus(&self) -> i64 {
        self.extra_hours_bonus
    }

    /// Sum of all components.
    pub fn total_salary(&self) -> i64 {
        self.total_salary
    }

    /// The components this paycheck was built from.
    pub fn components(&self) -> PayComponents {
        PayComponents {
            monthly_salary: self.monthly_salary,
            salary_bonus: self.salary_bonus,
            children_bonus: self.children_bonus,
            extra_hours_bonus: self.extra_hours_bonus,
        }
    }
}

/// Wire form of a paycheck, re-validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaycheckRecord {
    rut: Rut,
    year: i32,
    month: u32,
    monthly_salary: i64,
    salary_bonus: i64,
    children_bonus: i64,
    extra_hours_bonus: i64,
    total_salary: i64,
}

impl TryFrom<PaycheckRecord> for Paycheck {
    type Error = EngineError;

    fn try_from(record: PaycheckRecord) -> Result<Self, Self::Error> {
        let period = Period::new(record.year, record.month)?;
        let paycheck = Paycheck::new(
            record.rut,
            period,
            PayComponents {
                monthly_salary: record.monthly_salary,
                salary_bonus: record.salary_bonus,
                children_bonus: record.children_bonus,
                extra_hours_bonus: record.extra_hours_bonus,
            },
        )?;

        if paycheck.total_salary != record.total_salary {
            return Err(EngineError::ConsistencyViolation {
                rut: paycheck.rut.to_string(),
                message: format!(
                    "totalSalary {} does not equal the sum of its components {}",
                    record.total_salary, paycheck.total_salary
                ),
            });
        }

        Ok(paycheck)
    }
}

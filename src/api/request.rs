//! Request types for the Payroll Engine API.
//!
//! Bodies carry the rut and category as plain strings so that a bad value
//! surfaces as a typed engine error instead of a generic JSON rejection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Category, Employee, ExtraHoursEntry, NewEmployee, NewExtraHours, Period, Rut,
};

/// Body of `POST` and `PUT /api/v1/employees/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    /// Required on update, ignored on create.
    #[serde(default)]
    pub id: Option<u64>,
    /// National identifier, dotted or plain.
    pub rut: String,
    /// Full name.
    pub name: String,
    /// Monthly base salary.
    pub salary: i64,
    /// Number of dependent children.
    #[serde(default)]
    pub children: u32,
    /// `A`, `B` or `C`.
    pub category: String,
}

impl EmployeeRequest {
    /// Parses the body into an employee to create.
    pub fn into_new_employee(self) -> EngineResult<NewEmployee> {
        let employee = NewEmployee {
            rut: Rut::parse(&self.rut)?,
            category: self.category.parse::<Category>()?,
            name: self.name,
            salary: self.salary,
            children: self.children,
        };
        employee.validate()?;
        Ok(employee)
    }

    /// Parses the body into a full employee record for an update.
    pub fn into_employee(self) -> EngineResult<Employee> {
        let id = self.id.ok_or_else(|| EngineError::InvalidEmployee {
            field: "id".to_string(),
            message: "required for update".to_string(),
        })?;
        Ok(self.into_new_employee()?.with_id(id))
    }
}

/// Body of `POST` and `PUT /api/v1/extraHours/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraHoursRequest {
    /// Required on update, ignored on create.
    #[serde(default)]
    pub id: Option<u64>,
    /// The employee who worked the hours.
    pub rut: String,
    /// Date worked.
    pub date: NaiveDate,
    /// Number of extra hours.
    pub num_extra_hours: Decimal,
}

impl ExtraHoursRequest {
    /// Parses the body into an entry to create.
    pub fn into_new_entry(self) -> EngineResult<NewExtraHours> {
        let entry = NewExtraHours {
            rut: Rut::parse(&self.rut)?,
            date: self.date,
            num_extra_hours: self.num_extra_hours,
        };
        entry.validate()?;
        Ok(entry)
    }

    /// Parses the body into a full entry for an update.
    pub fn into_entry(self) -> EngineResult<ExtraHoursEntry> {
        let id = self.id.ok_or_else(|| EngineError::InvalidExtraHours {
            field: "id".to_string(),
            message: "required for update".to_string(),
        })?;
        Ok(self.into_new_entry()?.with_id(id))
    }
}

/// Query of `GET /api/v1/paycheck/calculate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalculateQuery {
    /// Period year.
    pub year: i32,
    /// Period month (1-12).
    pub month: u32,
}

/// Query of `GET /api/v1/paycheck/`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaycheckListQuery {
    /// Restrict to one year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Restrict to one month of `year`.
    #[serde(default)]
    pub month: Option<u32>,
}

/// Which paychecks a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaycheckScope {
    /// Every stored paycheck.
    All,
    /// One calendar year.
    Year(i32),
    /// One period.
    Period(Period),
}

impl PaycheckListQuery {
    /// Resolves the filters, rejecting a month without a year.
    pub fn scope(&self) -> EngineResult<PaycheckScope> {
        match (self.year, self.month) {
            (None, None) => Ok(PaycheckScope::All),
            (Some(year), None) => {
                Period::new(year, 1)?;
                Ok(PaycheckScope::Year(year))
            }
            (Some(year), Some(month)) => Ok(PaycheckScope::Period(Period::new(year, month)?)),
            (None, Some(month)) => Err(EngineError::InvalidPeriod {
                year: 0,
                month,
                message: "a month filter requires a year".to_string(),
            }),
        }
    }
}

/// Query of `GET /api/v1/paycheck/report`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReportQuery {
    /// The reported year.
    pub year: i32,
}

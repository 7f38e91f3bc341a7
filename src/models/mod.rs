//! Core data models for the Payroll Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod employee;
mod extra_hours;
mod paycheck;
mod period;
mod report;
mod rut;

pub use calculation_result::{CalculationResult, EmployeeFailure};
pub use employee::{Category, Employee, NewEmployee};
pub use extra_hours::{ExtraHoursEntry, NewExtraHours};
pub use paycheck::{PayComponents, Paycheck, PaycheckKey};
pub use period::Period;
pub use report::{AnnualReport, AnnualReportRow, ChartSeries, MONTH_LABELS};
pub use rut::Rut;

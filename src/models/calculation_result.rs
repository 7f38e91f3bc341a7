//! Calculation result models for the Payroll Engine.
//!
//! This module contains the [`CalculationResult`] returned by a payroll run,
//! listing the paychecks that were persisted and every employee that failed
//! or was never reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, ErrorKind};

use super::{Paycheck, Rut};

/// One employee that could not be paid in a run.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{EngineError, ErrorKind};
/// use payroll_engine::models::{EmployeeFailure, Rut};
///
/// let rut = Rut::parse("1-9").unwrap();
/// let failure = EmployeeFailure::from_error(
///     rut,
///     &EngineError::LookupFailure {
///         rut: "1-9".to_string(),
///         message: "ledger offline".to_string(),
///     },
/// );
/// assert_eq!(failure.kind, ErrorKind::Lookup);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeFailure {
    /// The employee.
    pub rut: Rut,
    /// Which class of failure stopped the employee.
    pub kind: ErrorKind,
    /// Human-readable cause.
    pub reason: String,
}

impl EmployeeFailure {
    /// Records an engine error against an employee.
    pub fn from_error(rut: Rut, error: &EngineError) -> Self {
        Self {
            rut,
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

/// The outcome of calculating paychecks for one period.
///
/// A run is best-effort: employees that succeed are persisted and listed in
/// `paychecks`, the rest appear in `failures` or, when the batch ran out of
/// time, in `unprocessed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Unique identifier of this run.
    pub calculation_id: Uuid,
    /// When the run finished.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the run.
    pub engine_version: String,
    /// Period year.
    pub year: i32,
    /// Period month.
    pub month: u32,
    /// Persisted paychecks, ordered by rut.
    pub paychecks: Vec<Paycheck>,
    /// Employees that failed, ordered by rut.
    pub failures: Vec<EmployeeFailure>,
    /// Employees not reached before the batch timed out, ordered by rut.
    pub unprocessed: Vec<Rut>,
    /// Whether the batch hit its time limit.
    pub timed_out: bool,
    /// Wall-clock duration of the run in microseconds.
    pub duration_us: u64,
}

impl CalculationResult {
    /// True when every employee in the roster got a paycheck.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.unprocessed.is_empty()
    }

    /// Finds the paycheck of one employee.
    pub fn paycheck_for(&self, rut: &Rut) -> Option<&Paycheck> {
        self.paychecks.iter().find(|p| p.rut() == rut)
    }
}

//! Storage boundaries of the Payroll Engine.
//!
//! The calculator reads employees and extra hours through [`EmployeeRoster`]
//! and [`ExtraHoursLedger`], and writes its results through
//! [`PaycheckStore`]. The [`memory`] module provides in-process
//! implementations of all three.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{Employee, ExtraHoursEntry, NewEmployee, NewExtraHours, Paycheck, Rut};

pub use memory::{InMemoryEmployeeRoster, InMemoryExtraHoursLedger, InMemoryPaycheckStore};

/// Keyed store of employee records.
#[async_trait]
pub trait EmployeeRoster: Send + Sync {
    /// Every employee, ordered by id.
    async fn list(&self) -> EngineResult<Vec<Employee>>;
    /// One employee by id.
    async fn get(&self, id: u64) -> EngineResult<Option<Employee>>;
    /// One employee by rut.
    async fn find_by_rut(&self, rut: &Rut) -> EngineResult<Option<Employee>>;
    /// Adds an employee and assigns its id. Fails on a duplicate rut.
    async fn create(&self, employee: NewEmployee) -> EngineResult<Employee>;
    /// Replaces an existing employee.
    async fn update(&self, employee: Employee) -> EngineResult<Employee>;
    /// Removes an employee; returns false if there was none.
    async fn delete(&self, id: u64) -> EngineResult<bool>;
}

/// Keyed store of dated extra-hour entries.
#[async_trait]
pub trait ExtraHoursLedger: Send + Sync {
    /// Every entry, ordered by id.
    async fn list(&self) -> EngineResult<Vec<ExtraHoursEntry>>;
    /// One entry by id.
    async fn get(&self, id: u64) -> EngineResult<Option<ExtraHoursEntry>>;
    /// Adds an entry and assigns its id.
    async fn create(&self, entry: NewExtraHours) -> EngineResult<ExtraHoursEntry>;
    /// Replaces an existing entry.
    async fn update(&self, entry: ExtraHoursEntry) -> EngineResult<ExtraHoursEntry>;
    /// Removes an entry; returns false if there was none.
    async fn delete(&self, id: u64) -> EngineResult<bool>;
    /// Entries of one employee dated within `from..=to`.
    async fn entries_between(
        &self,
        rut: &Rut,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ExtraHoursEntry>>;
}

/// What an upsert did to the row at its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    /// No row existed for the key.
    Inserted,
    /// A different row was replaced.
    Replaced,
    /// An identical row was already stored.
    Unchanged,
}

/// Persistence of paychecks keyed by (rut, year, month).
///
/// Implementations must make `upsert` atomic per key: a concurrent reader or
/// writer sees either the old row or the new row, never a mix of fields.
#[async_trait]
pub trait PaycheckStore: Send + Sync {
    /// Inserts the paycheck, or replaces every field of the row with the same key.
    async fn upsert(&self, paycheck: Paycheck) -> EngineResult<UpsertOutcome>;
    /// Paychecks of one period, ordered by rut.
    async fn list_by_period(&self, year: i32, month: u32) -> EngineResult<Vec<Paycheck>>;
    /// Paychecks of one year, ordered by (month, rut).
    async fn list_by_year(&self, year: i32) -> EngineResult<Vec<Paycheck>>;
    /// Every paycheck, ordered by (year, month, rut).
    async fn list_all(&self) -> EngineResult<Vec<Paycheck>>;
}

//! In-process implementations of the storage traits.
//!
//! Each store keeps its records behind a `tokio::sync::RwLock`. Locks are
//! held for a single operation only, so a paycheck upsert is atomic for its
//! key without serialising a whole calculation run.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, ExtraHoursEntry, NewEmployee, NewExtraHours, Paycheck, PaycheckKey, Rut,
};

use super::{EmployeeRoster, ExtraHoursLedger, PaycheckStore, UpsertOutcome};

#[derive(Debug)]
struct Table<T> {
    last_id: u64,
    rows: BTreeMap<u64, T>,
}

// Derived `Default` would require `T: Default`, which rows do not implement.
impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Employee roster held in memory.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeRoster {
    table: RwLock<Table<Employee>>,
}

impl InMemoryEmployeeRoster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }
}

fn ensure_unique_rut(table: &Table<Employee>, rut: &Rut, except_id: Option<u64>) -> EngineResult<()> {
    let taken = table
        .rows
        .values()
        .any(|e| &e.rut == rut && Some(e.id) != except_id);
    if taken {
        return Err(EngineError::DuplicateRut {
            rut: rut.to_string(),
        });
    }
    Ok(())
}

#[async_trait]
impl EmployeeRoster for InMemoryEmployeeRoster {
    async fn list(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: u64) -> EngineResult<Option<Employee>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_rut(&self, rut: &Rut) -> EngineResult<Option<Employee>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|e| &e.rut == rut)
            .cloned())
    }

    async fn create(&self, employee: NewEmployee) -> EngineResult<Employee> {
        employee.validate()?;
        let mut table = self.table.write().await;
        ensure_unique_rut(&table, &employee.rut, None)?;

        let employee = employee.with_id(table.next_id());
        table.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update(&self, employee: Employee) -> EngineResult<Employee> {
        employee.validate()?;
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&employee.id) {
            return Err(EngineError::NotFound {
                resource: "Employee",
                id: employee.id,
            });
        }
        ensure_unique_rut(&table, &employee.rut, Some(employee.id))?;

        table.rows.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn delete(&self, id: u64) -> EngineResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

/// Extra-hours ledger held in memory.
#[derive(Debug, Default)]
pub struct InMemoryExtraHoursLedger {
    table: RwLock<Table<ExtraHoursEntry>>,
}

impl InMemoryExtraHoursLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExtraHoursLedger for InMemoryExtraHoursLedger {
    async fn list(&self) -> EngineResult<Vec<ExtraHoursEntry>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: u64) -> EngineResult<Option<ExtraHoursEntry>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn create(&self, entry: NewExtraHours) -> EngineResult<ExtraHoursEntry> {
        entry.validate()?;
        let mut table = self.table.write().await;
        let entry = entry.with_id(table.next_id());
        table.rows.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn update(&self, entry: ExtraHoursEntry) -> EngineResult<ExtraHoursEntry> {
        entry.validate()?;
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&entry.id) {
            return Err(EngineError::NotFound {
                resource: "ExtraHours",
                id: entry.id,
            });
        }
        table.rows.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn delete(&self, id: u64) -> EngineResult<bool> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn entries_between(
        &self,
        rut: &Rut,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ExtraHoursEntry>> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|e| &e.rut == rut && e.date >= from && e.date <= to)
            .cloned()
            .collect())
    }
}

/// Paycheck store held in memory.
#[derive(Debug, Default)]
pub struct InMemoryPaycheckStore {
    rows: RwLock<HashMap<PaycheckKey, Paycheck>>,
}

impl InMemoryPaycheckStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored paychecks.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// True when nothing has been stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    async fn collect_sorted<F>(&self, filter: F) -> Vec<Paycheck>
    where
        F: Fn(&Paycheck) -> bool,
    {
        let mut paychecks: Vec<Paycheck> = self
            .rows
            .read()
            .await
            .values()
            .filter(|p| filter(p))
            .cloned()
            .collect();
        paychecks.sort_by(|a, b| {
            (a.year(), a.month(), a.rut()).cmp(&(b.year(), b.month(), b.rut()))
        });
        paychecks
    }
}

#[async_trait]
impl PaycheckStore for InMemoryPaycheckStore {
    async fn upsert(&self, paycheck: Paycheck) -> EngineResult<UpsertOutcome> {
        let key = paycheck.key();
        let mut rows = self.rows.write().await;
        let outcome = match rows.get(&key) {
            None => UpsertOutcome::Inserted,
            Some(existing) if existing == &paycheck => UpsertOutcome::Unchanged,
            Some(_) => UpsertOutcome::Replaced,
        };
        rows.insert(key, paycheck);
        Ok(outcome)
    }

    async fn list_by_period(&self, year: i32, month: u32) -> EngineResult<Vec<Paycheck>> {
        Ok(self
            .collect_sorted(|p| p.year() == year && p.month() == month)
            .await)
    }

    async fn list_by_year(&self, year: i32) -> EngineResult<Vec<Paycheck>> {
        Ok(self.collect_sorted(|p| p.year() == year).await)
    }

    async fn list_all(&self) -> EngineResult<Vec<Paycheck>> {
        Ok(self.collect_sorted(|_| true).await)
    }
}

//! Paycheck calculation for a whole payroll period.
//!
//! [`PaycheckCalculator::calculate`] runs a best-effort batch: every employee
//! is processed independently on a bounded worker pool, successes are
//! persisted through the [`PaycheckStore`], and failures are collected
//! instead of aborting the run.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    CalculationResult, Employee, EmployeeFailure, PayComponents, Paycheck, Period, Rut,
};
use crate::store::{EmployeeRoster, ExtraHoursLedger, PaycheckStore, UpsertOutcome};

use super::bonus_policy::BonusPolicy;
use super::extra_hours::total_extra_hours;

/// Computes and persists the paychecks of a period.
///
/// The calculator only reads the roster and the ledger; the paycheck store is
/// its only write target. Cloning is cheap and shares the collaborators.
#[derive(Clone)]
pub struct PaycheckCalculator {
    roster: Arc<dyn EmployeeRoster>,
    ledger: Arc<dyn ExtraHoursLedger>,
    store: Arc<dyn PaycheckStore>,
    policy: Arc<dyn BonusPolicy>,
    settings: EngineSettings,
}

impl PaycheckCalculator {
    /// Creates a calculator over the given collaborators.
    pub fn new(
        roster: Arc<dyn EmployeeRoster>,
        ledger: Arc<dyn ExtraHoursLedger>,
        store: Arc<dyn PaycheckStore>,
        policy: Arc<dyn BonusPolicy>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            roster,
            ledger,
            store,
            policy,
            settings,
        }
    }

    /// Calculates and upserts the paycheck of every employee for `year`/`month`.
    ///
    /// # Returns
    ///
    /// Returns `Err` only when the period is invalid (checked before any
    /// store access) or the roster cannot be listed. Otherwise returns a
    /// [`CalculationResult`] naming the persisted paychecks, the failed
    /// employees and, if the batch timed out, the employees never reached.
    ///
    /// Re-running the same period overwrites the previous rows, so an
    /// unchanged roster and ledger produce identical paychecks.
    pub async fn calculate(&self, year: i32, month: u32) -> EngineResult<CalculationResult> {
        let started = Instant::now();
        let period = Period::new(year, month)?;

        let employees = self.roster.list().await.map_err(|err| {
            error!(period = %period, error = %err, "Employee roster unavailable");
            EngineError::RosterUnavailable {
                message: err.to_string(),
            }
        })?;
        info!(
            period = %period,
            employees = employees.len(),
            workers = self.settings.workers,
            "Starting paycheck calculation"
        );

        let deadline = tokio::time::Instant::now() + self.settings.batch_timeout();
        let permits = Arc::new(Semaphore::new(self.settings.workers.max(1)));
        let mut pending: BTreeSet<Rut> = BTreeSet::new();
        let mut tasks = JoinSet::new();

        for employee in employees {
            pending.insert(employee.rut.clone());
            let worker = self.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                let outcome = worker.run_worker(&employee, &period, permits).await;
                (employee.rut, outcome)
            });
        }

        let mut paychecks = Vec::new();
        let mut failures = Vec::new();
        let mut timed_out = false;

        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok((rut, outcome)))) => {
                    pending.remove(&rut);
                    record(rut, outcome, &mut paychecks, &mut failures);
                }
                Ok(Some(Err(join_error))) => {
                    error!(period = %period, error = %join_error, "Paycheck worker terminated");
                }
                Ok(None) => break,
                Err(_) => {
                    timed_out = true;
                    warn!(
                        period = %period,
                        remaining = pending.len(),
                        "Paycheck calculation timed out"
                    );
                    tasks.abort_all();
                    // Workers that finished before the abort still report.
                    while let Some(joined) = tasks.join_next().await {
                        if let Ok((rut, outcome)) = joined {
                            pending.remove(&rut);
                            record(rut, outcome, &mut paychecks, &mut failures);
                        }
                    }
                    break;
                }
            }
        }

        let unprocessed: Vec<Rut> = if timed_out {
            pending.into_iter().collect()
        } else {
            for rut in pending {
                failures.push(EmployeeFailure::from_error(
                    rut.clone(),
                    &EngineError::CalculationError {
                        message: format!("worker for {} terminated unexpectedly", rut),
                    },
                ));
            }
            Vec::new()
        };

        paychecks.sort_by(|a, b| a.rut().cmp(b.rut()));
        failures.sort_by(|a, b| a.rut.cmp(&b.rut));

        let duration = started.elapsed();
        info!(
            period = %period,
            succeeded = paychecks.len(),
            failed = failures.len(),
            unprocessed = unprocessed.len(),
            timed_out,
            duration_us = duration.as_micros(),
            "Paycheck calculation finished"
        );

        Ok(CalculationResult {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            year: period.year(),
            month: period.month(),
            paychecks,
            failures,
            unprocessed,
            timed_out,
            duration_us: duration.as_micros() as u64,
        })
    }

    /// Waits for a pool slot, then processes one employee.
    async fn run_worker(
        &self,
        employee: &Employee,
        period: &Period,
        permits: Arc<Semaphore>,
    ) -> EngineResult<Paycheck> {
        let _permit = permits
            .acquire_owned()
            .await
            .map_err(|_| EngineError::CalculationError {
                message: "worker pool closed".to_string(),
            })?;
        self.process_employee(employee, period).await
    }

    /// Computes and persists one employee's paycheck.
    async fn process_employee(&self, employee: &Employee, period: &Period) -> EngineResult<Paycheck> {
        employee.validate()?;

        let entries = self
            .ledger
            .entries_between(&employee.rut, period.first_day(), period.last_day())
            .await
            .map_err(|err| match err {
                EngineError::LookupFailure { .. } => err,
                other => EngineError::LookupFailure {
                    rut: employee.rut.to_string(),
                    message: other.to_string(),
                },
            })?;
        let hours = total_extra_hours(&entries, period)?;

        let components = PayComponents {
            monthly_salary: employee.salary,
            salary_bonus: self.policy.salary_bonus(employee.category, employee.salary)?,
            children_bonus: self.policy.children_bonus(employee.children)?,
            extra_hours_bonus: self.policy.extra_hours_bonus(employee.salary, hours)?,
        };

        let paycheck = Paycheck::new(employee.rut.clone(), *period, components).inspect_err(|err| {
            error!(
                rut = %employee.rut,
                period = %period,
                error = %err,
                "Computed paycheck violates the total salary invariant"
            );
        })?;

        let outcome = self.upsert_with_retry(&paycheck).await?;
        debug!(
            rut = %employee.rut,
            period = %period,
            extra_hours = %hours,
            total_salary = paycheck.total_salary(),
            outcome = ?outcome,
            "Paycheck stored"
        );
        Ok(paycheck)
    }

    /// Upserts a paycheck, retrying with linear backoff.
    async fn upsert_with_retry(&self, paycheck: &Paycheck) -> EngineResult<UpsertOutcome> {
        let attempts = self.settings.upsert_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.store.upsert(paycheck.clone()).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) if attempt < attempts => {
                    warn!(
                        rut = %paycheck.rut(),
                        attempt,
                        error = %err,
                        "Paycheck upsert failed, retrying"
                    );
                    tokio::time::sleep(self.settings.retry_delay(attempt)).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(EngineError::PersistenceFailure {
                        rut: paycheck.rut().to_string(),
                        year: paycheck.year(),
                        month: paycheck.month(),
                        message: format!("{} (after {} attempts)", err, attempts),
                    });
                }
            }
        }
    }
}

fn record(
    rut: Rut,
    outcome: EngineResult<Paycheck>,
    paychecks: &mut Vec<Paycheck>,
    failures: &mut Vec<EmployeeFailure>,
) {
    match outcome {
        Ok(paycheck) => paychecks.push(paycheck),
        Err(err) => {
            warn!(rut = %rut, kind = ?err.kind(), error = %err, "Employee skipped");
            failures.push(EmployeeFailure::from_error(rut, &err));
        }
    }
}

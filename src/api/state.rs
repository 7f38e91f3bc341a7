//! Application state for the Payroll Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::calculation::{PaycheckCalculator, ReportAggregator, TableBonusPolicy};
use crate::config::PayrollConfig;
use crate::store::{
    EmployeeRoster, ExtraHoursLedger, InMemoryEmployeeRoster, InMemoryExtraHoursLedger,
    InMemoryPaycheckStore, PaycheckStore,
};

/// Shared application state.
///
/// Holds the three stores plus the calculator and aggregator wired to them.
/// Cloning shares every component.
#[derive(Clone)]
pub struct AppState {
    roster: Arc<dyn EmployeeRoster>,
    ledger: Arc<dyn ExtraHoursLedger>,
    paychecks: Arc<dyn PaycheckStore>,
    calculator: PaycheckCalculator,
    reports: ReportAggregator,
}

impl AppState {
    /// Wires the given stores to a calculator built from `config`.
    pub fn new(
        config: &PayrollConfig,
        roster: Arc<dyn EmployeeRoster>,
        ledger: Arc<dyn ExtraHoursLedger>,
        paychecks: Arc<dyn PaycheckStore>,
    ) -> Self {
        let policy = Arc::new(TableBonusPolicy::new(config.policy().clone()));
        let calculator = PaycheckCalculator::new(
            roster.clone(),
            ledger.clone(),
            paychecks.clone(),
            policy,
            config.engine().clone(),
        );
        let reports = ReportAggregator::new(paychecks.clone());
        Self {
            roster,
            ledger,
            paychecks,
            calculator,
            reports,
        }
    }

    /// State backed by empty in-memory stores.
    pub fn in_memory(config: &PayrollConfig) -> Self {
        Self::new(
            config,
            Arc::new(InMemoryEmployeeRoster::new()),
            Arc::new(InMemoryExtraHoursLedger::new()),
            Arc::new(InMemoryPaycheckStore::new()),
        )
    }

    /// The employee roster.
    pub fn roster(&self) -> &dyn EmployeeRoster {
        self.roster.as_ref()
    }

    /// The extra-hours ledger.
    pub fn ledger(&self) -> &dyn ExtraHoursLedger {
        self.ledger.as_ref()
    }

    /// The paycheck store.
    pub fn paychecks(&self) -> &dyn PaycheckStore {
        self.paychecks.as_ref()
    }

    /// The period calculator.
    pub fn calculator(&self) -> &PaycheckCalculator {
        &self.calculator
    }

    /// The annual report aggregator.
    pub fn reports(&self) -> &ReportAggregator {
        &self.reports
    }
}

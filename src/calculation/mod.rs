//! Calculation logic for the Payroll Engine.
//!
//! This module contains the bonus policy, the scoping of extra hours to a
//! period, the per-period paycheck calculator and the annual report
//! aggregation.

mod bonus_policy;
mod extra_hours;
mod paycheck_calculator;
mod report;

pub use bonus_policy::{BonusPolicy, TableBonusPolicy};
pub use extra_hours::total_extra_hours;
pub use paycheck_calculator::PaycheckCalculator;
pub use report::{
    ReportAggregator, aggregate_year, chart_series, format_currency, format_decimal_es_cl,
};

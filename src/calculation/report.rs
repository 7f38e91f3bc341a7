//! Annual report aggregation and display formatting.

use std::sync::Arc;

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{AnnualReport, AnnualReportRow, ChartSeries, MONTH_LABELS, Paycheck, Period};
use crate::store::PaycheckStore;

/// Builds annual reports from the persisted paychecks.
#[derive(Clone)]
pub struct ReportAggregator {
    store: Arc<dyn PaycheckStore>,
}

impl ReportAggregator {
    /// Creates an aggregator reading from `store`.
    pub fn new(store: Arc<dyn PaycheckStore>) -> Self {
        Self { store }
    }

    /// Twelve month rows summing every paycheck of `year`.
    ///
    /// Months without paychecks appear as zero rows. The report is derived
    /// on each call and never stored.
    pub async fn annual_report(&self, year: i32) -> EngineResult<AnnualReport> {
        Period::new(year, 1)?;
        let paychecks = self.store.list_by_year(year).await?;
        debug!(year, paychecks = paychecks.len(), "Aggregating annual report");
        aggregate_year(year, &paychecks)
    }
}

/// Sums paychecks into one row per month of `year`.
///
/// Paychecks of other years are ignored. Each row's `total_salary` equals the
/// sum of its four component columns because every paycheck's does. A month
/// whose sums do not fit in an `i64` fails the whole report with
/// [`EngineError::CalculationError`](crate::error::EngineError::CalculationError).
pub fn aggregate_year(year: i32, paychecks: &[Paycheck]) -> EngineResult<AnnualReport> {
    let mut rows: Vec<AnnualReportRow> = MONTH_LABELS
        .iter()
        .zip(1u32..)
        .map(|(label, month)| AnnualReportRow {
            month,
            label: (*label).to_string(),
            ..AnnualReportRow::default()
        })
        .collect();

    for paycheck in paychecks.iter().filter(|p| p.year() == year) {
        let Some(row) = rows.get_mut(paycheck.month() as usize - 1) else {
            continue;
        };
        row.add_row(&AnnualReportRow {
            monthly_salary: paycheck.monthly_salary(),
            salary_bonus: paycheck.salary_bonus(),
            children_bonus: paycheck.children_bonus(),
            extra_hours_bonus: paycheck.extra_hours_bonus(),
            total_salary: paycheck.total_salary(),
            paychecks: 1,
            ..AnnualReportRow::default()
        })?;
    }

    Ok(AnnualReport {
        year,
        rows,
        series: chart_series(),
    })
}

/// The stacked bar series of the annual chart, bottom to top.
pub fn chart_series() -> Vec<ChartSeries> {
    [
        ("monthly_salary", "Monthly Salary"),
        ("salary_bonus", "Salary Bonus"),
        ("extra_hours", "Extra Hours"),
        ("children_bonus", "Children Bonus"),
    ]
    .into_iter()
    .map(|(data_key, label)| ChartSeries {
        data_key: data_key.to_string(),
        label: label.to_string(),
    })
    .collect()
}

/// Formats an amount for chart tooltips: `"$ 1,234,567"`.
pub fn format_currency(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("$ {}{}", sign, group_digits(amount.unsigned_abs(), ','))
}

/// Formats an amount with Chilean digit grouping: `"1.234.567"`.
pub fn format_decimal_es_cl(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!("{}{}", sign, group_digits(amount.unsigned_abs(), '.'))
}

fn group_digits(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

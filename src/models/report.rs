//! Annual report models.
//!
//! An [`AnnualReport`] is derived on demand from the paychecks of a year and
//! is shaped for a bar chart: one row per month plus the series to draw.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Abbreviated month labels used on the chart axis.
pub const MONTH_LABELS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// Paycheck components summed over every employee for one month.
///
/// The chart plots its x-axis from the `month` key, so the label travels
/// under that name and the month number under `month_number`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnualReportRow {
    /// Month number (1-12).
    #[serde(rename = "month_number")]
    pub month: u32,
    /// Axis label, e.g. `"Mar"`.
    #[serde(rename = "month")]
    pub label: String,
    /// Sum of monthly salaries.
    pub monthly_salary: i64,
    /// Sum of salary bonuses.
    pub salary_bonus: i64,
    /// Sum of children bonuses.
    pub children_bonus: i64,
    /// Sum of extra-hours bonuses.
    #[serde(rename = "extra_hours")]
    pub extra_hours_bonus: i64,
    /// Sum of total salaries.
    pub total_salary: i64,
    /// Number of paychecks folded into this row.
    pub paychecks: u32,
}

/// A data series the chart renders from the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Row field the series reads.
    pub data_key: String,
    /// Legend label.
    pub label: String,
}

/// Twelve month rows for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualReport {
    /// The reported year.
    pub year: i32,
    /// One row per month, January first.
    pub rows: Vec<AnnualReportRow>,
    /// Series to plot.
    pub series: Vec<ChartSeries>,
}

impl AnnualReportRow {
    /// Adds the amounts and paycheck count of `other` into this row.
    ///
    /// Fails with [`EngineError::CalculationError`] when a column would
    /// overflow. The row is left unchanged in that case.
    pub fn add_row(&mut self, other: &AnnualReportRow) -> EngineResult<()> {
        let label = &self.label;
        let sum = |column: &str, a: i64, b: i64| {
            a.checked_add(b).ok_or_else(|| EngineError::CalculationError {
                message: format!("{column} overflows in report row '{label}'"),
            })
        };

        let monthly_salary = sum("monthly_salary", self.monthly_salary, other.monthly_salary)?;
        let salary_bonus = sum("salary_bonus", self.salary_bonus, other.salary_bonus)?;
        let children_bonus = sum("children_bonus", self.children_bonus, other.children_bonus)?;
        let extra_hours_bonus = sum(
            "extra_hours",
            self.extra_hours_bonus,
            other.extra_hours_bonus,
        )?;
        let total_salary = sum("total_salary", self.total_salary, other.total_salary)?;
        let paychecks = self.paychecks.checked_add(other.paychecks).ok_or_else(|| {
            EngineError::CalculationError {
                message: format!("paycheck count overflows in report row '{label}'"),
            }
        })?;

        self.monthly_salary = monthly_salary;
        self.salary_bonus = salary_bonus;
        self.children_bonus = children_bonus;
        self.extra_hours_bonus = extra_hours_bonus;
        self.total_salary = total_salary;
        self.paychecks = paychecks;
        Ok(())
    }
}

impl AnnualReport {
    /// Element-wise sum of every row.
    ///
    /// Fails with [`EngineError::CalculationError`] if a yearly column does
    /// not fit in an `i64`.
    pub fn totals(&self) -> EngineResult<AnnualReportRow> {
        self.rows.iter().try_fold(
            AnnualReportRow {
                label: "Total".to_string(),
                ..AnnualReportRow::default()
            },
            |mut acc, row| {
                acc.add_row(row)?;
                Ok(acc)
            },
        )
    }

    /// The row for a month, if the month is in range.
    pub fn row(&self, month: u32) -> Option<&AnnualReportRow> {
        self.rows.iter().find(|r| r.month == month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(month: u32, total: i64) -> AnnualReportRow {
        AnnualReportRow {
            month,
            label: MONTH_LABELS[(month - 1) as usize].to_string(),
            monthly_salary: total,
            total_salary: total,
            paychecks: 1,
            ..AnnualReportRow::default()
        }
    }

    #[test]
    fn test_totals_sum_rows() {
        let report = AnnualReport {
            year: 2024,
            rows: vec![row(1, 100), row(2, 250)],
            series: vec![],
        };
        let totals = report.totals().unwrap();
        assert_eq!(totals.total_salary, 350);
        assert_eq!(totals.paychecks, 2);
        assert_eq!(totals.label, "Total");
    }

    #[test]
    fn test_row_serializes_chart_keys() {
        let json = serde_json::to_value(row(3, 10)).unwrap();
        assert_eq!(json["month"], "Mar");
        assert_eq!(json["month_number"], 3);
        assert!(json.get("label").is_none());
        assert!(json.get("extra_hours").is_some());
        assert!(json.get("monthly_salary").is_some());
    }

    #[test]
    fn test_totals_overflow_is_calculation_error() {
        let report = AnnualReport {
            year: 2024,
            rows: vec![row(1, i64::MAX), row(2, 1)],
            series: vec![],
        };
        assert!(matches!(
            report.totals(),
            Err(EngineError::CalculationError { .. })
        ));
    }

    #[test]
    fn test_add_row_leaves_row_unchanged_on_overflow() {
        let mut acc = row(1, 10);
        acc.salary_bonus = i64::MAX;
        let mut other = row(1, 5);
        other.salary_bonus = 1;

        let before = acc.clone();
        assert!(acc.add_row(&other).is_err());
        assert_eq!(acc, before);
    }

    #[test]
    fn test_row_lookup() {
        let report = AnnualReport {
            year: 2024,
            rows: vec![row(1, 100)],
            series: vec![],
        };
        assert!(report.row(1).is_some());
        assert!(report.row(2).is_none());
    }
}

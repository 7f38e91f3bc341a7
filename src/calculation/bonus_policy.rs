//! Bonus policy.
//!
//! This module maps an employee's category, base salary, children and extra
//! hours to bonus amounts. All rates come from [`BonusPolicyConfig`]; nothing
//! is hardcoded here so tests and deployments can swap the table.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::BonusPolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::Category;

/// Pure functions computing the three bonuses of a paycheck.
///
/// Implementations must be deterministic and free of I/O.
pub trait BonusPolicy: Send + Sync {
    /// Category-dependent salary bonus.
    fn salary_bonus(&self, category: Category, base_salary: i64) -> EngineResult<i64>;

    /// Bonus for dependent children.
    fn children_bonus(&self, children: u32) -> EngineResult<i64>;

    /// Bonus for the extra hours worked in a period.
    fn extra_hours_bonus(&self, base_salary: i64, total_hours: Decimal) -> EngineResult<i64>;
}

/// A [`BonusPolicy`] driven by a configuration table.
///
/// - salary bonus: `base_salary * rate[category]`
/// - children bonus: `per_child * min(children, max_children)`
/// - extra-hours bonus: `base_salary * overtime_multiplier * hours / monthly_hours`
///
/// Amounts are rounded half away from zero to whole currency units.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{BonusPolicy, TableBonusPolicy};
/// use payroll_engine::config::{
///     BonusPolicyConfig, CategoryRates, ChildrenBonusConfig, ExtraHoursConfig,
/// };
/// use payroll_engine::models::Category;
/// use rust_decimal::Decimal;
///
/// let policy = TableBonusPolicy::new(BonusPolicyConfig {
///     salary_bonus_rates: CategoryRates {
///         a: Decimal::new(15, 2),
///         b: Decimal::new(10, 2),
///         c: Decimal::new(5, 2),
///     },
///     children: ChildrenBonusConfig { per_child: 25_000, max_children: None },
///     extra_hours: ExtraHoursConfig {
///         monthly_hours: Decimal::from(180),
///         overtime_multiplier: Decimal::new(15, 1),
///     },
/// });
///
/// assert_eq!(policy.salary_bonus(Category::A, 1_000_000).unwrap(), 150_000);
/// assert_eq!(policy.children_bonus(2).unwrap(), 50_000);
/// assert_eq!(policy.extra_hours_bonus(1_000_000, Decimal::from(10)).unwrap(), 83_333);
/// ```
#[derive(Debug, Clone)]
pub struct TableBonusPolicy {
    config: BonusPolicyConfig,
}

impl TableBonusPolicy {
    /// Creates a policy from a bonus table.
    pub fn new(config: BonusPolicyConfig) -> Self {
        Self { config }
    }

    /// The table this policy reads.
    pub fn config(&self) -> &BonusPolicyConfig {
        &self.config
    }
}

impl BonusPolicy for TableBonusPolicy {
    fn salary_bonus(&self, category: Category, base_salary: i64) -> EngineResult<i64> {
        let rate = self.config.salary_bonus_rates.rate(category);
        let amount = Decimal::from(base_salary)
            .checked_mul(rate)
            .ok_or_else(|| overflow("salary bonus"))?;
        to_currency(amount, "salary bonus")
    }

    fn children_bonus(&self, children: u32) -> EngineResult<i64> {
        let eligible = match self.config.children.max_children {
            Some(cap) => children.min(cap),
            None => children,
        };
        self.config
            .children
            .per_child
            .checked_mul(i64::from(eligible))
            .ok_or_else(|| overflow("children bonus"))
    }

    fn extra_hours_bonus(&self, base_salary: i64, total_hours: Decimal) -> EngineResult<i64> {
        if total_hours.is_zero() {
            return Ok(0);
        }
        let extra = &self.config.extra_hours;
        let amount = Decimal::from(base_salary)
            .checked_mul(extra.overtime_multiplier)
            .and_then(|v| v.checked_mul(total_hours))
            .and_then(|v| v.checked_div(extra.monthly_hours))
            .ok_or_else(|| overflow("extra hours bonus"))?;
        to_currency(amount, "extra hours bonus")
    }
}

/// Rounds to whole currency units, half away from zero.
fn to_currency(amount: Decimal, what: &str) -> EngineResult<i64> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| overflow(what))
}

fn overflow(what: &str) -> EngineError {
    EngineError::CalculationError {
        message: format!("{} does not fit in a currency amount", what),
    }
}

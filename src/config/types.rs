//! Configuration types for payroll calculation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Category;

/// Salary bonus rate per category, as a fraction of the base salary.
///
/// Every category of the closed set must be present in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRates {
    /// Rate for category A.
    #[serde(rename = "A")]
    pub a: Decimal,
    /// Rate for category B.
    #[serde(rename = "B")]
    pub b: Decimal,
    /// Rate for category C.
    #[serde(rename = "C")]
    pub c: Decimal,
}

impl CategoryRates {
    /// Returns the rate for a category.
    pub fn rate(&self, category: Category) -> Decimal {
        match category {
            Category::A => self.a,
            Category::B => self.b,
            Category::C => self.c,
        }
    }
}

/// Children bonus settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildrenBonusConfig {
    /// Fixed amount paid per child.
    pub per_child: i64,
    /// Optional cap on the number of children that earn the bonus.
    #[serde(default)]
    pub max_children: Option<u32>,
}

/// Extra-hours rate derivation.
///
/// The hourly rate is `base_salary / monthly_hours * overtime_multiplier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraHoursConfig {
    /// Ordinary hours in a month, used to derive the hourly rate.
    pub monthly_hours: Decimal,
    /// Premium applied to the hourly rate for extra hours.
    pub overtime_multiplier: Decimal,
}

/// Bonus policy configuration from `bonus_policy.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusPolicyConfig {
    /// Salary bonus rates by category.
    pub salary_bonus_rates: CategoryRates,
    /// Children bonus settings.
    pub children: ChildrenBonusConfig,
    /// Extra-hours settings.
    pub extra_hours: ExtraHoursConfig,
}

impl BonusPolicyConfig {
    /// Rejects values that would produce negative or undefined bonuses.
    pub fn validate(&self) -> EngineResult<()> {
        for category in Category::ALL {
            let rate = self.salary_bonus_rates.rate(category);
            if rate < Decimal::ZERO {
                return Err(invalid(
                    &format!("salary_bonus_rates.{}", category),
                    format!("must not be negative, got {}", rate),
                ));
            }
        }
        if self.children.per_child < 0 {
            return Err(invalid(
                "children.per_child",
                format!("must not be negative, got {}", self.children.per_child),
            ));
        }
        if self.extra_hours.monthly_hours <= Decimal::ZERO {
            return Err(invalid(
                "extra_hours.monthly_hours",
                format!("must be positive, got {}", self.extra_hours.monthly_hours),
            ));
        }
        if self.extra_hours.overtime_multiplier < Decimal::ZERO {
            return Err(invalid(
                "extra_hours.overtime_multiplier",
                format!(
                    "must not be negative, got {}",
                    self.extra_hours.overtime_multiplier
                ),
            ));
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    8
}

fn default_upsert_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    50
}

fn default_batch_timeout_ms() -> u64 {
    30_000
}

/// Batch execution settings from `engine.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Maximum employees processed concurrently.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Attempts per paycheck upsert before the employee is reported failed.
    #[serde(default = "default_upsert_attempts")]
    pub upsert_attempts: u32,
    /// Base delay between upsert attempts; attempt `n` waits `n` times this.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Time limit for a whole calculation run.
    #[serde(default = "default_batch_timeout_ms")]
    pub batch_timeout_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            upsert_attempts: default_upsert_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            batch_timeout_ms: default_batch_timeout_ms(),
        }
    }
}

impl EngineSettings {
    /// Rejects settings that would stall a run.
    pub fn validate(&self) -> EngineResult<()> {
        if self.workers == 0 {
            return Err(invalid("workers", "must be at least 1".to_string()));
        }
        if self.upsert_attempts == 0 {
            return Err(invalid("upsert_attempts", "must be at least 1".to_string()));
        }
        if self.batch_timeout_ms == 0 {
            return Err(invalid("batch_timeout_ms", "must be positive".to_string()));
        }
        Ok(())
    }

    /// Batch time limit.
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollConfig {
    policy: BonusPolicyConfig,
    engine: EngineSettings,
}

impl PayrollConfig {
    /// Creates a validated configuration from its component parts.
    pub fn new(policy: BonusPolicyConfig, engine: EngineSettings) -> EngineResult<Self> {
        policy.validate()?;
        engine.validate()?;
        Ok(Self { policy, engine })
    }

    /// Returns the bonus policy configuration.
    pub fn policy(&self) -> &BonusPolicyConfig {
        &self.policy
    }

    /// Returns the batch execution settings.
    pub fn engine(&self) -> &EngineSettings {
        &self.engine
    }
}

fn invalid(field: &str, message: String) -> EngineError {
    EngineError::ConfigInvalid {
        field: field.to_string(),
        message,
    }
}

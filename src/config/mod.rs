//! Configuration loading and management for the Payroll Engine.
//!
//! This module loads the bonus policy table and batch settings from YAML
//! files. The resulting configuration is process-wide read-only state,
//! passed explicitly to the components that need it.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll").unwrap();
//! println!("Per child: {}", config.policy().children.per_child);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    BonusPolicyConfig, CategoryRates, ChildrenBonusConfig, EngineSettings, ExtraHoursConfig,
    PayrollConfig,
};

//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{BonusPolicyConfig, EngineSettings, PayrollConfig};

/// Loads and provides access to payroll configuration.
///
/// The configuration is read once at startup and then shared read-only.
///
/// # Directory Structure
///
/// ```text
/// config/payroll/
/// ├── bonus_policy.yaml   # Category rates, per-child amount, extra-hours rate
/// └── engine.yaml         # Worker pool, retries and batch timeout
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// println!("Workers: {}", loader.engine().workers);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<BonusPolicyConfig>(&path.join("bonus_policy.yaml"))?;
        let engine = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;

        let config = PayrollConfig::new(policy, engine)?;
        Ok(Self { config })
    }

    /// Wraps an already-built configuration, e.g. one assembled in tests.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the bonus policy configuration.
    pub fn policy(&self) -> &BonusPolicyConfig {
        self.config.policy()
    }

    /// Returns the batch execution settings.
    pub fn engine(&self) -> &EngineSettings {
        self.config.engine()
    }
}

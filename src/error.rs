//! Error types for the Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while calculating, storing and
//! reporting paychecks.

use thiserror::Error;

/// The main error type for the Payroll Engine.
///
/// All operations in the engine return this error type. Use [`EngineError::kind`]
/// to find out which class of failure occurred.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::InvalidPeriod {
///     year: 2024,
///     month: 13,
///     message: "month must be between 1 and 12".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid period 2024-13: month must be between 1 and 12"
/// );
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but contains values the engine cannot use.
    #[error("Invalid configuration value '{field}': {message}")]
    ConfigInvalid {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The requested year/month does not name a valid payroll period.
    #[error("Invalid period {year}-{month}: {message}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month.
        month: u32,
        /// What was wrong with it.
        message: String,
    },

    /// A category string outside the closed set {A, B, C}.
    #[error("Unknown category: {value}")]
    UnknownCategory {
        /// The rejected value.
        value: String,
    },

    /// A national identifier that is malformed or fails its check digit.
    #[error("Invalid rut '{value}': {message}")]
    InvalidRut {
        /// The rejected value.
        value: String,
        /// What was wrong with it.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An extra-hours entry was invalid.
    #[error("Invalid extra hours field '{field}': {message}")]
    InvalidExtraHours {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Another employee already uses this rut.
    #[error("Employee with rut {rut} already exists")]
    DuplicateRut {
        /// The duplicated rut.
        rut: String,
    },

    /// A keyed record does not exist.
    #[error("{resource} {id} not found")]
    NotFound {
        /// The kind of record.
        resource: &'static str,
        /// The key that was looked up.
        id: u64,
    },

    /// The employee roster could not be read at all.
    #[error("Employee roster unavailable: {message}")]
    RosterUnavailable {
        /// Underlying cause.
        message: String,
    },

    /// A read for one employee failed.
    #[error("Lookup failed for {rut}: {message}")]
    LookupFailure {
        /// The employee whose data could not be read.
        rut: String,
        /// Underlying cause.
        message: String,
    },

    /// Writing a paycheck failed.
    #[error("Failed to persist paycheck for {rut} {year}-{month:02}: {message}")]
    PersistenceFailure {
        /// The employee of the paycheck.
        rut: String,
        /// Period year.
        year: i32,
        /// Period month.
        month: u32,
        /// Underlying cause.
        message: String,
    },

    /// A computed paycheck broke the total salary invariant.
    #[error("Consistency violation for {rut}: {message}")]
    ConsistencyViolation {
        /// The employee of the rejected paycheck.
        rut: String,
        /// What did not add up.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input, rejected before any I/O. Never retried.
    Validation,
    /// A roster or ledger read failed.
    Lookup,
    /// A paycheck write failed.
    Persistence,
    /// A computed record broke its invariant.
    Consistency,
    /// Startup configuration problem.
    Configuration,
    /// Arithmetic failure inside the bonus policy.
    Calculation,
}

impl EngineError {
    /// Returns the class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::ConfigInvalid { .. } => ErrorKind::Configuration,
            EngineError::InvalidPeriod { .. }
            | EngineError::UnknownCategory { .. }
            | EngineError::InvalidRut { .. }
            | EngineError::InvalidEmployee { .. }
            | EngineError::InvalidExtraHours { .. }
            | EngineError::DuplicateRut { .. }
            | EngineError::NotFound { .. } => ErrorKind::Validation,
            EngineError::RosterUnavailable { .. } | EngineError::LookupFailure { .. } => {
                ErrorKind::Lookup
            }
            EngineError::PersistenceFailure { .. } => ErrorKind::Persistence,
            EngineError::ConsistencyViolation { .. } => ErrorKind::Consistency,
            EngineError::CalculationError { .. } => ErrorKind::Calculation,
        }
    }

    /// Returns true if repeating the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Persistence
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

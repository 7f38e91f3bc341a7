//! Payroll Engine
//!
//! This crate calculates monthly paychecks for an employee roster, stores
//! them keyed by (rut, year, month) and aggregates them into annual reports.
//! It ships an axum router exposing the roster, the extra-hours ledger and
//! the calculation over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

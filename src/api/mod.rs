//! HTTP API module for the Payroll Engine.
//!
//! This module provides the REST endpoints for maintaining the employee
//! roster and the extra-hours ledger, running a period calculation and
//! reading stored paychecks and the annual report.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculateQuery, EmployeeRequest, ExtraHoursRequest, PaycheckListQuery, PaycheckScope,
    ReportQuery,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;

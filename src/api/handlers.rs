//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::{AnnualReport, CalculationResult, Employee, ExtraHoursEntry, Paycheck, Rut};

use super::request::{
    CalculateQuery, EmployeeRequest, ExtraHoursRequest, PaycheckListQuery, PaycheckScope,
    ReportQuery,
};
use super::response::ApiErrorResponse;
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/v1/employees/",
            get(list_employees).post(create_employee).put(update_employee),
        )
        .route(
            "/api/v1/employees/:id",
            get(get_employee).delete(delete_employee),
        )
        .route(
            "/api/v1/extraHours/",
            get(list_extra_hours)
                .post(create_extra_hours)
                .put(update_extra_hours),
        )
        .route(
            "/api/v1/extraHours/:id",
            get(get_extra_hours).delete(delete_extra_hours),
        )
        .route("/api/v1/paycheck/", get(list_paychecks))
        .route("/api/v1/paycheck/calculate", get(calculate_paychecks))
        .route("/api/v1/paycheck/report", get(annual_report))
        .with_state(state)
}

/// Logs a failed request and converts the error into a response.
fn reject(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> ApiErrorResponse {
    let response = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = response.status.as_u16(),
        code = %response.error.code,
        error = %response.error.message,
        "Request failed"
    );
    response
}

async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let correlation_id = Uuid::new_v4();
    let employees = state
        .roster()
        .list()
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(correlation_id = %correlation_id, count = employees.len(), "Listed employees");
    Ok(Json(employees))
}

async fn get_employee(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|err| reject(correlation_id, err))?;
    state
        .roster()
        .get(id)
        .await
        .and_then(|found| {
            found.ok_or(EngineError::NotFound {
                resource: "Employee",
                id,
            })
        })
        .map(Json)
        .map_err(|err| reject(correlation_id, err))
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|err| reject(correlation_id, err))?;
    let employee = request
        .into_new_employee()
        .map_err(|err| reject(correlation_id, err))?;
    let employee = state
        .roster()
        .create(employee)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        employee_id = employee.id,
        rut = %employee.rut,
        "Employee created"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|err| reject(correlation_id, err))?;
    let employee = request
        .into_employee()
        .map_err(|err| reject(correlation_id, err))?;
    let employee = state
        .roster()
        .update(employee)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(correlation_id = %correlation_id, employee_id = employee.id, "Employee updated");
    Ok(Json(employee))
}

async fn delete_employee(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|err| reject(correlation_id, err))?;
    match state.roster().delete(id).await {
        Ok(true) => {
            info!(correlation_id = %correlation_id, employee_id = id, "Employee deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(reject(
            correlation_id,
            EngineError::NotFound {
                resource: "Employee",
                id,
            },
        )),
        Err(err) => Err(reject(correlation_id, err)),
    }
}

async fn list_extra_hours(State(state): State<AppState>) -> ApiResult<Json<Vec<ExtraHoursEntry>>> {
    let correlation_id = Uuid::new_v4();
    let entries = state
        .ledger()
        .list()
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(correlation_id = %correlation_id, count = entries.len(), "Listed extra hours");
    Ok(Json(entries))
}

async fn get_extra_hours(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<ExtraHoursEntry>> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|err| reject(correlation_id, err))?;
    state
        .ledger()
        .get(id)
        .await
        .and_then(|found| {
            found.ok_or(EngineError::NotFound {
                resource: "ExtraHours",
                id,
            })
        })
        .map(Json)
        .map_err(|err| reject(correlation_id, err))
}

async fn create_extra_hours(
    State(state): State<AppState>,
    payload: Result<Json<ExtraHoursRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|err| reject(correlation_id, err))?;
    let entry = request
        .into_new_entry()
        .map_err(|err| reject(correlation_id, err))?;
    ensure_employee_exists(&state, &entry.rut)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    let entry = state
        .ledger()
        .create(entry)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        entry_id = entry.id,
        rut = %entry.rut,
        hours = %entry.num_extra_hours,
        "Extra hours recorded"
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn update_extra_hours(
    State(state): State<AppState>,
    payload: Result<Json<ExtraHoursRequest>, JsonRejection>,
) -> ApiResult<Json<ExtraHoursEntry>> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|err| reject(correlation_id, err))?;
    let entry = request
        .into_entry()
        .map_err(|err| reject(correlation_id, err))?;
    ensure_employee_exists(&state, &entry.rut)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    let entry = state
        .ledger()
        .update(entry)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(correlation_id = %correlation_id, entry_id = entry.id, "Extra hours updated");
    Ok(Json(entry))
}

async fn delete_extra_hours(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|err| reject(correlation_id, err))?;
    match state.ledger().delete(id).await {
        Ok(true) => {
            info!(correlation_id = %correlation_id, entry_id = id, "Extra hours deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(reject(
            correlation_id,
            EngineError::NotFound {
                resource: "ExtraHours",
                id,
            },
        )),
        Err(err) => Err(reject(correlation_id, err)),
    }
}

/// Extra hours may only be recorded against a rostered employee.
async fn ensure_employee_exists(state: &AppState, rut: &Rut) -> Result<(), EngineError> {
    match state.roster().find_by_rut(rut).await? {
        Some(_) => Ok(()),
        None => Err(EngineError::InvalidExtraHours {
            field: "rut".to_string(),
            message: format!("no employee with rut {}", rut),
        }),
    }
}

async fn list_paychecks(
    State(state): State<AppState>,
    query: Result<Query<PaycheckListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Paycheck>>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|err| reject(correlation_id, err))?;
    let scope = query.scope().map_err(|err| reject(correlation_id, err))?;
    let store = state.paychecks();
    let paychecks = match scope {
        PaycheckScope::All => store.list_all().await,
        PaycheckScope::Year(year) => store.list_by_year(year).await,
        PaycheckScope::Period(period) => {
            store.list_by_period(period.year(), period.month()).await
        }
    }
    .map_err(|err| reject(correlation_id, err))?;
    info!(correlation_id = %correlation_id, count = paychecks.len(), "Listed paychecks");
    Ok(Json(paychecks))
}

/// Handler for `GET /api/v1/paycheck/calculate`.
///
/// Runs the batch for the requested period and returns the full
/// [`CalculationResult`], including per-employee failures. Only an invalid
/// period or an unreadable roster fails the request as a whole.
async fn calculate_paychecks(
    State(state): State<AppState>,
    query: Result<Query<CalculateQuery>, QueryRejection>,
) -> ApiResult<Json<CalculationResult>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|err| reject(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        year = query.year,
        month = query.month,
        "Processing calculation request"
    );

    let start_time = Instant::now();
    let result = state
        .calculator()
        .calculate(query.year, query.month)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(
        correlation_id = %correlation_id,
        calculation_id = %result.calculation_id,
        succeeded = result.paychecks.len(),
        failed = result.failures.len(),
        unprocessed = result.unprocessed.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed"
    );
    Ok(Json(result))
}

async fn annual_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<AnnualReport>> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|err| reject(correlation_id, err))?;
    let report = state
        .reports()
        .annual_report(query.year)
        .await
        .map_err(|err| reject(correlation_id, err))?;
    info!(correlation_id = %correlation_id, year = query.year, "Annual report built");
    Ok(Json(report))
}

//! Integration tests for the Payroll Engine.
//!
//! This test suite covers:
//! - The March 2024 paycheck scenario end to end over HTTP
//! - Extra-hours scoping to the calculated month
//! - Idempotent recalculation and overwrite on roster changes
//! - Partial failure isolation and roster unavailability
//! - Annual report aggregation and overflow
//! - Roster and ledger CRUD error cases

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::ServiceExt;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::calculation::{PaycheckCalculator, TableBonusPolicy};
use payroll_engine::config::ConfigLoader;
use payroll_engine::error::{EngineError, EngineResult, ErrorKind};
use payroll_engine::models::{
    Category, Employee, ExtraHoursEntry, NewEmployee, NewExtraHours, Rut,
};
use payroll_engine::store::{
    EmployeeRoster, ExtraHoursLedger, InMemoryEmployeeRoster, InMemoryExtraHoursLedger,
    InMemoryPaycheckStore, PaycheckStore,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/payroll").expect("Failed to load config")
}

fn create_router_for_test() -> Router {
    create_router(AppState::in_memory(load_config().config()))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, json)
}

async fn create_employee(
    router: &Router,
    rut: &str,
    salary: i64,
    children: u32,
    category: &str,
) -> Value {
    let (status, body) = send(
        router,
        "POST",
        "/api/v1/employees/",
        Some(json!({
            "rut": rut,
            "name": format!("Employee {}", rut),
            "salary": salary,
            "children": children,
            "category": category
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create employee failed: {}", body);
    body
}

async fn record_hours(router: &Router, rut: &str, date: &str, hours: &str) -> Value {
    let (status, body) = send(
        router,
        "POST",
        "/api/v1/extraHours/",
        Some(json!({ "rut": rut, "date": date, "numExtraHours": hours })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "record hours failed: {}", body);
    body
}

async fn calculate(router: &Router, year: i32, month: u32) -> Value {
    let (status, body) = send(
        router,
        "GET",
        &format!("/api/v1/paycheck/calculate?year={}&month={}", year, month),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "calculate failed: {}", body);
    body
}

fn assert_components_sum(paycheck: &Value) {
    let sum = paycheck["monthlySalary"].as_i64().unwrap()
        + paycheck["salaryBonus"].as_i64().unwrap()
        + paycheck["childrenBonus"].as_i64().unwrap()
        + paycheck["extraHoursBonus"].as_i64().unwrap();
    assert_eq!(paycheck["totalSalary"].as_i64().unwrap(), sum);
}

// =============================================================================
// Paycheck Calculation
// =============================================================================

#[tokio::test]
async fn test_march_2024_scenario() {
    let router = create_router_for_test();
    create_employee(&router, "12.345.678-5", 1_000_000, 2, "A").await;
    record_hours(&router, "12345678-5", "2024-03-05", "4").await;
    record_hours(&router, "12345678-5", "2024-03-20", "6").await;

    let result = calculate(&router, 2024, 3).await;
    assert_eq!(result["year"], 2024);
    assert_eq!(result["month"], 3);
    assert_eq!(result["timedOut"], false);
    assert_eq!(result["failures"], json!([]));

    let paychecks = result["paychecks"].as_array().unwrap();
    assert_eq!(paychecks.len(), 1);
    let paycheck = &paychecks[0];
    assert_eq!(paycheck["rut"], "12345678-5");
    assert_eq!(paycheck["monthlySalary"], 1_000_000);
    assert_eq!(paycheck["salaryBonus"], 150_000);
    assert_eq!(paycheck["childrenBonus"], 50_000);
    assert_eq!(paycheck["extraHoursBonus"], 83_333);
    assert_eq!(paycheck["totalSalary"], 1_283_333);
    assert_components_sum(paycheck);

    let (status, stored) = send(&router, "GET", "/api/v1/paycheck/?year=2024&month=3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0], *paycheck);
}

#[tokio::test]
async fn test_extra_hours_scoped_to_month() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 900_000, 0, "C").await;
    record_hours(&router, "1-9", "2024-02-29", "7").await;
    record_hours(&router, "1-9", "2024-03-01", "2").await;
    record_hours(&router, "1-9", "2024-03-31", "2").await;
    record_hours(&router, "1-9", "2024-04-01", "9").await;

    let result = calculate(&router, 2024, 3).await;
    let paycheck = &result["paychecks"][0];
    // 900_000 * 1.5 * 4 / 180 = 30_000
    assert_eq!(paycheck["extraHoursBonus"], 30_000);
    // 900_000 * 0.05
    assert_eq!(paycheck["salaryBonus"], 45_000);
    assert_eq!(paycheck["childrenBonus"], 0);
    assert_components_sum(paycheck);
}

#[tokio::test]
async fn test_month_without_hours_has_zero_extra_bonus() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 900_000, 1, "B").await;
    record_hours(&router, "1-9", "2024-03-10", "5").await;

    let result = calculate(&router, 2024, 5).await;
    assert_eq!(result["paychecks"][0]["extraHoursBonus"], 0);
    assert_eq!(result["paychecks"][0]["totalSalary"], 900_000 + 90_000 + 25_000);
}

#[tokio::test]
async fn test_recalculation_is_idempotent() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 1_000_000, 2, "A").await;
    create_employee(&router, "6-K", 750_000, 0, "B").await;
    record_hours(&router, "6-K", "2024-03-12", "3.5").await;

    let first = calculate(&router, 2024, 3).await;
    let second = calculate(&router, 2024, 3).await;
    assert_eq!(first["paychecks"], second["paychecks"]);
    assert_ne!(first["calculationId"], second["calculationId"]);

    let (_, stored) = send(&router, "GET", "/api/v1/paycheck/", None).await;
    assert_eq!(stored.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_recalculation_overwrites_after_roster_change() {
    let router = create_router_for_test();
    let employee = create_employee(&router, "1-9", 1_000_000, 2, "A").await;
    calculate(&router, 2024, 3).await;

    let (status, _) = send(
        &router,
        "PUT",
        "/api/v1/employees/",
        Some(json!({
            "id": employee["id"],
            "rut": "1-9",
            "name": "Employee 1-9",
            "salary": 1_200_000,
            "children": 0,
            "category": "C"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let result = calculate(&router, 2024, 3).await;
    assert_eq!(result["paychecks"][0]["totalSalary"], 1_200_000 + 60_000);

    let (_, stored) = send(&router, "GET", "/api/v1/paycheck/?year=2024", None).await;
    let stored = stored.as_array().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["monthlySalary"], 1_200_000);
    assert_eq!(stored[0]["childrenBonus"], 0);
}

#[tokio::test]
async fn test_invalid_period_rejected() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 1_000_000, 0, "A").await;

    for uri in [
        "/api/v1/paycheck/calculate?year=2024&month=0",
        "/api/v1/paycheck/calculate?year=2024&month=13",
        "/api/v1/paycheck/calculate?year=0&month=3",
    ] {
        let (status, body) = send(&router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], "INVALID_PERIOD");
    }

    let (_, stored) = send(&router, "GET", "/api/v1/paycheck/", None).await;
    assert_eq!(stored, json!([]));
}

// =============================================================================
// Failure Isolation
// =============================================================================

/// Ledger whose reads fail for one employee.
struct BrokenLedger {
    inner: InMemoryExtraHoursLedger,
    broken: Rut,
}

#[async_trait]
impl ExtraHoursLedger for BrokenLedger {
    async fn list(&self) -> EngineResult<Vec<ExtraHoursEntry>> {
        self.inner.list().await
    }
    async fn get(&self, id: u64) -> EngineResult<Option<ExtraHoursEntry>> {
        self.inner.get(id).await
    }
    async fn create(&self, entry: NewExtraHours) -> EngineResult<ExtraHoursEntry> {
        self.inner.create(entry).await
    }
    async fn update(&self, entry: ExtraHoursEntry) -> EngineResult<ExtraHoursEntry> {
        self.inner.update(entry).await
    }
    async fn delete(&self, id: u64) -> EngineResult<bool> {
        self.inner.delete(id).await
    }
    async fn entries_between(
        &self,
        rut: &Rut,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<ExtraHoursEntry>> {
        if rut == &self.broken {
            return Err(EngineError::LookupFailure {
                rut: rut.to_string(),
                message: "ledger partition offline".to_string(),
            });
        }
        self.inner.entries_between(rut, from, to).await
    }
}

/// Roster that cannot be read.
struct OfflineRoster;

#[async_trait]
impl EmployeeRoster for OfflineRoster {
    async fn list(&self) -> EngineResult<Vec<Employee>> {
        Err(EngineError::LookupFailure {
            rut: String::new(),
            message: "connection refused".to_string(),
        })
    }
    async fn get(&self, _id: u64) -> EngineResult<Option<Employee>> {
        Ok(None)
    }
    async fn find_by_rut(&self, _rut: &Rut) -> EngineResult<Option<Employee>> {
        Ok(None)
    }
    async fn create(&self, employee: NewEmployee) -> EngineResult<Employee> {
        Ok(employee.with_id(1))
    }
    async fn update(&self, employee: Employee) -> EngineResult<Employee> {
        Ok(employee)
    }
    async fn delete(&self, _id: u64) -> EngineResult<bool> {
        Ok(false)
    }
}

fn new_employee(rut: &str, salary: i64, category: Category) -> NewEmployee {
    NewEmployee {
        rut: Rut::parse(rut).unwrap(),
        name: format!("Employee {}", rut),
        salary,
        children: 1,
        category,
    }
}

#[tokio::test]
async fn test_one_failing_employee_does_not_block_others() {
    let config = load_config();
    let roster = Arc::new(InMemoryEmployeeRoster::new());
    for rut in ["1-9", "6-K", "11.111.111-1", "22.222.222-2"] {
        roster
            .create(new_employee(rut, 800_000, Category::B))
            .await
            .unwrap();
    }
    let broken = Rut::parse("6-K").unwrap();
    let ledger = Arc::new(BrokenLedger {
        inner: InMemoryExtraHoursLedger::new(),
        broken: broken.clone(),
    });
    let store = Arc::new(InMemoryPaycheckStore::new());
    let calculator = PaycheckCalculator::new(
        roster,
        ledger,
        store.clone(),
        Arc::new(TableBonusPolicy::new(config.policy().clone())),
        config.engine().clone(),
    );

    let result = calculator.calculate(2024, 3).await.unwrap();
    assert_eq!(result.paychecks.len(), 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].rut, broken);
    assert_eq!(result.failures[0].kind, ErrorKind::Lookup);
    assert!(result.paycheck_for(&broken).is_none());

    let stored = store.list_by_period(2024, 3).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|p| p.rut() != &broken));
}

#[tokio::test]
async fn test_roster_unavailable_returns_503() {
    let config = load_config();
    let state = AppState::new(
        config.config(),
        Arc::new(OfflineRoster),
        Arc::new(InMemoryExtraHoursLedger::new()),
        Arc::new(InMemoryPaycheckStore::new()),
    );
    let router = create_router(state);

    let (status, body) = send(&router, "GET", "/api/v1/paycheck/calculate?year=2024&month=3", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "ROSTER_UNAVAILABLE");
}

// =============================================================================
// Annual Report
// =============================================================================

#[tokio::test]
async fn test_annual_report_sums_months() {
    let router = create_router_for_test();
    create_employee(&router, "12.345.678-5", 1_000_000, 2, "A").await;
    create_employee(&router, "1-9", 500_000, 0, "C").await;
    record_hours(&router, "12345678-5", "2024-03-05", "4").await;
    record_hours(&router, "12345678-5", "2024-03-20", "6").await;

    let january = calculate(&router, 2024, 1).await;
    let march = calculate(&router, 2024, 3).await;
    calculate(&router, 2023, 12).await;

    let (status, report) = send(&router, "GET", "/api/v1/paycheck/report?year=2024", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], 2024);

    let rows = report["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["month"], "Ene");
    assert_eq!(rows[0]["month_number"], 1);
    assert_eq!(rows[11]["month"], "Dic");

    let month_total = |result: &Value| -> i64 {
        result["paychecks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["totalSalary"].as_i64().unwrap())
            .sum()
    };
    assert_eq!(rows[0]["total_salary"].as_i64().unwrap(), month_total(&january));
    assert_eq!(rows[2]["total_salary"].as_i64().unwrap(), month_total(&march));
    assert_eq!(rows[2]["extra_hours"], 83_333);
    assert_eq!(rows[2]["paychecks"], 2);

    // February and the rest of the year are present as zero rows
    assert_eq!(rows[1]["total_salary"], 0);
    assert_eq!(rows[1]["paychecks"], 0);

    for row in rows {
        let sum = row["monthly_salary"].as_i64().unwrap()
            + row["salary_bonus"].as_i64().unwrap()
            + row["children_bonus"].as_i64().unwrap()
            + row["extra_hours"].as_i64().unwrap();
        assert_eq!(row["total_salary"].as_i64().unwrap(), sum);
    }

    let series: Vec<&str> = report["series"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["dataKey"].as_str().unwrap())
        .collect();
    assert_eq!(
        series,
        vec!["monthly_salary", "salary_bonus", "extra_hours", "children_bonus"]
    );
}

#[tokio::test]
async fn test_annual_report_overflow_returns_500() {
    let router = create_router_for_test();
    for rut in ["12.345.678-5", "1-9", "6-K"] {
        create_employee(&router, rut, 4_000_000_000_000_000_000, 0, "C").await;
    }
    let march = calculate(&router, 2024, 3).await;
    assert_eq!(march["paychecks"].as_array().unwrap().len(), 3);

    let (status, body) = send(&router, "GET", "/api/v1/paycheck/report?year=2024", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "CALCULATION_ERROR");
}

#[tokio::test]
async fn test_annual_report_requires_year() {
    let router = create_router_for_test();
    let (status, body) = send(&router, "GET", "/api/v1/paycheck/report", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Roster and Ledger
// =============================================================================

#[tokio::test]
async fn test_employee_crud() {
    let router = create_router_for_test();
    let created = create_employee(&router, "12.345.678-5", 1_000_000, 2, "A").await;
    let id = created["id"].as_u64().unwrap();

    let (status, fetched) = send(&router, "GET", &format!("/api/v1/employees/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, listed) = send(&router, "GET", "/api/v1/employees/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(&router, "DELETE", &format!("/api/v1/employees/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, "DELETE", &format!("/api/v1/employees/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_to_taken_rut_returns_409() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 1_000_000, 0, "A").await;
    let second = create_employee(&router, "6-K", 1_000_000, 0, "A").await;

    let (status, body) = send(
        &router,
        "PUT",
        "/api/v1/employees/",
        Some(json!({
            "id": second["id"],
            "rut": "1-9",
            "name": "Taken",
            "salary": 1_000_000,
            "children": 0,
            "category": "A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_RUT");
}

#[tokio::test]
async fn test_invalid_rut_check_digit_returns_400() {
    let router = create_router_for_test();
    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/employees/",
        Some(json!({
            "rut": "12.345.678-9",
            "name": "Wrong Digit",
            "salary": 1_000_000,
            "children": 0,
            "category": "A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_RUT");
}

#[tokio::test]
async fn test_non_positive_salary_returns_400() {
    let router = create_router_for_test();
    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/employees/",
        Some(json!({
            "rut": "1-9",
            "name": "No Salary",
            "salary": 0,
            "category": "A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_EMPLOYEE");
}

#[tokio::test]
async fn test_extra_hours_crud() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 1_000_000, 0, "A").await;
    let entry = record_hours(&router, "1-9", "2024-03-05", "4").await;
    let id = entry["id"].as_u64().unwrap();
    assert_eq!(entry["rut"], "1-9");
    assert_eq!(entry["date"], "2024-03-05");

    let (status, updated) = send(
        &router,
        "PUT",
        "/api/v1/extraHours/",
        Some(json!({ "id": id, "rut": "1-9", "date": "2024-03-06", "numExtraHours": "5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["date"], "2024-03-06");

    let (status, fetched) = send(&router, "GET", &format!("/api/v1/extraHours/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, _) = send(&router, "DELETE", &format!("/api/v1/extraHours/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", &format!("/api/v1/extraHours/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_extra_hours_returns_400() {
    let router = create_router_for_test();
    create_employee(&router, "1-9", 1_000_000, 0, "A").await;
    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/extraHours/",
        Some(json!({ "rut": "1-9", "date": "2024-03-05", "numExtraHours": "-2" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_EXTRA_HOURS");
}

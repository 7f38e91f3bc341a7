//! Response types for the Payroll Engine API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            EngineError::InvalidPeriod { .. } => (StatusCode::BAD_REQUEST, "INVALID_PERIOD"),
            EngineError::UnknownCategory { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_CATEGORY"),
            EngineError::InvalidRut { .. } => (StatusCode::BAD_REQUEST, "INVALID_RUT"),
            EngineError::InvalidEmployee { .. } => (StatusCode::BAD_REQUEST, "INVALID_EMPLOYEE"),
            EngineError::InvalidExtraHours { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_EXTRA_HOURS")
            }
            EngineError::DuplicateRut { .. } => (StatusCode::CONFLICT, "DUPLICATE_RUT"),
            EngineError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            EngineError::RosterUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "ROSTER_UNAVAILABLE")
            }
            EngineError::LookupFailure { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "LOOKUP_FAILURE")
            }
            EngineError::PersistenceFailure { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_FAILURE")
            }
            EngineError::ConsistencyViolation { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONSISTENCY_VIOLATION")
            }
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::ConfigInvalid { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            EngineError::CalculationError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CALCULATION_ERROR")
            }
        };

        let error = match error.kind() {
            ErrorKind::Validation => ApiError::new(code, message),
            kind => ApiError::with_details(code, message, format!("{:?} failure", kind)),
        };
        ApiErrorResponse { status, error }
    }
}

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        let error = match rejection {
            JsonRejection::JsonDataError(err) => {
                // serde's message names the offending field
                let body_text = err.body_text();
                if body_text.contains("missing field") {
                    ApiError::validation_error(body_text)
                } else {
                    ApiError::malformed_json(body_text)
                }
            }
            JsonRejection::JsonSyntaxError(err) => {
                ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
            }
            _ => ApiError::malformed_json("Failed to parse request body"),
        };
        Self::bad_request(error)
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(ApiError::validation_error(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiErrorResponse {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(ApiError::validation_error(rejection.body_text()))
    }
}

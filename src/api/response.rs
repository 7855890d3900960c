//! Response types for the fleet commission API.
//!
//! This module defines the success bodies, the error response structure and
//! the mapping from [`LedgerError`] to HTTP status codes.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::ResetOutcome;
use crate::models::{CommissionSummary, Role, VehicleCategory, Worker};

/// Public identity of a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerView {
    /// Worker id.
    pub id: String,
    /// Username.
    pub username: String,
    /// Role.
    pub role: Role,
}

impl From<&Worker> for WorkerView {
    fn from(worker: &Worker) -> Self {
        Self {
            id: worker.id.clone(),
            username: worker.username.clone(),
            role: worker.role,
        }
    }
}

/// Body of `GET /deliveries/my`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyDeliveriesResponse {
    /// The calling worker.
    pub user: WorkerView,
    /// The caller's current commission summary.
    pub stats: CommissionSummary,
    /// The rate table the summary was computed with.
    pub commission_rates: BTreeMap<VehicleCategory, Decimal>,
}

/// One worker's entry in `GET /deliveries/all-users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSummary {
    /// The worker.
    pub user: WorkerView,
    /// Their current commission summary.
    pub stats: CommissionSummary,
}

/// Body of `GET /deliveries/all-users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllUsersResponse {
    /// Drivers and helpers in registration order.
    pub users: Vec<WorkerSummary>,
}

/// Body of `POST /deliveries/update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDeliveryResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The worker's refreshed summary.
    pub stats: CommissionSummary,
}

/// Body of `POST /deliveries/reset-month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// What the reset changed.
    #[serde(flatten)]
    pub outcome: ResetOutcome,
}

/// Body of `POST /workers/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The newly registered worker.
    pub user: WorkerView,
}

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
    /// 400 with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    /// 401 for requests without a recognised worker identity.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: ApiError::new("UNAUTHENTICATED", message),
        }
    }

    /// 403 for non-admin callers on admin routes.
    pub fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            error: ApiError::new("FORBIDDEN", "Admin access required"),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let message = error.to_string();
        let (status, api_error) = match error {
            LedgerError::UnknownCategory { code } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "UNKNOWN_CATEGORY",
                    message,
                    format!(
                        "'{}' is not one of {}",
                        code,
                        VehicleCategory::ALL.map(VehicleCategory::code).join(", ")
                    ),
                ),
            ),
            LedgerError::InvalidCount { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_COUNT", message),
            ),
            LedgerError::WorkerNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::new("WORKER_NOT_FOUND", message),
            ),
            LedgerError::DuplicateUsername { .. } => (
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_USERNAME", message),
            ),
            LedgerError::InvalidUsername { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_USERNAME", message),
            ),
            LedgerError::InvalidRole { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_ROLE", message),
            ),
            LedgerError::ConfigNotFound { .. }
            | LedgerError::ConfigParseError { .. }
            | LedgerError::InvalidConfig { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
        };

        ApiErrorResponse {
            status,
            error: api_error,
        }
    }
}

//! HTTP request handlers for the fleet commission API.
//!
//! Authentication happens upstream: the gateway verifies the caller and
//! forwards their worker id in the [`WORKER_ID_HEADER`] header. Handlers only
//! check that the id names a registered worker and, for admin routes, that the
//! worker is an administrator.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::count_from_json;
use crate::models::{Role, VehicleCategory, Worker};

use super::request::{RegisterWorkerRequest, UpdateDeliveryRequest};
use super::response::{
    AllUsersResponse, ApiError, ApiErrorResponse, MyDeliveriesResponse, RegisterWorkerResponse,
    ResetResponse, UpdateDeliveryResponse, WorkerSummary, WorkerView,
};
use super::state::AppState;

/// Header carrying the authenticated caller's worker id.
pub const WORKER_ID_HEADER: &str = "x-worker-id";

type ApiResult<T> = Result<Json<T>, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/deliveries/my", get(my_deliveries_handler))
        .route("/deliveries/all-users", get(all_users_handler))
        .route("/deliveries/update", post(update_delivery_handler))
        .route("/deliveries/reset-month", post(reset_month_handler))
        .route("/workers/register", post(register_handler))
        .route("/workers/me", get(me_handler))
        .with_state(state)
}

/// Resolves the calling worker from the identity header.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Worker, ApiErrorResponse> {
    let worker_id = headers
        .get(WORKER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiErrorResponse::unauthenticated("Missing worker identity"))?;

    state
        .ledger()
        .worker(worker_id)
        .map_err(|_| ApiErrorResponse::unauthenticated("Unknown worker identity"))
}

/// Resolves the caller and requires the admin role.
fn authenticate_admin(state: &AppState, headers: &HeaderMap) -> Result<Worker, ApiErrorResponse> {
    let caller = authenticate(state, headers)?;
    if !caller.is_admin() {
        warn!(worker_id = %caller.id, role = %caller.role, "Admin route refused");
        return Err(ApiErrorResponse::forbidden());
    }
    Ok(caller)
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_to_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Handler for GET /deliveries/my.
///
/// Returns the caller's own summary together with the rate table.
async fn my_deliveries_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<MyDeliveriesResponse> {
    let caller = authenticate(&state, &headers)?;
    let stats = state.ledger().get_summary(&caller.id)?;

    Ok(Json(MyDeliveriesResponse {
        user: WorkerView::from(&caller),
        stats,
        commission_rates: state.ledger().rate_table().rates().collect(),
    }))
}

/// Handler for GET /deliveries/all-users (admin only).
///
/// Lists drivers and helpers; administrators carry no deliveries.
async fn all_users_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<AllUsersResponse> {
    authenticate_admin(&state, &headers)?;

    let users = state
        .ledger()
        .list_summaries_for_roles(&[Role::Driver, Role::Helper])?
        .into_iter()
        .map(|(worker, stats)| WorkerSummary {
            user: WorkerView::from(&worker),
            stats,
        })
        .collect();

    Ok(Json(AllUsersResponse { users }))
}

/// Handler for POST /deliveries/update (admin only).
///
/// Sets one worker's count for one category.
async fn update_delivery_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UpdateDeliveryRequest>, JsonRejection>,
) -> ApiResult<UpdateDeliveryResponse> {
    let correlation_id = Uuid::new_v4();
    let admin = authenticate_admin(&state, &headers)?;
    let Json(request) = payload.map_err(|rejection| rejection_to_error(rejection, correlation_id))?;

    info!(
        correlation_id = %correlation_id,
        admin_id = %admin.id,
        worker_id = %request.user_id,
        truck_type = %request.truck_type,
        "Processing delivery update"
    );

    let result = request
        .truck_type
        .parse::<VehicleCategory>()
        .and_then(|_| count_from_json(&request.count))
        .and_then(|count| {
            state.ledger().update_worker_delivery(
                &request.user_id,
                &request.truck_type,
                i64::from(count),
            )
        });

    match result {
        Ok(stats) => Ok(Json(UpdateDeliveryResponse {
            message: "Delivery updated successfully".to_string(),
            stats,
        })),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Delivery update rejected");
            Err(err.into())
        }
    }
}

/// Handler for POST /deliveries/reset-month (admin only).
async fn reset_month_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<ResetResponse> {
    let admin = authenticate_admin(&state, &headers)?;
    let outcome = state.ledger().reset_all_deliveries();

    info!(admin_id = %admin.id, workers_reset = outcome.workers_reset, "Period reset");
    Ok(Json(ResetResponse {
        message: "All deliveries reset successfully for the new month".to_string(),
        outcome,
    }))
}

/// Handler for POST /workers/register.
async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterWorkerRequest>, JsonRejection>,
) -> ApiResult<RegisterWorkerResponse> {
    let correlation_id = Uuid::new_v4();
    let Json(request) = payload.map_err(|rejection| rejection_to_error(rejection, correlation_id))?;

    let role = match request.role.as_deref() {
        Some(role) => role.parse::<Role>()?,
        None => Role::default(),
    };
    let worker = state.ledger().register_worker(&request.username, role)?;

    Ok(Json(RegisterWorkerResponse {
        message: "User registered successfully".to_string(),
        user: WorkerView::from(&worker),
    }))
}

/// Handler for GET /workers/me.
async fn me_handler(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<WorkerView> {
    let caller = authenticate(&state, &headers)?;
    Ok(Json(WorkerView::from(&caller)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::ledger::FleetLedger;

    fn create_test_state() -> AppState {
        AppState::new(FleetLedger::default())
    }

    #[tokio::test]
    async fn test_missing_identity_returns_401() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/deliveries/my")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "UNAUTHENTICATED");
    }

    #[tokio::test]
    async fn test_driver_cannot_reset() {
        let state = create_test_state();
        let driver = state
            .ledger()
            .register_worker("driver1", Role::Driver)
            .unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/deliveries/reset-month")
                    .header(WORKER_ID_HEADER, driver.id.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_me_returns_identity() {
        let state = create_test_state();
        let helper = state
            .ledger()
            .register_worker("helper1", Role::Helper)
            .unwrap();
        let router = create_router(state);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/workers/me")
                    .header(WORKER_ID_HEADER, helper.id.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let view: WorkerView = serde_json::from_slice(&body).unwrap();
        assert_eq!(view.username, "helper1");
        assert_eq!(view.role, Role::Helper);
    }
}

//! HTTP API module for the fleet commission ledger.
//!
//! This module exposes the ledger's operations as REST endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{WORKER_ID_HEADER, create_router};
pub use request::{RegisterWorkerRequest, UpdateDeliveryRequest};
pub use response::{
    AllUsersResponse, ApiError, ApiErrorResponse, MyDeliveriesResponse, RegisterWorkerResponse,
    ResetResponse, UpdateDeliveryResponse, WorkerSummary, WorkerView,
};
pub use state::AppState;

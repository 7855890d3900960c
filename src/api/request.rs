//! Request types for the fleet commission API.

use serde::{Deserialize, Deserializer, Serialize};

/// Request body for `POST /deliveries/update`.
///
/// `truck_type` and `count` are kept loose so that an unknown code or a
/// fractional or non-numeric count is reported as a ledger validation error rather than a
/// JSON parse failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDeliveryRequest {
    /// The worker whose count is being set.
    #[serde(alias = "userId")]
    pub user_id: String,
    /// The vehicle category code (e.g. "GKY").
    pub truck_type: String,
    /// The complete new count for that category.
    #[serde(deserialize_with = "required_value")]
    pub count: serde_json::Value,
}

/// Deserializes any JSON value while still treating an absent field as missing.
fn required_value<'de, D>(deserializer: D) -> Result<serde_json::Value, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer)
}

/// Request body for `POST /workers/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterWorkerRequest {
    /// Desired unique username.
    pub username: String,
    /// One of "driver", "helper" or "admin". Defaults to "driver".
    #[serde(default)]
    pub role: Option<String>,
}

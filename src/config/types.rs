//! Configuration types for the fleet commission ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Default address the HTTP server binds to.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8001";

/// Commission rate configuration from `rates.yaml`.
///
/// Rates are keyed by vehicle category code. The codes are validated when the
/// configuration is turned into a [`RateTable`](crate::calculation::RateTable).
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Human-readable name of the rate schedule.
    pub name: String,
    /// Version label of the rate schedule.
    pub version: String,
    /// Map of category code to commission per delivery.
    pub rates: BTreeMap<String, Decimal>,
}

/// HTTP server configuration from `server.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

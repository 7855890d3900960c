//! Application state for the fleet commission API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::ledger::FleetLedger;

/// Shared application state.
///
/// Holds the one ledger every handler reads and mutates. Each router gets its
/// own ledger, so tests can build an isolated instance per case.
#[derive(Clone)]
pub struct AppState {
    ledger: Arc<FleetLedger>,
}

impl AppState {
    /// Creates a new application state around the given ledger.
    pub fn new(ledger: FleetLedger) -> Self {
        Self {
            ledger: Arc::new(ledger),
        }
    }

    /// Creates an empty ledger using the configured rate table.
    pub fn from_config(config: ConfigLoader) -> Self {
        Self::new(FleetLedger::new(config.into_rate_table()))
    }

    /// Returns a reference to the ledger.
    pub fn ledger(&self) -> &FleetLedger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_app_state_is_clone() {
        // Verify AppState can be cloned (required for axum state)
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_clones_share_one_ledger() {
        let state = AppState::new(FleetLedger::default());
        let clone = state.clone();

        state.ledger().register_worker("shared", Role::Driver).unwrap();
        assert_eq!(clone.ledger().worker_count(), 1);
    }
}

//! Shared ledger state for the fleet commission service.
//!
//! The [`FleetLedger`] owns every worker's current-period delivery record and
//! delegates all derived figures to the [`calculation`](crate::calculation)
//! module.

mod fleet_ledger;

pub use fleet_ledger::{FleetLedger, ResetOutcome};

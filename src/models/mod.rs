//! Core data models for the fleet commission ledger.
//!
//! This module contains the domain models shared by the calculation engine,
//! the ledger and the HTTP API.

mod category;
mod commission_summary;
mod delivery_record;
mod worker;

pub use category::VehicleCategory;
pub use commission_summary::{CategoryCommission, CommissionSummary};
pub use delivery_record::DeliveryRecord;
pub use worker::{Role, Worker};

//! Calculation logic for the fleet commission ledger.
//!
//! This module contains the commission rate table and the pure functions that
//! summarize delivery records into commission and validate count updates.

mod commission;
mod rate_table;

pub use commission::{
    COMMISSION_DECIMAL_PLACES, apply_delta, count_from_json, round_commission, summarize,
    validate_count,
};
pub use rate_table::RateTable;

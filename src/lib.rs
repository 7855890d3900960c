//! Fleet Commission Ledger
//!
//! This crate tracks delivery counts per worker per vehicle category, computes
//! commission from a per-category rate table, and supports resetting every
//! worker's counts at the start of a new period.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;

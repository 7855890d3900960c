//! Configuration loading and management for the fleet commission ledger.
//!
//! This module loads the commission rate schedule and server settings from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use fleet_commission::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/fleet").unwrap();
//! println!("Loaded rate schedule: {}", config.rate_table().name());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{DEFAULT_BIND_ADDRESS, RatesConfig, ServerConfig};

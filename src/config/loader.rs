//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the commission
//! rate schedule and server settings from YAML files.

use std::fs;
use std::path::Path;

use crate::calculation::RateTable;
use crate::error::{LedgerError, LedgerResult};

use super::types::{RatesConfig, ServerConfig};

/// Loads and provides access to fleet configuration.
///
/// # Directory Structure
///
/// ```text
/// config/fleet/
/// ├── rates.yaml    # Rate schedule metadata and per-category rates
/// └── server.yaml   # Optional HTTP server settings
/// ```
///
/// # Example
///
/// ```no_run
/// use fleet_commission::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/fleet")?;
/// let rate = loader.rate_table().rate_for_code("AUA")?;
/// println!("AUA pays ${} per delivery", rate);
/// # Ok::<(), fleet_commission::error::LedgerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rate_table: RateTable,
    server: ServerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound` if `rates.yaml` is missing
    /// - `ConfigParseError` if a file contains invalid YAML or misses fields
    /// - `InvalidConfig` if the rates do not cover exactly the known categories
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();

        let rates_config = Self::load_yaml::<RatesConfig>(&path.join("rates.yaml"))?;
        let rate_table = RateTable::from_config(&rates_config)?;

        let server_path = path.join("server.yaml");
        let server = if server_path.exists() {
            Self::load_yaml::<ServerConfig>(&server_path)?
        } else {
            ServerConfig::default()
        };

        Ok(Self { rate_table, server })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded rate table.
    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }

    /// Consumes the loader, returning the rate table.
    pub fn into_rate_table(self) -> RateTable {
        self.rate_table
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }
}

//! Worker model and related types.
//!
//! This module defines the Worker struct and Role enum for representing
//! drivers, helpers and administrators registered with the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The role a worker holds.
///
/// The ledger does not enforce access rules itself; the role is exposed so
/// the API boundary can decide who may call which operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A truck driver.
    #[default]
    Driver,
    /// A driver's helper.
    Helper,
    /// An administrator who manages counts for everyone.
    Admin,
}

impl Role {
    /// Returns the lower-case name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Driver => "driver",
            Role::Helper => "helper",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LedgerError;

    fn from_str(role: &str) -> Result<Self, Self::Err> {
        match role {
            "driver" => Ok(Role::Driver),
            "helper" => Ok(Role::Helper),
            "admin" => Ok(Role::Admin),
            other => Err(LedgerError::InvalidRole {
                role: other.to_string(),
            }),
        }
    }
}

/// A registered worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker.
    pub id: String,
    /// Unique login name.
    pub username: String,
    /// The worker's role.
    pub role: Role,
    /// When the worker was registered.
    pub created_at: DateTime<Utc>,
}

impl Worker {
    /// Returns true if the worker is an administrator.
    ///
    /// # Examples
    ///
    /// ```
    /// use fleet_commission::models::{Role, Worker};
    /// use chrono::Utc;
    ///
    /// let admin = Worker {
    ///     id: "w-001".to_string(),
    ///     username: "boss".to_string(),
    ///     role: Role::Admin,
    ///     created_at: Utc::now(),
    /// };
    /// assert!(admin.is_admin());
    /// ```
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

//! Error types for the fleet commission ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the ledger can report. All validation errors are raised
//! before any state is mutated.

use thiserror::Error;

/// The main error type for the fleet commission ledger.
///
/// # Example
///
/// ```
/// use fleet_commission::error::LedgerError;
///
/// let error = LedgerError::UnknownCategory {
///     code: "ZZZ".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unknown vehicle category: ZZZ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The category code is outside the fixed set of vehicle categories.
    #[error("Unknown vehicle category: {code}")]
    UnknownCategory {
        /// The code that was not recognised.
        code: String,
    },

    /// A delivery count was negative, fractional or out of range.
    #[error("Invalid delivery count '{value}': {reason}")]
    InvalidCount {
        /// The rejected value as it was supplied.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// No worker is registered under the given id.
    #[error("Worker not found: {worker_id}")]
    WorkerNotFound {
        /// The id that was looked up.
        worker_id: String,
    },

    /// Another worker already holds this username.
    #[error("Username already exists: {username}")]
    DuplicateUsername {
        /// The username that is already taken.
        username: String,
    },

    /// The username is empty or whitespace.
    #[error("Invalid username: {message}")]
    InvalidUsername {
        /// A description of what made the username invalid.
        message: String,
    },

    /// The role is not one of driver, helper or admin.
    #[error("Invalid role '{role}': must be 'driver', 'helper', or 'admin'")]
    InvalidRole {
        /// The rejected role string.
        role: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but describes an unusable rate table.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the problem.
        message: String,
    },
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;

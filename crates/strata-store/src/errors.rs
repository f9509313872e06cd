//! Error helpers for strata-store
//!
//! Driver errors keep their text verbatim; the caller wraps them in the
//! `MigrateError` variant that names the failing step.

use strata_core::errors::DriverError;

/// Result type for connection provider calls
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Convert a rusqlite error, preserving its message
pub fn from_rusqlite(err: rusqlite::Error) -> DriverError {
    DriverError::new(err.to_string())
}

//! Core types shared across Strata crates
//!
//! - **Correlation types**: `RunId` tags every migrate/validate/info run
//! - **Schema constants**: canonical structured-log field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;

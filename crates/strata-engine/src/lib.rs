//! Strata Engine - Orchestration layer
//!
//! Wires the script catalog, ledger reader, reconciler and runner into the
//! three top-level operations: `migrate`, `validate` and `info`.

pub mod commands;

pub use commands::inspect::{info, validate, MigrationInfo, MigrationState, ValidateReport};
pub use commands::migrate::migrate;

//! Strata Core - reconciliation kernel for versioned SQL migrations
//!
//! This crate holds everything that does not touch the file system or a
//! database connection:
//! - Migration descriptors and history records
//! - Script filename parsing (`V1_2__create_users.sql` -> version `1.2`)
//! - Dialect adapter producing history-table statements per database kind
//! - Configuration with defaults and TOML loading
//! - The reconciler that checks a local catalog against the applied history
//! - Diagnostics sink for non-fatal catalog warnings
//! - Error and logging facilities shared by the other crates

pub mod config;
pub mod diagnostics;
pub mod dialect;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod reconcile;
pub mod script_name;

#[doc(hidden)]
pub use strata_core_types as core_types;

// Re-export commonly used types
pub use config::{MigrateConfig, NamingConvention};
pub use diagnostics::{CatalogWarning, Diagnostics};
pub use dialect::{DatabaseKind, Dialect, ParamStyle, ParamValue};
pub use errors::{
    ConfigError, DriverError, ExError, ExErrorKind, MigrateError, Result, ValidationError,
};
pub use model::{HistoryRecord, MigrationDescriptor, NewHistoryRow};
pub use reconcile::{validate, Policy};

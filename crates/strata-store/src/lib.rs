//! Strata Store - file system and database side of a migration run
//!
//! Provides:
//! - Script catalog: scans a directory into checksummed descriptors
//! - Connection capability traits and a SQLite provider
//! - Ledger reader: ensures and reads the schema history table
//! - Migration runner: executes outstanding scripts and records them

pub mod catalog;
pub mod connection;
pub mod db;
pub mod errors;
pub mod ledger;
pub mod migrations;
pub mod sqlite;

// Re-export key types
pub use catalog::scan_catalog;
pub use connection::{HistoryConnection, HistoryRow, HistoryTransaction};
pub use ledger::ensure_and_read;
pub use migrations::{apply_migrations, checksum_file};
pub use sqlite::SqliteConnection;

//! Migration execution
//!
//! Provides:
//! - SHA-256 checksums of script files
//! - The runner that executes outstanding scripts and records them

mod checksums;
mod runner;

pub use checksums::{checksum_file, compute_checksum};
pub use runner::apply_migrations;

//! Command orchestration layer.
//!
//! Every command runs inside a span tagged with a fresh `RunId` and logs one
//! `start` and one `end`/`end_error` event.

pub mod inspect;
pub mod migrate;

use strata_core::config::MigrateConfig;
use strata_core::diagnostics::Diagnostics;
use strata_core::dialect::Dialect;
use strata_core::errors::{ConfigError, Result};
use strata_core::model::{HistoryRecord, MigrationDescriptor};
use strata_store::{ensure_and_read, scan_catalog, HistoryConnection};

/// Validated configuration and the dialect it selects
pub(crate) struct RunContext {
    pub config: MigrateConfig,
    pub dialect: Dialect,
}

impl RunContext {
    /// Apply defaults and check the configuration against the connection
    pub fn prepare(conn: &dyn HistoryConnection, config: &MigrateConfig) -> Result<Self> {
        let config = config.clone().validated()?;
        if config.database_kind != conn.kind() {
            return Err(ConfigError::KindMismatch {
                configured: config.database_kind.to_string(),
                connection: conn.kind().to_string(),
            }
            .into());
        }
        let dialect = Dialect::for_kind(config.database_kind);
        Ok(Self { config, dialect })
    }

    /// Scan the catalog, then ensure and read the history table
    pub fn resolve(
        &self,
        conn: &mut dyn HistoryConnection,
        diagnostics: &mut Diagnostics,
    ) -> Result<(Vec<MigrationDescriptor>, Vec<HistoryRecord>)> {
        let local = scan_catalog(&self.config.location, &self.config.naming(), diagnostics)?;
        let ledger = ensure_and_read(conn, &self.config.table, &self.dialect, diagnostics)?;
        Ok((local, ledger))
    }
}

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

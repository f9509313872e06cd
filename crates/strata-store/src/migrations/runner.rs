//! Migration runner
//!
//! Executes outstanding scripts one at a time. Each script runs in its own
//! transaction; its history row is written in a second transaction once the
//! script has committed. A failure stops the run: earlier scripts stay
//! applied and recorded, later ones are never attempted.

use crate::connection::HistoryConnection;
use std::fs;
use std::path::Path;
use std::time::Instant;
use strata_core::dialect::Dialect;
use strata_core::errors::{MigrateError, Result};
use strata_core::model::{max_installed_rank, HistoryRecord, MigrationDescriptor, NewHistoryRow};
use strata_core::reconcile::outstanding;

/// Apply every local descriptor without a history row
///
/// Must only be called after the reconciler accepted `local` and `ledger`.
/// Returns the number of scripts applied; 0 means the schema is up to date.
pub fn apply_migrations(
    conn: &mut dyn HistoryConnection,
    dialect: &Dialect,
    table: &str,
    location: &Path,
    local: &[MigrationDescriptor],
    ledger: &[HistoryRecord],
) -> Result<usize> {
    let started = Instant::now();
    let insert_sql = dialect.insert_history_row(table);
    let mut installed_rank = max_installed_rank(ledger);
    let mut latest_version = ledger.last().map(|r| r.version.clone());

    match &latest_version {
        Some(version) => tracing::info!("current version of schema: {}", version),
        None => tracing::info!("current version of schema: << Empty Schema >>"),
    }

    let mut applied = 0;
    for descriptor in outstanding(local, ledger) {
        let sql = fs::read_to_string(location.join(&descriptor.script_name)).map_err(|e| {
            MigrateError::ScriptUnreadable {
                script_name: descriptor.script_name.clone(),
                reason: e.to_string(),
            }
        })?;

        let script_started = Instant::now();
        execute_script(conn, descriptor, &sql)?;
        let execution_time_ms = elapsed_ms(script_started);

        installed_rank += 1;
        let row = NewHistoryRow::for_descriptor(descriptor, installed_rank, execution_time_ms);
        record_history(conn, dialect, &insert_sql, &row)?;

        tracing::info!(
            version = %descriptor.version,
            script = %descriptor.script_name,
            installed_rank,
            duration_ms = execution_time_ms,
            "migrating schema to version {} - {}",
            descriptor.version,
            descriptor.description
        );

        applied += 1;
        latest_version = Some(descriptor.version.clone());
    }

    if applied == 0 {
        tracing::info!("schema is up to date, no migration necessary");
    } else {
        tracing::info!(
            applied_count = applied,
            duration_ms = elapsed_ms(started),
            "successfully applied {} migrations to schema, now at version v{}",
            applied,
            latest_version.unwrap_or_default()
        );
    }

    Ok(applied)
}

/// Run one script in its own transaction; rolled back on any failure
fn execute_script(
    conn: &mut dyn HistoryConnection,
    descriptor: &MigrationDescriptor,
    sql: &str,
) -> Result<()> {
    let failed = |cause| MigrateError::MigrationFailed {
        script_name: descriptor.script_name.clone(),
        cause,
    };

    let mut tx = conn.transaction().map_err(failed)?;
    tx.execute_batch(sql).map_err(failed)?;
    tx.commit().map_err(failed)
}

/// Insert the history row in a transaction of its own
fn record_history(
    conn: &mut dyn HistoryConnection,
    dialect: &Dialect,
    insert_sql: &str,
    row: &NewHistoryRow,
) -> Result<()> {
    let failed = |cause| MigrateError::LedgerWriteFailed {
        script_name: row.script_name.clone(),
        version: row.version.clone(),
        cause,
    };

    let mut tx = conn.transaction().map_err(failed)?;
    tx.insert_history(insert_sql, row, dialect.param_style())
        .map_err(failed)?;
    tx.commit().map_err(failed)
}

fn elapsed_ms(since: Instant) -> i64 {
    i64::try_from(since.elapsed().as_millis()).unwrap_or(i64::MAX)
}

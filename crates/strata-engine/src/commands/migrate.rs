//! Migrate command: scan, read history, reconcile, apply

use std::time::Instant;

use strata_core::config::MigrateConfig;
use strata_core::diagnostics::Diagnostics;
use strata_core::errors::Result;
use strata_core::reconcile;
use strata_core::{log_op_end, log_op_error, log_op_start};
use strata_core_types::RunId;
use strata_store::{apply_migrations, HistoryConnection};

use super::{elapsed_ms, RunContext};

/// Bring the database schema up to date with the scripts under `config.location`
///
/// Steps run in order and the first failure is returned unchanged:
/// configuration, catalog scan, history read, reconciliation, apply.
/// Nothing is executed unless reconciliation succeeds.
///
/// Returns the number of scripts applied by this run.
pub fn migrate(
    conn: &mut dyn HistoryConnection,
    config: &MigrateConfig,
    diagnostics: &mut Diagnostics,
) -> Result<usize> {
    let run_id = RunId::new();
    let span = tracing::info_span!("migrate", run_id = %run_id);
    let _guard = span.enter();

    let start = Instant::now();
    log_op_start!("migrate", location = %config.location.display());

    match run(conn, config, diagnostics) {
        Ok(applied) => {
            log_op_end!(
                "migrate",
                duration_ms = elapsed_ms(start),
                applied_count = applied
            );
            Ok(applied)
        }
        Err(err) => {
            log_op_error!("migrate", &err, duration_ms = elapsed_ms(start));
            Err(err)
        }
    }
}

fn run(
    conn: &mut dyn HistoryConnection,
    config: &MigrateConfig,
    diagnostics: &mut Diagnostics,
) -> Result<usize> {
    let ctx = RunContext::prepare(conn, config)?;
    let (local, ledger) = ctx.resolve(conn, diagnostics)?;

    reconcile::validate(&local, &ledger, ctx.config.policy())?;
    tracing::info!(
        local_count = local.len(),
        "successfully validated {} migrations",
        local.len()
    );

    apply_migrations(
        conn,
        &ctx.dialect,
        &ctx.config.table,
        &ctx.config.location,
        &local,
        &ledger,
    )
}

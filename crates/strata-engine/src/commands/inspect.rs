//! Read-only commands: `validate` and `info`
//!
//! Both create the history table when it is missing (the same ensure step a
//! migrate run performs) but never execute a script or write a history row.

use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

use chrono::NaiveDateTime;
use serde::Serialize;
use strata_core::config::MigrateConfig;
use strata_core::diagnostics::Diagnostics;
use strata_core::errors::Result;
use strata_core::model::{HistoryRecord, MigrationDescriptor};
use strata_core::reconcile;
use strata_core::{log_op_end, log_op_error, log_op_start};
use strata_core_types::RunId;
use strata_store::HistoryConnection;

use super::{elapsed_ms, RunContext};

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateReport {
    /// Scripts resolved from the catalog
    pub validated: usize,
    /// Rows in the history table
    pub applied: usize,
    /// Scripts a migrate run would execute next
    pub pending: usize,
}

/// Where a version stands between the catalog and the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    /// Recorded in the history
    Applied,
    /// On disk, not yet recorded
    Pending,
    /// Recorded in the history, no script on disk
    Missing,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            MigrationState::Applied => "Applied",
            MigrationState::Pending => "Pending",
            MigrationState::Missing => "Missing",
        })
    }
}

/// One line of the `info` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationInfo {
    pub version: String,
    pub description: String,
    pub script_name: String,
    pub state: MigrationState,
    pub installed_rank: Option<i64>,
    pub installed_on: Option<NaiveDateTime>,
    pub execution_time_ms: Option<i64>,
}

impl MigrationInfo {
    fn pending(descriptor: &MigrationDescriptor) -> Self {
        Self {
            version: descriptor.version.clone(),
            description: descriptor.description.clone(),
            script_name: descriptor.script_name.clone(),
            state: MigrationState::Pending,
            installed_rank: None,
            installed_on: None,
            execution_time_ms: None,
        }
    }

    fn recorded(record: &HistoryRecord, state: MigrationState) -> Self {
        Self {
            version: record.version.clone(),
            description: record.description.clone(),
            script_name: record.script_name.clone(),
            state,
            installed_rank: Some(record.installed_rank),
            installed_on: record.installed_on,
            execution_time_ms: Some(record.execution_time_ms),
        }
    }
}

/// Check the catalog against the history without applying anything
pub fn validate(
    conn: &mut dyn HistoryConnection,
    config: &MigrateConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ValidateReport> {
    let run_id = RunId::new();
    let span = tracing::info_span!("validate", run_id = %run_id);
    let _guard = span.enter();

    let start = Instant::now();
    log_op_start!("validate", location = %config.location.display());

    let result = run_validate(conn, config, diagnostics);
    match &result {
        Ok(report) => {
            log_op_end!(
                "validate",
                duration_ms = elapsed_ms(start),
                local_count = report.validated,
                ledger_count = report.applied
            );
        }
        Err(err) => {
            log_op_error!("validate", err, duration_ms = elapsed_ms(start));
        }
    }
    result
}

fn run_validate(
    conn: &mut dyn HistoryConnection,
    config: &MigrateConfig,
    diagnostics: &mut Diagnostics,
) -> Result<ValidateReport> {
    let ctx = RunContext::prepare(conn, config)?;
    let (local, ledger) = ctx.resolve(conn, diagnostics)?;

    reconcile::validate(&local, &ledger, ctx.config.policy())?;
    tracing::info!(
        local_count = local.len(),
        "successfully validated {} migrations",
        local.len()
    );

    Ok(ValidateReport {
        validated: local.len(),
        applied: ledger.len(),
        pending: reconcile::outstanding(&local, &ledger).len(),
    })
}

/// List every known version with its state, ordered by version
///
/// Does not reconcile: a catalog that would fail validation is still listed.
pub fn info(
    conn: &mut dyn HistoryConnection,
    config: &MigrateConfig,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<MigrationInfo>> {
    let run_id = RunId::new();
    let span = tracing::info_span!("info", run_id = %run_id);
    let _guard = span.enter();

    let start = Instant::now();
    log_op_start!("info", location = %config.location.display());

    let result = RunContext::prepare(conn, config)
        .and_then(|ctx| ctx.resolve(conn, diagnostics))
        .map(|(local, ledger)| merge(&local, &ledger));
    match &result {
        Ok(rows) => {
            log_op_end!("info", duration_ms = elapsed_ms(start), count = rows.len());
        }
        Err(err) => {
            log_op_error!("info", err, duration_ms = elapsed_ms(start));
        }
    }
    result
}

/// Combine both sides into one version-ordered listing
fn merge(local: &[MigrationDescriptor], ledger: &[HistoryRecord]) -> Vec<MigrationInfo> {
    let applied: HashMap<&str, &HistoryRecord> =
        ledger.iter().map(|r| (r.version.as_str(), r)).collect();

    let mut rows: Vec<MigrationInfo> = local
        .iter()
        .map(|d| match applied.get(d.version.as_str()) {
            Some(record) => MigrationInfo::recorded(record, MigrationState::Applied),
            None => MigrationInfo::pending(d),
        })
        .collect();

    rows.extend(
        ledger
            .iter()
            .filter(|r| !local.iter().any(|d| d.version == r.version))
            .map(|r| MigrationInfo::recorded(r, MigrationState::Missing)),
    );

    rows.sort_by(|a, b| a.version.cmp(&b.version));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(version: &str) -> MigrationDescriptor {
        MigrationDescriptor {
            version: version.to_string(),
            description: format!("d{}", version),
            script_name: format!("V{}__d{}.sql", version, version),
            checksum: "c".to_string(),
        }
    }

    fn record(rank: i64, version: &str) -> HistoryRecord {
        HistoryRecord {
            installed_rank: rank,
            version: version.to_string(),
            description: format!("d{}", version),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_states_in_version_order() {
        let local = vec![descriptor("1"), descriptor("3")];
        let ledger = vec![record(1, "1"), record(2, "2")];

        let rows = merge(&local, &ledger);

        let states: Vec<(&str, MigrationState)> =
            rows.iter().map(|r| (r.version.as_str(), r.state)).collect();
        assert_eq!(
            states,
            vec![
                ("1", MigrationState::Applied),
                ("2", MigrationState::Missing),
                ("3", MigrationState::Pending),
            ]
        );
        assert_eq!(rows[0].installed_rank, Some(1));
        assert_eq!(rows[2].installed_rank, None);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge(&[], &[]).is_empty());
    }
}

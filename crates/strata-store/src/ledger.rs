//! History ledger reader

use crate::connection::{HistoryConnection, HistoryRow};
use chrono::{DateTime, NaiveDateTime};
use strata_core::dialect::Dialect;
use strata_core::diagnostics::{CatalogWarning, Diagnostics};
use strata_core::errors::{DriverError, MigrateError, Result};
use strata_core::model::HistoryRecord;

const TIMESTAMP_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.fZ",
];

/// Parse a driver timestamp; `None` when no known format matches
pub fn parse_installed_on(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn to_record(row: HistoryRow, diagnostics: &mut Diagnostics) -> HistoryRecord {
    let version = row.version.unwrap_or_default();
    let installed_on = row.installed_on.and_then(|raw| {
        let parsed = parse_installed_on(&raw);
        if parsed.is_none() {
            diagnostics.warn(CatalogWarning::UnparseableInstalledOn {
                version: version.clone(),
                raw,
            });
        }
        parsed
    });

    HistoryRecord {
        installed_rank: row.installed_rank.unwrap_or_default(),
        version,
        description: row.description.unwrap_or_default(),
        script_type: row.script_type.unwrap_or_default(),
        script_name: row.script_name.unwrap_or_default(),
        checksum: row.checksum.unwrap_or_default(),
        installed_by: row.installed_by.unwrap_or_default(),
        installed_on,
        execution_time_ms: row.execution_time.unwrap_or_default(),
        success: row.success.unwrap_or_default(),
    }
}

/// Create the history table if needed and read it ordered by version
pub fn ensure_and_read(
    conn: &mut dyn HistoryConnection,
    table: &str,
    dialect: &Dialect,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<HistoryRecord>> {
    let unavailable = |cause: DriverError| MigrateError::LedgerUnavailable {
        table: table.to_string(),
        cause,
    };

    conn.execute(&dialect.create_history_table(table))
        .map_err(unavailable)?;
    let rows = conn
        .query_history(&dialect.select_history(table))
        .map_err(unavailable)?;

    let mut records: Vec<HistoryRecord> = rows
        .into_iter()
        .map(|row| to_record(row, diagnostics))
        .collect();
    // collations differ between servers; the reconciler expects byte order
    records.sort_by(|a, b| a.version.cmp(&b.version));

    tracing::debug!(
        component = module_path!(),
        table,
        ledger_count = records.len(),
        "read schema history"
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_current_timestamp() {
        let parsed = parse_installed_on("2024-03-01 12:30:45").unwrap();
        assert_eq!(parsed.to_string(), "2024-03-01 12:30:45");
    }

    #[test]
    fn test_parse_rfc3339_and_fractional() {
        assert!(parse_installed_on("2024-03-01T12:30:45Z").is_some());
        assert!(parse_installed_on("2024-03-01T12:30:45+02:00").is_some());
        assert!(parse_installed_on("2024-03-01 12:30:45.123456").is_some());
    }

    #[test]
    fn test_unparseable_timestamp_degrades_to_none() {
        let mut diagnostics = Diagnostics::quiet();
        let row = HistoryRow {
            installed_rank: Some(1),
            version: Some("1".to_string()),
            installed_on: Some("yesterday".to_string()),
            ..Default::default()
        };

        let record = to_record(row, &mut diagnostics);

        assert_eq!(record.installed_on, None);
        assert_eq!(record.installed_rank, 1);
        assert_eq!(
            diagnostics.warnings(),
            &[CatalogWarning::UnparseableInstalledOn {
                version: "1".to_string(),
                raw: "yesterday".to_string(),
            }]
        );
    }

    #[test]
    fn test_null_columns_degrade_to_zero_values() {
        let mut diagnostics = Diagnostics::quiet();
        let record = to_record(HistoryRow::default(), &mut diagnostics);
        assert_eq!(record, HistoryRecord::default());
        assert!(diagnostics.warnings().is_empty());
    }
}

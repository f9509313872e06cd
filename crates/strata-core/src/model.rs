//! Migration descriptors and history records

use chrono::NaiveDateTime;
use serde::Serialize;

/// Script type recorded for every history row
pub const SCRIPT_TYPE_SQL: &str = "sql";

/// A migration script resolved from the local catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationDescriptor {
    /// Dot-normalized version (`1_2` on disk becomes `1.2`)
    pub version: String,
    pub description: String,
    /// File name relative to the migrations location
    pub script_name: String,
    /// Lowercase hex SHA-256 of the file bytes
    pub checksum: String,
}

/// One row of the schema history table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HistoryRecord {
    pub installed_rank: i64,
    pub version: String,
    pub description: String,
    pub script_type: String,
    pub script_name: String,
    pub checksum: String,
    pub installed_by: String,
    /// Absent when the column was null or not parseable
    pub installed_on: Option<NaiveDateTime>,
    pub execution_time_ms: i64,
    pub success: bool,
}

/// Values bound when inserting a history row
///
/// `installed_by`, `installed_on` and `success` are supplied by the insert
/// statement itself, so they are not part of this struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryRow {
    pub installed_rank: i64,
    pub version: String,
    pub description: String,
    pub script_type: String,
    pub script_name: String,
    pub checksum: String,
    pub execution_time_ms: i64,
}

impl NewHistoryRow {
    /// Build the row for a freshly executed descriptor
    pub fn for_descriptor(
        descriptor: &MigrationDescriptor,
        installed_rank: i64,
        execution_time_ms: i64,
    ) -> Self {
        Self {
            installed_rank,
            version: descriptor.version.clone(),
            description: descriptor.description.clone(),
            script_type: SCRIPT_TYPE_SQL.to_string(),
            script_name: descriptor.script_name.clone(),
            checksum: descriptor.checksum.clone(),
            execution_time_ms,
        }
    }
}

/// Highest installed rank in the history, 0 when empty
pub fn max_installed_rank(ledger: &[HistoryRecord]) -> i64 {
    ledger
        .iter()
        .map(|r| r.installed_rank)
        .max()
        .unwrap_or(0)
        .max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(rank: i64, version: &str) -> HistoryRecord {
        HistoryRecord {
            installed_rank: rank,
            version: version.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_max_installed_rank_empty() {
        assert_eq!(max_installed_rank(&[]), 0);
    }

    #[test]
    fn test_max_installed_rank_ignores_order() {
        let ledger = vec![record(3, "1"), record(7, "2"), record(5, "3")];
        assert_eq!(max_installed_rank(&ledger), 7);
    }

    #[test]
    fn test_new_row_copies_descriptor() {
        let descriptor = MigrationDescriptor {
            version: "1.2".to_string(),
            description: "add users".to_string(),
            script_name: "V1_2__add_users.sql".to_string(),
            checksum: "abc".to_string(),
        };
        let row = NewHistoryRow::for_descriptor(&descriptor, 4, 12);
        assert_eq!(row.installed_rank, 4);
        assert_eq!(row.version, "1.2");
        assert_eq!(row.script_type, "sql");
        assert_eq!(row.execution_time_ms, 12);
    }
}

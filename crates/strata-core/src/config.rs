//! Run configuration
//!
//! Defaults follow the conventional Flyway layout: `V<version>__<description>.sql`
//! files recorded in a `goflyway_schema_history` table.

use crate::dialect::DatabaseKind;
use crate::errors::ConfigError;
use crate::reconcile::Policy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_TABLE: &str = "goflyway_schema_history";
pub const DEFAULT_PREFIX: &str = "V";
pub const DEFAULT_SEPARATOR: &str = "__";
/// Only SQL scripts are resolved
pub const SQL_SUFFIX: &str = ".sql";

/// Options consumed by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    /// Name of the schema history table
    pub table: String,
    /// File name prefix for SQL migrations
    pub prefix: String,
    /// Separator between version and description
    pub separator: String,
    /// Directory holding the migration scripts
    pub location: PathBuf,
    /// Allow applying scripts whose version sorts before applied history
    pub out_of_order: bool,
    /// Do not fail when applied versions have no local script
    pub ignore_missing_migrations: bool,
    pub database_kind: DatabaseKind,
    /// Log catalog warnings as they are recorded
    pub verbose: bool,
    /// SQLite database file, used by the command line front end
    pub database: Option<PathBuf>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            location: PathBuf::new(),
            out_of_order: false,
            ignore_missing_migrations: false,
            database_kind: DatabaseKind::default(),
            verbose: false,
            database: None,
        }
    }
}

impl MigrateConfig {
    pub fn new(location: impl Into<PathBuf>, database_kind: DatabaseKind) -> Self {
        Self {
            location: location.into(),
            database_kind,
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Load a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Fill blank naming options with defaults and check required ones
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.table.trim().is_empty() {
            self.table = DEFAULT_TABLE.to_string();
        }
        if self.prefix.is_empty() {
            self.prefix = DEFAULT_PREFIX.to_string();
        }
        if self.separator.is_empty() {
            self.separator = DEFAULT_SEPARATOR.to_string();
        }
        if self.location.as_os_str().is_empty() {
            return Err(ConfigError::LocationEmpty);
        }
        Ok(self)
    }

    pub fn policy(&self) -> Policy {
        Policy {
            out_of_order: self.out_of_order,
            ignore_missing_migrations: self.ignore_missing_migrations,
        }
    }

    pub fn naming(&self) -> NamingConvention {
        NamingConvention {
            prefix: self.prefix.clone(),
            separator: self.separator.clone(),
            suffix: SQL_SUFFIX.to_string(),
        }
    }
}

/// How script file names are split into version and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    pub prefix: String,
    pub separator: String,
    pub suffix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            separator: DEFAULT_SEPARATOR.to_string(),
            suffix: SQL_SUFFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MigrateConfig::default();
        assert_eq!(config.table, "goflyway_schema_history");
        assert_eq!(config.prefix, "V");
        assert_eq!(config.separator, "__");
        assert!(!config.out_of_order);
        assert!(!config.ignore_missing_migrations);
    }

    #[test]
    fn test_empty_location_rejected() {
        let config = MigrateConfig::default();
        assert_eq!(config.validated(), Err(ConfigError::LocationEmpty));
    }

    #[test]
    fn test_blank_naming_falls_back_to_defaults() {
        let config = MigrateConfig {
            table: String::new(),
            prefix: String::new(),
            separator: String::new(),
            ..MigrateConfig::new("migrations", DatabaseKind::Postgres)
        }
        .validated()
        .unwrap();

        assert_eq!(config.table, DEFAULT_TABLE);
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.separator, DEFAULT_SEPARATOR);
        assert_eq!(config.naming().suffix, ".sql");
    }

    #[test]
    fn test_from_toml() {
        let config = MigrateConfig::from_toml_str(
            r#"
            location = "db/migrations"
            database_kind = "mysql"
            out_of_order = true
            table = "history"
            "#,
        )
        .unwrap();

        assert_eq!(config.location, PathBuf::from("db/migrations"));
        assert_eq!(config.database_kind, DatabaseKind::MySql);
        assert!(config.out_of_order);
        assert_eq!(config.table, "history");
        assert_eq!(config.prefix, "V");
        assert!(config.policy().out_of_order);
    }

    #[test]
    fn test_unknown_database_kind_in_toml() {
        let err = MigrateConfig::from_toml_str(
            r#"
            location = "db"
            database_kind = "oracle"
            "#,
        )
        .unwrap_err();

        match err {
            ConfigError::Malformed { reason } => {
                assert!(reason.contains("unsupported database driver: oracle"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MigrateConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }
}

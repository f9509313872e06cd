//! Dialect adapter for the schema history table
//!
//! Every supported database kind gets a fixed set of statements with its own
//! identifier quoting and placeholder style. The table name is quoted as an
//! identifier, never spliced into a template.

use crate::errors::ConfigError;
use crate::model::NewHistoryRow;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Supported database kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DatabaseKind {
    Postgres,
    MySql,
    MsSqlServer,
    #[default]
    Sqlite,
}

impl DatabaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Postgres => "postgres",
            DatabaseKind::MySql => "mysql",
            DatabaseKind::MsSqlServer => "mssql",
            DatabaseKind::Sqlite => "sqlite",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            "mysql" => Ok(DatabaseKind::MySql),
            "mssql" | "sqlserver" | "mssqlserver" => Ok(DatabaseKind::MsSqlServer),
            "sqlite" | "sqlite3" => Ok(DatabaseKind::Sqlite),
            _ => Err(ConfigError::UnsupportedDatabaseKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for DatabaseKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Placeholder style used by the insert statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `$1`, `$2`, ...
    Ordinal,
    /// `?`
    Positional,
    /// `@installed_rank`, `@version`, ...
    Named,
}

/// A bound insert parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

/// Logical order of the bound insert columns
pub const INSERT_PARAM_NAMES: [&str; 7] = [
    "installed_rank",
    "version",
    "description",
    "type",
    "script",
    "checksum",
    "execution_time",
];

impl NewHistoryRow {
    /// Parameters in insert order, for ordinal and positional styles
    pub fn positional_params(&self) -> Vec<ParamValue> {
        vec![
            ParamValue::Int(self.installed_rank),
            ParamValue::Text(self.version.clone()),
            ParamValue::Text(self.description.clone()),
            ParamValue::Text(self.script_type.clone()),
            ParamValue::Text(self.script_name.clone()),
            ParamValue::Text(self.checksum.clone()),
            ParamValue::Int(self.execution_time_ms),
        ]
    }

    /// Parameters keyed by `@name`, for the named style
    pub fn named_params(&self) -> Vec<(String, ParamValue)> {
        INSERT_PARAM_NAMES
            .iter()
            .map(|name| format!("@{}", name))
            .zip(self.positional_params())
            .collect()
    }
}

/// Statement builder for one database kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    kind: DatabaseKind,
}

impl Dialect {
    pub fn for_kind(kind: DatabaseKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> DatabaseKind {
        self.kind
    }

    pub fn param_style(&self) -> ParamStyle {
        match self.kind {
            DatabaseKind::Postgres => ParamStyle::Ordinal,
            DatabaseKind::MySql | DatabaseKind::Sqlite => ParamStyle::Positional,
            DatabaseKind::MsSqlServer => ParamStyle::Named,
        }
    }

    /// Quote an identifier, doubling any embedded closing quote
    pub fn quote_ident(&self, ident: &str) -> String {
        match self.kind {
            DatabaseKind::Postgres | DatabaseKind::Sqlite => {
                format!("\"{}\"", ident.replace('"', "\"\""))
            }
            DatabaseKind::MySql => format!("`{}`", ident.replace('`', "``")),
            DatabaseKind::MsSqlServer => format!("[{}]", ident.replace(']', "]]")),
        }
    }

    fn quote_literal(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }

    fn primary_key_name(&self, table: &str) -> String {
        self.quote_ident(&format!("pk_{}", table))
    }

    /// Create the history table unless it already exists
    pub fn create_history_table(&self, table: &str) -> String {
        let t = self.quote_ident(table);
        let pk = self.primary_key_name(table);
        let q = |c: &str| self.quote_ident(c);
        match self.kind {
            DatabaseKind::Postgres => format!(
                "CREATE TABLE IF NOT EXISTS {t} (\
                 installed_rank BIGINT NOT NULL, \
                 {version} VARCHAR(255), \
                 description VARCHAR(255), \
                 {ty} VARCHAR(50), \
                 {script} VARCHAR(255), \
                 checksum VARCHAR(255), \
                 installed_by VARCHAR(255), \
                 installed_on TIMESTAMP, \
                 execution_time BIGINT, \
                 success BOOLEAN, \
                 CONSTRAINT {pk} PRIMARY KEY (installed_rank))",
                version = q("version"),
                ty = q("type"),
                script = q("script"),
            ),
            DatabaseKind::MySql => format!(
                "CREATE TABLE IF NOT EXISTS {t} (\
                 installed_rank BIGINT NOT NULL, \
                 {version} VARCHAR(255), \
                 description VARCHAR(255), \
                 {ty} VARCHAR(50), \
                 {script} VARCHAR(255), \
                 checksum VARCHAR(255), \
                 installed_by VARCHAR(255), \
                 installed_on TIMESTAMP, \
                 execution_time BIGINT, \
                 success BOOLEAN, \
                 CONSTRAINT {pk} PRIMARY KEY (installed_rank)\
                 ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE utf8mb4_bin",
                version = q("version"),
                ty = q("type"),
                script = q("script"),
            ),
            DatabaseKind::MsSqlServer => format!(
                "IF NOT EXISTS (SELECT * FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = {name}) \
                 CREATE TABLE {t} (\
                 installed_rank BIGINT NOT NULL, \
                 {version} VARCHAR(255), \
                 description VARCHAR(255), \
                 {ty} VARCHAR(50), \
                 {script} VARCHAR(255), \
                 checksum VARCHAR(255), \
                 installed_by VARCHAR(255), \
                 installed_on DATETIME, \
                 execution_time BIGINT, \
                 success BIT, \
                 CONSTRAINT {pk} PRIMARY KEY (installed_rank))",
                name = Self::quote_literal(table),
                version = q("version"),
                ty = q("type"),
                script = q("script"),
            ),
            DatabaseKind::Sqlite => format!(
                "CREATE TABLE IF NOT EXISTS {t} (\
                 installed_rank INTEGER NOT NULL, \
                 {version} VARCHAR(255), \
                 description VARCHAR(255), \
                 {ty} VARCHAR(50), \
                 {script} VARCHAR(255), \
                 checksum VARCHAR(255), \
                 installed_by VARCHAR(255), \
                 installed_on TIMESTAMP, \
                 execution_time INTEGER, \
                 success BOOLEAN, \
                 CONSTRAINT {pk} PRIMARY KEY (installed_rank))",
                version = q("version"),
                ty = q("type"),
                script = q("script"),
            ),
        }
    }

    /// Select every history row ordered by version
    pub fn select_history(&self, table: &str) -> String {
        let q = |c: &str| self.quote_ident(c);
        format!(
            "SELECT installed_rank, {version}, description, {ty}, {script}, \
             checksum, installed_by, installed_on, execution_time, success \
             FROM {t} ORDER BY {version}",
            t = q(table),
            version = q("version"),
            ty = q("type"),
            script = q("script"),
        )
    }

    /// Insert one history row; installer, timestamp and success are server supplied
    pub fn insert_history_row(&self, table: &str) -> String {
        let q = |c: &str| self.quote_ident(c);
        let placeholders: Vec<String> = match self.param_style() {
            ParamStyle::Ordinal => (1..=INSERT_PARAM_NAMES.len())
                .map(|i| format!("${}", i))
                .collect(),
            ParamStyle::Positional => match self.kind {
                // numbered so the driver can bind by index
                DatabaseKind::Sqlite => (1..=INSERT_PARAM_NAMES.len())
                    .map(|i| format!("?{}", i))
                    .collect(),
                _ => vec!["?".to_string(); INSERT_PARAM_NAMES.len()],
            },
            ParamStyle::Named => INSERT_PARAM_NAMES
                .iter()
                .map(|n| format!("@{}", n))
                .collect(),
        };
        let (installed_by, installed_on, success) = match self.kind {
            DatabaseKind::Postgres => ("current_user", "current_timestamp", "true"),
            DatabaseKind::MySql => ("current_user()", "current_timestamp", "true"),
            DatabaseKind::MsSqlServer => ("current_user", "current_timestamp", "1"),
            DatabaseKind::Sqlite => ("'sqlite'", "CURRENT_TIMESTAMP", "1"),
        };
        let p = &placeholders;
        format!(
            "INSERT INTO {t} (installed_rank, {version}, description, {ty}, {script}, \
             checksum, installed_by, installed_on, execution_time, success) \
             VALUES ({}, {}, {}, {}, {}, {}, {installed_by}, {installed_on}, {}, {success})",
            p[0],
            p[1],
            p[2],
            p[3],
            p[4],
            p[5],
            p[6],
            t = q(table),
            version = q("version"),
            ty = q("type"),
            script = q("script"),
        )
    }
}

//! Subcommands and the options they share

pub mod info;
pub mod migrate;
pub mod validate;

use clap::Args;
use std::path::PathBuf;
use strata_core::config::MigrateConfig;
use strata_core::diagnostics::Diagnostics;
use strata_core::dialect::DatabaseKind;
use strata_core::errors::ConfigError;
use strata_store::SqliteConnection;

/// Options common to every subcommand
///
/// Values given on the command line override those from `--config`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// TOML configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Directory holding the migration scripts
    #[arg(long, short)]
    pub location: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Schema history table name
    #[arg(long)]
    pub table: Option<String>,

    /// Script file name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Separator between version and description
    #[arg(long)]
    pub separator: Option<String>,

    /// Allow scripts whose version sorts before applied history
    #[arg(long)]
    pub out_of_order: bool,

    /// Do not fail on applied versions without a local script
    #[arg(long)]
    pub ignore_missing: bool,

    /// Log skipped scripts and other catalog warnings
    #[arg(long, short)]
    pub verbose: bool,
}

impl RunArgs {
    /// Merge the config file (if any) with command line flags
    pub fn to_config(&self) -> Result<MigrateConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => MigrateConfig::from_file(path)?,
            None => MigrateConfig {
                database_kind: DatabaseKind::Sqlite,
                ..MigrateConfig::default()
            },
        };

        if let Some(location) = &self.location {
            config.location = location.clone();
        }
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        if let Some(table) = &self.table {
            config.table = table.clone();
        }
        if let Some(prefix) = &self.prefix {
            config.prefix = prefix.clone();
        }
        if let Some(separator) = &self.separator {
            config.separator = separator.clone();
        }
        config.out_of_order |= self.out_of_order;
        config.ignore_missing_migrations |= self.ignore_missing;
        config.verbose |= self.verbose;

        Ok(config)
    }
}

/// Everything a subcommand needs to call into the engine
pub struct Session {
    pub conn: SqliteConnection,
    pub config: MigrateConfig,
    pub diagnostics: Diagnostics,
}

/// Resolve configuration and open the database
pub fn open_session(args: &RunArgs) -> Result<Session, Box<dyn std::error::Error>> {
    let config = args.to_config()?;
    let path = config.database.clone().ok_or(ConfigError::ConnectionMissing)?;
    let conn = strata_store::db::open(&path)?;
    let diagnostics = Diagnostics::new(config.verbose);

    Ok(Session {
        conn,
        config,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        run: RunArgs,
    }

    #[test]
    fn test_flags_without_config_file() {
        let cli = TestCli::parse_from([
            "strata",
            "--location",
            "migrations",
            "--database",
            "app.db",
            "--out-of-order",
        ]);

        let config = cli.run.to_config().unwrap();

        assert_eq!(config.location, PathBuf::from("migrations"));
        assert_eq!(config.database, Some(PathBuf::from("app.db")));
        assert!(config.out_of_order);
        assert!(!config.ignore_missing_migrations);
        assert_eq!(config.table, "goflyway_schema_history");
        assert_eq!(config.database_kind, DatabaseKind::Sqlite);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.toml");
        std::fs::write(
            &path,
            "location = \"from_file\"\ntable = \"file_history\"\nignore_missing_migrations = true\n",
        )
        .unwrap();
        let cli = TestCli::parse_from([
            "strata",
            "--config",
            path.to_str().unwrap(),
            "--table",
            "flag_history",
        ]);

        let config = cli.run.to_config().unwrap();

        assert_eq!(config.location, PathBuf::from("from_file"));
        assert_eq!(config.table, "flag_history");
        assert!(config.ignore_missing_migrations);
    }

    #[test]
    fn test_missing_database_is_reported() {
        let cli = TestCli::parse_from(["strata", "--location", "migrations"]);

        let err = open_session(&cli.run).err().unwrap();

        assert_eq!(err.to_string(), ConfigError::ConnectionMissing.to_string());
    }
}

use thiserror::Error;

/// Result type alias using MigrateError
pub type Result<T> = std::result::Result<T, MigrateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers and tests can match on
/// without parsing message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidConfig,

    // Catalog / ledger access
    CatalogUnavailable,
    LedgerUnavailable,

    // Reconciliation
    DuplicateVersion,
    ChecksumMismatch,
    DescriptionMismatch,
    OutOfOrder,
    MissingMigration,

    // Application
    ScriptUnreadable,
    MigrationFailed,
    LedgerWriteFailed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::CatalogUnavailable => "ERR_CATALOG_UNAVAILABLE",
            ExErrorKind::LedgerUnavailable => "ERR_LEDGER_UNAVAILABLE",
            ExErrorKind::DuplicateVersion => "ERR_DUPLICATE_VERSION",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::DescriptionMismatch => "ERR_DESCRIPTION_MISMATCH",
            ExErrorKind::OutOfOrder => "ERR_OUT_OF_ORDER",
            ExErrorKind::MissingMigration => "ERR_MISSING_MIGRATION",
            ExErrorKind::ScriptUnreadable => "ERR_SCRIPT_UNREADABLE",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::LedgerWriteFailed => "ERR_LEDGER_WRITE_FAILED",
        }
    }

    /// Whether the run aborted before any schema mutation
    pub fn is_pre_mutation(&self) -> bool {
        !matches!(
            self,
            ExErrorKind::ScriptUnreadable
                | ExErrorKind::MigrationFailed
                | ExErrorKind::LedgerWriteFailed
        )
    }
}

/// Canonical structured error type
///
/// Flattened view of a [`MigrateError`] with classification fields, used by
/// the logging macros and the CLI.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    version: Option<String>,
    script_name: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            version: None,
            script_name: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration version context
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add script name context
    pub fn with_script_name(mut self, script_name: impl Into<String>) -> Self {
        self.script_name = Some(script_name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn script_name(&self) -> Option<&str> {
        self.script_name.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(version) = &self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(script_name) = &self.script_name {
            write!(f, " (script: {})", script_name)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error reported by a connection provider
///
/// The driver's message is kept verbatim; context is added by the variant of
/// [`MigrateError`] that wraps it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Configuration problems detected before a run starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("migration location cannot be empty")]
    LocationEmpty,

    #[error("unsupported database driver: {0}")]
    UnsupportedDatabaseKind(String),

    #[error("database connection is missing")]
    ConnectionMissing,

    #[error("configured database kind {configured} does not match connection kind {connection}")]
    KindMismatch {
        configured: String,
        connection: String,
    },

    #[error("cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("malformed config: {reason}")]
    Malformed { reason: String },
}

/// Inconsistency between the local catalog and the applied history
///
/// Message texts are kept stable so existing tooling that greps for them
/// keeps working.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Two or more local scripts resolve to the same version
    #[error("found more than one migration with version {version}: {script_names}")]
    DuplicateVersion {
        version: String,
        script_names: String,
    },

    /// An applied script was edited on disk after it ran
    #[error("migration checksum mismatch for migration version {version}: applied to database = {ledger_checksum}, resolved locally = {local_checksum}")]
    ChecksumMismatch {
        version: String,
        ledger_checksum: String,
        local_checksum: String,
    },

    /// An applied script was renamed on disk after it ran
    #[error("migration description mismatch for migration version {version}: applied to database = {ledger_description}, resolved locally = {local_description}")]
    DescriptionMismatch {
        version: String,
        ledger_description: String,
        local_description: String,
    },

    /// An unapplied script sorts before already-applied history
    #[error("detected resolved migration not applied to database: {version}, to allow executing this migration, set OutOfOrder=true")]
    OutOfOrder { version: String },

    /// The history holds a version that has no local script
    #[error("detected applied migration not resolved locally: {version}")]
    MissingLocalMigration { version: String },
}

impl ValidationError {
    /// The version the inconsistency was detected on
    pub fn version(&self) -> &str {
        match self {
            ValidationError::DuplicateVersion { version, .. }
            | ValidationError::ChecksumMismatch { version, .. }
            | ValidationError::DescriptionMismatch { version, .. }
            | ValidationError::OutOfOrder { version }
            | ValidationError::MissingLocalMigration { version } => version,
        }
    }
}

/// Comprehensive error taxonomy for a migration run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrateError {
    /// Run never started
    #[error("invalid configuration: {0}")]
    ConfigInvalid(#[from] ConfigError),

    /// The migrations directory itself could not be listed
    #[error("error reading local migrations from {location}: {reason}")]
    CatalogUnavailable { location: String, reason: String },

    /// History table could not be created or selected
    #[error("error reading migration table {table}: {cause}")]
    LedgerUnavailable { table: String, cause: DriverError },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Script text could not be read right before execution
    #[error("migration {script_name} failed: cannot read script: {reason}")]
    ScriptUnreadable { script_name: String, reason: String },

    /// Script execution failed and its transaction was rolled back
    #[error("migration {script_name} failed: {cause}")]
    MigrationFailed {
        script_name: String,
        cause: DriverError,
    },

    /// Script committed but its history row could not be written
    #[error("error inserting migration history for {script_name} (version {version}): {cause}")]
    LedgerWriteFailed {
        script_name: String,
        version: String,
        cause: DriverError,
    },
}

impl MigrateError {
    /// Get the canonical error kind
    pub fn kind(&self) -> ExErrorKind {
        match self {
            MigrateError::ConfigInvalid(_) => ExErrorKind::InvalidConfig,
            MigrateError::CatalogUnavailable { .. } => ExErrorKind::CatalogUnavailable,
            MigrateError::LedgerUnavailable { .. } => ExErrorKind::LedgerUnavailable,
            MigrateError::Validation(v) => match v {
                ValidationError::DuplicateVersion { .. } => ExErrorKind::DuplicateVersion,
                ValidationError::ChecksumMismatch { .. } => ExErrorKind::ChecksumMismatch,
                ValidationError::DescriptionMismatch { .. } => ExErrorKind::DescriptionMismatch,
                ValidationError::OutOfOrder { .. } => ExErrorKind::OutOfOrder,
                ValidationError::MissingLocalMigration { .. } => ExErrorKind::MissingMigration,
            },
            MigrateError::ScriptUnreadable { .. } => ExErrorKind::ScriptUnreadable,
            MigrateError::MigrationFailed { .. } => ExErrorKind::MigrationFailed,
            MigrateError::LedgerWriteFailed { .. } => ExErrorKind::LedgerWriteFailed,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

impl From<&MigrateError> for ExError {
    fn from(err: &MigrateError) -> Self {
        let ex = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            MigrateError::ConfigInvalid(_) => ex.with_op("configure"),
            MigrateError::CatalogUnavailable { .. } => ex.with_op("scan_catalog"),
            MigrateError::LedgerUnavailable { .. } => ex.with_op("read_ledger"),
            MigrateError::Validation(v) => ex.with_op("validate").with_version(v.version()),
            MigrateError::ScriptUnreadable { script_name, .. }
            | MigrateError::MigrationFailed { script_name, .. } => {
                ex.with_op("apply").with_script_name(script_name.as_str())
            }
            MigrateError::LedgerWriteFailed {
                script_name,
                version,
                ..
            } => ex
                .with_op("record")
                .with_script_name(script_name.as_str())
                .with_version(version.as_str()),
        }
    }
}

impl From<MigrateError> for ExError {
    fn from(err: MigrateError) -> Self {
        ExError::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_kind_codes() {
        let err = MigrateError::from(ValidationError::OutOfOrder {
            version: "2".to_string(),
        });
        assert_eq!(err.kind(), ExErrorKind::OutOfOrder);
        assert_eq!(err.code(), "ERR_OUT_OF_ORDER");
    }

    #[test]
    fn test_validation_message_is_transparent() {
        let err = MigrateError::from(ValidationError::MissingLocalMigration {
            version: "2".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "detected applied migration not resolved locally: 2"
        );
    }

    #[test]
    fn test_ex_error_carries_script_context() {
        let err = MigrateError::MigrationFailed {
            script_name: "V3__broken.sql".to_string(),
            cause: DriverError::new("syntax error near \"CREAT\""),
        };
        let ex: ExError = (&err).into();

        assert_eq!(ex.kind(), ExErrorKind::MigrationFailed);
        assert_eq!(ex.op(), Some("apply"));
        assert_eq!(ex.script_name(), Some("V3__broken.sql"));
        assert!(ex.message().contains("syntax error"));
        assert!(!ex.kind().is_pre_mutation());
    }

    #[test]
    fn test_ex_error_display() {
        let ex = ExError::new(ExErrorKind::ChecksumMismatch)
            .with_op("validate")
            .with_version("2")
            .with_message("checksum differs");
        assert_eq!(
            ex.to_string(),
            "[ERR_CHECKSUM_MISMATCH] in operation 'validate': checksum differs (version: 2)"
        );
    }

    #[test]
    fn test_ledger_unavailable_keeps_driver_text() {
        let err = MigrateError::LedgerUnavailable {
            table: "history".to_string(),
            cause: DriverError::new("no such table: history"),
        };
        assert_eq!(
            err.to_string(),
            "error reading migration table history: no such table: history"
        );
        assert!(err.kind().is_pre_mutation());
    }
}

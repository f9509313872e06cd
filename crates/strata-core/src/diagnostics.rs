//! Diagnostics sink for non-fatal warnings
//!
//! A `Diagnostics` value is handed to the catalog scan and the ledger read.
//! Every warning is recorded; it is also logged when `verbose` is set.

use std::fmt;

/// Non-fatal condition encountered while resolving migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogWarning {
    MissingSeparator {
        script_name: String,
        separator: String,
    },
    InvalidVersion {
        script_name: String,
        version: String,
    },
    EmptyDescription {
        script_name: String,
    },
    NonUtf8Name {
        name: String,
    },
    Unreadable {
        script_name: String,
        reason: String,
    },
    NoMigrationsFound {
        location: String,
    },
    UnparseableInstalledOn {
        version: String,
        raw: String,
    },
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogWarning::MissingSeparator {
                script_name,
                separator,
            } => write!(
                f,
                "migration '{}' does not contain separator '{}'",
                script_name, separator
            ),
            CatalogWarning::InvalidVersion {
                script_name,
                version,
            } => write!(
                f,
                "invalid version '{}' for migration '{}'",
                version, script_name
            ),
            CatalogWarning::EmptyDescription { script_name } => {
                write!(f, "migration description cannot be empty: '{}'", script_name)
            }
            CatalogWarning::NonUtf8Name { name } => {
                write!(f, "skipping file with non UTF-8 name: {}", name)
            }
            CatalogWarning::Unreadable {
                script_name,
                reason,
            } => write!(
                f,
                "checksum calculation error for script {}: {}",
                script_name, reason
            ),
            CatalogWarning::NoMigrationsFound { location } => write!(
                f,
                "no migrations found in {}, is your location set up correctly?",
                location
            ),
            CatalogWarning::UnparseableInstalledOn { version, raw } => write!(
                f,
                "cannot parse installed_on '{}' for version {}",
                raw, version
            ),
        }
    }
}

/// Collects warnings for one run
#[derive(Debug, Default)]
pub struct Diagnostics {
    verbose: bool,
    warnings: Vec<CatalogWarning>,
}

impl Diagnostics {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            warnings: Vec::new(),
        }
    }

    /// Sink that records but never logs
    pub fn quiet() -> Self {
        Self::new(false)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn warn(&mut self, warning: CatalogWarning) {
        if self.verbose {
            tracing::warn!(component = module_path!(), "warning: {}", warning);
        }
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<CatalogWarning> {
        self.warnings
    }
}

//! Script catalog
//!
//! Scans a migrations directory into version-sorted descriptors. Files that
//! do not carry the configured prefix and suffix are ignored; candidates that
//! cannot be parsed or hashed are skipped with a warning.

use crate::migrations::checksum_file;
use std::fs;
use std::path::Path;
use strata_core::config::NamingConvention;
use strata_core::diagnostics::{CatalogWarning, Diagnostics};
use strata_core::errors::{MigrateError, Result};
use strata_core::model::MigrationDescriptor;
use strata_core::script_name::{is_candidate, parse_script_name};

/// Resolve every valid script under `location`
///
/// Entries are visited in file name order, then stably sorted by version, so
/// scripts sharing a version keep their name order.
pub fn scan_catalog(
    location: &Path,
    naming: &NamingConvention,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<MigrationDescriptor>> {
    let unavailable = |reason: String| MigrateError::CatalogUnavailable {
        location: location.display().to_string(),
        reason,
    };

    let mut names = fs::read_dir(location)
        .map_err(|e| unavailable(e.to_string()))?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| unavailable(e.to_string()))?;
    names.sort();

    let mut descriptors = Vec::new();
    for os_name in names {
        let Some(name) = os_name.to_str() else {
            let lossy = os_name.to_string_lossy();
            if is_candidate(&lossy, naming) {
                diagnostics.warn(CatalogWarning::NonUtf8Name {
                    name: lossy.into_owned(),
                });
            }
            continue;
        };
        if !is_candidate(name, naming) {
            continue;
        }

        let parsed = match parse_script_name(name, naming) {
            Ok(parsed) => parsed,
            Err(warning) => {
                diagnostics.warn(warning);
                continue;
            }
        };

        match checksum_file(&location.join(name)) {
            Ok(checksum) => descriptors.push(MigrationDescriptor {
                version: parsed.version,
                description: parsed.description,
                script_name: name.to_string(),
                checksum,
            }),
            Err(e) => diagnostics.warn(CatalogWarning::Unreadable {
                script_name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if descriptors.is_empty() {
        diagnostics.warn(CatalogWarning::NoMigrationsFound {
            location: location.display().to_string(),
        });
    }

    descriptors.sort_by(|a, b| a.version.cmp(&b.version));

    tracing::debug!(
        component = module_path!(),
        location = %location.display(),
        local_count = descriptors.len(),
        "resolved local migrations"
    );

    Ok(descriptors)
}

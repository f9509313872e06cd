//! Reconciler: local catalog vs. applied history
//!
//! Pure and deterministic. Checks run in a fixed order and the first failure
//! is returned:
//!
//! 1. duplicate local versions
//! 2. checksum / description drift for versions already applied
//! 3. out-of-order unapplied scripts (unless `out_of_order`)
//! 4. applied versions without a local script (unless `ignore_missing_migrations`)
//!
//! Checks 1-3 run per local descriptor, so a descriptor earlier in the
//! catalog reports before a later one even if the later one fails an earlier
//! check.

use crate::errors::ValidationError;
use crate::model::{HistoryRecord, MigrationDescriptor};
use std::collections::{HashMap, HashSet};

/// Ordering and completeness policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Policy {
    pub out_of_order: bool,
    pub ignore_missing_migrations: bool,
}

/// Validate a version-sorted local catalog against the history
pub fn validate(
    local: &[MigrationDescriptor],
    ledger: &[HistoryRecord],
    policy: Policy,
) -> Result<(), ValidationError> {
    let mut scripts_by_version: HashMap<&str, Vec<&str>> = HashMap::new();
    for descriptor in local {
        scripts_by_version
            .entry(descriptor.version.as_str())
            .or_default()
            .push(descriptor.script_name.as_str());
    }

    // first occurrence wins if the history itself holds a duplicate
    let mut applied: HashMap<&str, &HistoryRecord> = HashMap::new();
    for record in ledger {
        applied.entry(record.version.as_str()).or_insert(record);
    }

    for (index, descriptor) in local.iter().enumerate() {
        let version = descriptor.version.as_str();

        if let Some(scripts) = scripts_by_version.get(version) {
            if scripts.len() > 1 {
                return Err(ValidationError::DuplicateVersion {
                    version: version.to_string(),
                    script_names: scripts.join(" "),
                });
            }
        }

        match applied.get(version) {
            Some(record) => {
                if record.checksum != descriptor.checksum {
                    return Err(ValidationError::ChecksumMismatch {
                        version: version.to_string(),
                        ledger_checksum: record.checksum.clone(),
                        local_checksum: descriptor.checksum.clone(),
                    });
                }
                if record.description != descriptor.description {
                    return Err(ValidationError::DescriptionMismatch {
                        version: version.to_string(),
                        ledger_description: record.description.clone(),
                        local_description: descriptor.description.clone(),
                    });
                }
            }
            None => {
                if !policy.out_of_order && index < ledger.len() {
                    return Err(ValidationError::OutOfOrder {
                        version: version.to_string(),
                    });
                }
            }
        }
    }

    if !policy.ignore_missing_migrations {
        let resolved: HashSet<&str> = local.iter().map(|d| d.version.as_str()).collect();
        if let Some(record) = ledger
            .iter()
            .find(|r| !resolved.contains(r.version.as_str()))
        {
            return Err(ValidationError::MissingLocalMigration {
                version: record.version.clone(),
            });
        }
    }

    Ok(())
}

/// Local descriptors that have no history row, in catalog order
pub fn outstanding<'a>(
    local: &'a [MigrationDescriptor],
    ledger: &[HistoryRecord],
) -> Vec<&'a MigrationDescriptor> {
    let applied: HashSet<&str> = ledger.iter().map(|r| r.version.as_str()).collect();
    local
        .iter()
        .filter(|d| !applied.contains(d.version.as_str()))
        .collect()
}

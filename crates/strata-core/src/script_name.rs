//! Script filename parsing
//!
//! `<prefix><version><separator><description><suffix>`, e.g.
//! `V1_2__add_email_column.sql` resolves to version `1.2` and description
//! `add email column`.

use crate::config::NamingConvention;
use crate::diagnostics::CatalogWarning;
use regex::Regex;
use std::sync::OnceLock;

/// Version and description extracted from a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedScriptName {
    pub version: String,
    pub description: String,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9]+([._][0-9]+)*$").expect("version pattern is a valid regex")
    })
}

/// Whether a file name is a candidate script at all
///
/// Files that fail this check are ignored silently; files that pass it but
/// cannot be parsed produce a warning.
pub fn is_candidate(name: &str, naming: &NamingConvention) -> bool {
    name.starts_with(&naming.prefix) && name.ends_with(&naming.suffix)
}

/// Split a candidate file name into version and description
pub fn parse_script_name(
    name: &str,
    naming: &NamingConvention,
) -> Result<ParsedScriptName, CatalogWarning> {
    let after_prefix = name.get(naming.prefix.len()..).unwrap_or_default();
    let Some(sep_offset) = after_prefix.find(&naming.separator) else {
        return Err(CatalogWarning::MissingSeparator {
            script_name: name.to_string(),
            separator: naming.separator.clone(),
        });
    };

    let raw_version = &after_prefix[..sep_offset];
    if !version_pattern().is_match(raw_version) {
        return Err(CatalogWarning::InvalidVersion {
            script_name: name.to_string(),
            version: raw_version.to_string(),
        });
    }

    let desc_start = naming.prefix.len() + sep_offset + naming.separator.len();
    let desc_end = name.rfind(&naming.suffix).unwrap_or(name.len());
    let description = if desc_end > desc_start {
        name[desc_start..desc_end].replace('_', " ").trim().to_string()
    } else {
        String::new()
    };
    if description.is_empty() {
        return Err(CatalogWarning::EmptyDescription {
            script_name: name.to_string(),
        });
    }

    Ok(ParsedScriptName {
        version: raw_version.replace('_', "."),
        description,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str) -> Result<ParsedScriptName, CatalogWarning> {
        parse_script_name(name, &NamingConvention::default())
    }

    #[test]
    fn test_simple_name() {
        let parsed = parse("V1__create_table.sql").unwrap();
        assert_eq!(parsed.version, "1");
        assert_eq!(parsed.description, "create table");
    }

    #[test]
    fn test_segmented_versions_normalize_to_dots() {
        assert_eq!(parse("V1_2__x.sql").unwrap().version, "1.2");
        assert_eq!(parse("V1_2_3__x.sql").unwrap().version, "1.2.3");
        assert_eq!(parse("V1.2__x.sql").unwrap().version, "1.2");
        assert_eq!(parse("V20240101__x.sql").unwrap().version, "20240101");
    }

    #[test]
    fn test_description_is_trimmed() {
        let parsed = parse("V3___padded_name_.sql").unwrap();
        assert_eq!(parsed.description, "padded name");
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(
            parse("V1_create.sql"),
            Err(CatalogWarning::MissingSeparator {
                script_name: "V1_create.sql".to_string(),
                separator: "__".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_versions() {
        for name in ["V__x.sql", "Va__x.sql", "V1.__x.sql", "V1..2__x.sql", "V_1__x.sql"] {
            assert!(
                matches!(parse(name), Err(CatalogWarning::InvalidVersion { .. })),
                "{name} should have an invalid version"
            );
        }
    }

    #[test]
    fn test_description_stops_at_last_suffix() {
        let parsed = parse("V1__x.sql.bak.sql").unwrap();
        assert_eq!(parsed.description, "x.sql.bak");
    }

    #[test]
    fn test_empty_description() {
        assert!(matches!(
            parse("V1__.sql"),
            Err(CatalogWarning::EmptyDescription { .. })
        ));
        assert!(matches!(
            parse("V1_____.sql"),
            Err(CatalogWarning::EmptyDescription { .. })
        ));
    }

    #[test]
    fn test_custom_convention() {
        let naming = NamingConvention {
            prefix: "M".to_string(),
            separator: "-".to_string(),
            suffix: ".sql".to_string(),
        };
        assert!(is_candidate("M7-seed_data.sql", &naming));
        assert!(!is_candidate("V7__seed.sql", &naming));
        let parsed = parse_script_name("M7-seed_data.sql", &naming).unwrap();
        assert_eq!(parsed.version, "7");
        assert_eq!(parsed.description, "seed data");
    }
}

// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use wasla_golive_model::{ProbeId, Severity};

use crate::probes::builtin_probe_fn;

pub const DEFAULT_CATALOG_TOML: &str = include_str!("../catalog/default_probes.toml");
pub const DEFAULT_CATALOG_ORIGIN: &str = "builtin:default_probes.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Io { path: PathBuf, detail: String },
    Parse { origin: String, detail: String },
    Invalid { origin: String, errors: Vec<String> },
    UnknownProbe { id: String },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, detail } => {
                write!(f, "failed to read {}: {detail}", path.display())
            }
            Self::Parse { origin, detail } => write!(f, "failed to parse {origin}: {detail}"),
            Self::Invalid { origin, errors } => {
                write!(f, "invalid probe catalog {origin}: {}", errors.join("; "))
            }
            Self::UnknownProbe { id } => write!(f, "unknown probe id `{id}`"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSpec {
    pub id: ProbeId,
    pub severity: Severity,
    pub title: String,
    pub hint: Option<String>,
    pub enabled: bool,
}

impl ProbeSpec {
    #[must_use]
    pub fn new(id: ProbeId, severity: Severity, title: impl Into<String>) -> Self {
        Self {
            id,
            severity,
            title: title.into(),
            hint: None,
            enabled: true,
        }
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCatalog {
    pub origin: String,
    pub probes: Vec<ProbeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    #[serde(default)]
    probes: Vec<RawProbe>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProbe {
    id: String,
    severity: String,
    title: String,
    hint: Option<String>,
    enabled: Option<bool>,
}

pub fn parse_catalog(text: &str, origin: &str) -> Result<ProbeCatalog, CatalogError> {
    let raw: RawCatalog = toml::from_str(text).map_err(|err| CatalogError::Parse {
        origin: origin.to_string(),
        detail: err.to_string(),
    })?;

    let mut errors = Vec::new();
    let mut probes = Vec::new();
    for row in raw.probes {
        let id = ProbeId::parse(&row.id);
        let severity = Severity::parse(&row.severity);
        match (id, severity) {
            (Ok(id), Ok(severity)) => probes.push(ProbeSpec {
                id,
                severity,
                title: row.title.trim().to_string(),
                hint: row
                    .hint
                    .map(|h| h.trim().to_string())
                    .filter(|h| !h.is_empty()),
                enabled: row.enabled.unwrap_or(true),
            }),
            (id, severity) => {
                if let Err(err) = id {
                    errors.push(err.to_string());
                }
                if let Err(err) = severity {
                    errors.push(format!("{}: {err}", row.id.trim()));
                }
            }
        }
    }

    let catalog = ProbeCatalog {
        origin: origin.to_string(),
        probes,
    };
    errors.extend(validate_catalog(&catalog));
    if errors.is_empty() {
        Ok(catalog)
    } else {
        Err(CatalogError::Invalid {
            origin: origin.to_string(),
            errors,
        })
    }
}

pub fn load_catalog(path: &Path) -> Result<ProbeCatalog, CatalogError> {
    let text = fs::read_to_string(path).map_err(|err| CatalogError::Io {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    parse_catalog(&text, &path.display().to_string())
}

pub fn default_catalog() -> Result<ProbeCatalog, CatalogError> {
    parse_catalog(DEFAULT_CATALOG_TOML, DEFAULT_CATALOG_ORIGIN)
}

pub fn validate_catalog(catalog: &ProbeCatalog) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = BTreeSet::new();
    for spec in &catalog.probes {
        if !seen.insert(spec.id.as_str()) {
            errors.push(format!("duplicate probe id `{}`", spec.id));
        }
        if spec.title.is_empty() {
            errors.push(format!("{}: title must not be empty", spec.id));
        }
    }
    errors
}

/// Validation errors plus entries that have no builtin implementation.
pub fn catalog_doctor(catalog: &ProbeCatalog) -> Vec<String> {
    let mut errors = validate_catalog(catalog);
    for spec in &catalog.probes {
        if builtin_probe_fn(&spec.id).is_none() {
            errors.push(format!("{}: no builtin probe implementation", spec.id));
        }
    }
    if !catalog.probes.iter().any(|spec| spec.enabled) {
        errors.push("catalog enables no probes".to_string());
    }
    errors
}

pub fn list_output(catalog: &ProbeCatalog) -> String {
    let mut rows = catalog.probes.iter().collect::<Vec<_>>();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows.into_iter()
        .map(|spec| {
            let state = if spec.enabled { "" } else { "\t(disabled)" };
            format!("{}\t{}\t{}{state}", spec.id, spec.severity, spec.title)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn explain_output(catalog: &ProbeCatalog, id: &str) -> Result<String, CatalogError> {
    let spec = catalog
        .probes
        .iter()
        .find(|spec| spec.id.as_str() == id.trim())
        .ok_or_else(|| CatalogError::UnknownProbe { id: id.to_string() })?;
    Ok(format!(
        "id: {}\narea: {}\nseverity: {}\ntitle: {}\nhint: {}\nenabled: {}\nbuiltin: {}",
        spec.id,
        spec.id.area(),
        spec.severity,
        spec.title,
        spec.hint.as_deref().unwrap_or("-"),
        spec.enabled,
        builtin_probe_fn(&spec.id).is_some(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_parses_and_validates() {
        let catalog = default_catalog().expect("default catalog");
        assert_eq!(catalog.probes.len(), 14);
        assert!(catalog_doctor(&catalog).is_empty());
        let blockers = catalog
            .probes
            .iter()
            .filter(|spec| spec.severity == Severity::Blocker)
            .count();
        assert_eq!(blockers, 8);
    }

    #[test]
    fn duplicate_and_malformed_entries_are_all_reported() {
        let text = r#"
[[probes]]
id = "store_logo_configured"
severity = "blocker"
title = "logo"

[[probes]]
id = "store_logo_configured"
severity = "warning"
title = ""

[[probes]]
id = "Logo"
severity = "fatal"
title = "bad"
"#;
        let err = parse_catalog(text, "inline").expect_err("invalid catalog");
        let CatalogError::Invalid { errors, .. } = err else {
            panic!("expected invalid catalog error");
        };
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("duplicate probe id")));
        assert!(errors.iter().any(|e| e.contains("title must not be empty")));
        assert!(errors.iter().any(|e| e.contains("invalid probe id `Logo`")));
        assert!(errors.iter().any(|e| e.contains("invalid severity `fatal`")));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let text = "[[probes]]\nid = \"store_logo_configured\"\nseverity = \"blocker\"\ntitle = \"x\"\nweight = 3\n";
        assert!(matches!(
            parse_catalog(text, "inline"),
            Err(CatalogError::Parse { .. })
        ));
    }

    #[test]
    fn doctor_flags_unbound_and_all_disabled() {
        let text = "[[probes]]\nid = \"store_fax_number\"\nseverity = \"warning\"\ntitle = \"fax\"\nenabled = false\n";
        let catalog = parse_catalog(text, "inline").expect("catalog");
        let errors = catalog_doctor(&catalog);
        assert_eq!(
            errors,
            vec![
                "store_fax_number: no builtin probe implementation".to_string(),
                "catalog enables no probes".to_string(),
            ]
        );
    }

    #[test]
    fn explain_and_list_are_stable() {
        let catalog = default_catalog().expect("default catalog");
        let text = explain_output(&catalog, "domain_custom_configured").expect("explain");
        assert!(text.starts_with("id: domain_custom_configured\narea: domain\nseverity: warning\n"));
        assert!(text.ends_with("builtin: true"));
        assert!(explain_output(&catalog, "domain_missing").is_err());

        let listing = list_output(&catalog);
        let first = listing.lines().next().expect("first row");
        assert!(first.starts_with("branding_colors_configured\twarning\t"));
    }
}

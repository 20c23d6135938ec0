// SPDX-License-Identifier: Apache-2.0

use crate::{Finding, Severity, TenantId};
use serde::Serialize;
use serde_json::{json, Value};

pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub passed: u64,
    pub warned: u64,
    pub blocked: u64,
    pub faulted: u64,
    pub total: u64,
}

/// Outcome of one go-live check run.
///
/// `ok` always mirrors `hard_blockers`. A report is assembled once by
/// [`Report::new`] and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    tenant: TenantId,
    ok: bool,
    score: u32,
    hard_blockers: Vec<Finding>,
    warnings: Vec<Finding>,
    summary: ReportSummary,
}

impl Report {
    /// Findings are partitioned by their own severity, keeping their order.
    #[must_use]
    pub fn new(
        tenant: TenantId,
        score: u32,
        findings: Vec<Finding>,
        summary: ReportSummary,
    ) -> Self {
        let (hard_blockers, warnings): (Vec<_>, Vec<_>) = findings
            .into_iter()
            .partition(|finding| finding.severity == Severity::Blocker);
        Self {
            tenant,
            ok: hard_blockers.is_empty(),
            score: score.min(MAX_SCORE),
            hard_blockers,
            warnings,
            summary,
        }
    }

    #[must_use]
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    #[must_use]
    pub fn ok(&self) -> bool {
        self.ok
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn hard_blockers(&self) -> &[Finding] {
        &self.hard_blockers
    }

    #[must_use]
    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    #[must_use]
    pub fn summary(&self) -> &ReportSummary {
        &self.summary
    }
}

pub fn report_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "wasla go-live report",
        "type": "object",
        "required": ["tenant", "ok", "score", "hard_blockers", "warnings", "summary"],
        "properties": {
            "tenant": {"type": "string"},
            "ok": {"type": "boolean"},
            "score": {"type": "integer", "minimum": 0, "maximum": MAX_SCORE},
            "hard_blockers": {"type": "array", "items": {"$ref": "#/$defs/finding"}},
            "warnings": {"type": "array", "items": {"$ref": "#/$defs/finding"}},
            "summary": {
                "type": "object",
                "required": ["passed", "warned", "blocked", "faulted", "total"],
                "additionalProperties": {"type": "integer", "minimum": 0}
            }
        },
        "$defs": {
            "finding": {
                "type": "object",
                "required": ["probe", "code", "message", "hint", "severity"],
                "properties": {
                    "probe": {"type": "string"},
                    "code": {"type": "string"},
                    "message": {"type": "string"},
                    "hint": {"type": ["string", "null"]},
                    "severity": {"enum": ["blocker", "warning"]},
                    "fault": {"type": "string"}
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProbeId;

    fn finding(id: &str, severity: Severity) -> Finding {
        Finding {
            probe: ProbeId::parse(id).expect("probe id"),
            code: id.to_ascii_uppercase(),
            message: format!("{id} failed"),
            hint: None,
            severity,
            fault: None,
        }
    }

    #[test]
    fn ok_mirrors_blocker_presence() {
        let tenant = TenantId::parse("acme").expect("tenant");
        let clean = Report::new(
            tenant.clone(),
            80,
            vec![finding("domain_custom_configured", Severity::Warning)],
            ReportSummary::default(),
        );
        assert!(clean.ok());
        assert_eq!(clean.warnings().len(), 1);

        let blocked = Report::new(
            tenant,
            40,
            vec![
                finding("store_logo_configured", Severity::Blocker),
                finding("domain_custom_configured", Severity::Warning),
            ],
            ReportSummary::default(),
        );
        assert!(!blocked.ok());
        assert_eq!(blocked.hard_blockers().len(), 1);
        assert_eq!(blocked.warnings().len(), 1);
    }

    #[test]
    fn score_is_clamped_to_max() {
        let tenant = TenantId::parse("acme").expect("tenant");
        let report = Report::new(tenant, 250, Vec::new(), ReportSummary::default());
        assert_eq!(report.score(), MAX_SCORE);
    }

    #[test]
    fn report_schema_contains_required_fields() {
        let schema = report_json_schema();
        let required_text = schema
            .get("required")
            .map(Value::to_string)
            .unwrap_or_default();
        for field in ["tenant", "ok", "score", "hard_blockers", "warnings", "summary"] {
            assert!(required_text.contains(field), "missing {field}");
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

use serde_json::{json, Value};
use wasla_golive_model::{Finding, Report};

pub fn render_text_summary(report: &Report) -> String {
    let summary = report.summary();
    format!(
        "go-live: tenant={} ok={} score={} blockers={} warnings={} passed={} faulted={} total={}",
        report.tenant(),
        report.ok(),
        report.score(),
        report.hard_blockers().len(),
        report.warnings().len(),
        summary.passed,
        summary.faulted,
        summary.total,
    )
}

fn finding_lines(label: &str, finding: &Finding, lines: &mut Vec<String>) {
    lines.push(format!(
        "{label}: {} [{}] {}",
        finding.probe, finding.code, finding.message
    ));
    if let Some(hint) = &finding.hint {
        lines.push(format!("  hint: {hint}"));
    }
}

pub fn render_text(report: &Report) -> String {
    let mut lines = vec![render_text_summary(report)];
    for finding in report.hard_blockers() {
        finding_lines("blocker", finding, &mut lines);
    }
    for finding in report.warnings() {
        finding_lines("warning", finding, &mut lines);
    }
    lines.join("\n")
}

pub fn render_json(report: &Report) -> Result<String, String> {
    serde_json::to_string_pretty(report).map_err(|err| err.to_string())
}

/// One `finding` line per finding, blockers first, then a closing
/// `summary` line. Every line carries the tenant, so a ready tenant still
/// shows up.
pub fn render_jsonl(report: &Report) -> Result<String, String> {
    let mut lines = Vec::new();
    for row in report.hard_blockers().iter().chain(report.warnings()) {
        let mut value = serde_json::to_value(row).map_err(|err| err.to_string())?;
        if let Value::Object(map) = &mut value {
            map.insert("record".to_string(), Value::from("finding"));
            map.insert(
                "tenant".to_string(),
                Value::String(report.tenant().to_string()),
            );
        }
        lines.push(serde_json::to_string(&value).map_err(|err| err.to_string())?);
    }
    let summary = json!({
        "record": "summary",
        "tenant": report.tenant().to_string(),
        "ok": report.ok(),
        "score": report.score(),
        "summary": report.summary(),
    });
    lines.push(serde_json::to_string(&summary).map_err(|err| err.to_string())?);
    Ok(lines.join("\n"))
}

pub fn exit_code_for_report(report: &Report) -> i32 {
    if report.ok() {
        0
    } else {
        2
    }
}

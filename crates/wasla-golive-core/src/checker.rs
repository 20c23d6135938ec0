// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};
use wasla_golive_model::{
    FaultCategory, Finding, Report, ReportSummary, Severity, TenantId, TenantSnapshot,
};

use crate::catalog::{default_catalog, CatalogError, ProbeCatalog};
use crate::ports::{StoreError, TenantStateSource};
use crate::probes::{Probe, ProbeFault, Verdict};
use crate::registry::{ProbeRegistry, RegisteredProbe};
use crate::score::ScorePolicy;

pub const PROBE_FAULT_CODE: &str = "PROBE_FAULT";
pub const PROBE_IMPLEMENTATION_MISSING_CODE: &str = "PROBE_IMPLEMENTATION_MISSING";

/// Runs every registered probe against a tenant snapshot and aggregates
/// the outcomes into a [`Report`].
#[derive(Debug)]
pub struct GoLiveChecker {
    registry: ProbeRegistry,
    policy: ScorePolicy,
}

impl GoLiveChecker {
    #[must_use]
    pub fn new(registry: ProbeRegistry, policy: ScorePolicy) -> Self {
        Self { registry, policy }
    }

    pub fn from_catalog(catalog: &ProbeCatalog, policy: ScorePolicy) -> Result<Self, CatalogError> {
        let registry =
            ProbeRegistry::from_catalog(catalog).map_err(|err| CatalogError::Invalid {
                origin: catalog.origin.clone(),
                errors: vec![err.to_string()],
            })?;
        Ok(Self::new(registry, policy))
    }

    pub fn with_default_catalog() -> Result<Self, CatalogError> {
        Self::from_catalog(&default_catalog()?, ScorePolicy::default())
    }

    #[must_use]
    pub fn registry(&self) -> &ProbeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn policy(&self) -> ScorePolicy {
        self.policy
    }

    /// Never fails: probe faults and panics become blocker findings.
    pub fn execute(&self, snapshot: &TenantSnapshot) -> Report {
        let mut summary = ReportSummary::default();
        let mut findings = Vec::new();

        for entry in self.registry.iter() {
            summary.total += 1;
            match evaluate_contained(entry.probe(), snapshot) {
                Ok(Verdict::Pass) => {
                    summary.passed += 1;
                }
                Ok(Verdict::Fail { message }) => {
                    match entry.spec.severity {
                        Severity::Blocker => summary.blocked += 1,
                        Severity::Warning => summary.warned += 1,
                    }
                    findings.push(failure_finding(entry, message));
                }
                Err(fault) => {
                    summary.faulted += 1;
                    warn!(
                        tenant = %snapshot.tenant,
                        probe = %entry.spec.id,
                        fault = fault.category.as_str(),
                        "go_live_probe_fault"
                    );
                    findings.push(fault_finding(entry, fault));
                }
            }
        }

        let score = self.policy.score(&summary);
        debug!(
            tenant = %snapshot.tenant,
            score,
            passed = summary.passed,
            warned = summary.warned,
            blocked = summary.blocked,
            faulted = summary.faulted,
            "go_live_check_evaluated"
        );
        Report::new(snapshot.tenant.clone(), score, findings, summary)
    }

    /// Store errors are returned to the caller; only probe outcomes are
    /// folded into the report.
    pub fn check_tenant(
        &self,
        source: &dyn TenantStateSource,
        tenant: &TenantId,
    ) -> Result<Report, StoreError> {
        let snapshot = source.snapshot(tenant)?;
        Ok(self.execute(&snapshot))
    }
}

fn evaluate_contained(probe: &dyn Probe, snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    panic::catch_unwind(AssertUnwindSafe(|| probe.evaluate(snapshot))).unwrap_or_else(|payload| {
        Err(ProbeFault::new(
            FaultCategory::Panic,
            panic_detail(payload.as_ref()),
        ))
    })
}

pub(crate) fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "probe panicked".to_string()
    }
}

fn failure_finding(entry: &RegisteredProbe, message: String) -> Finding {
    Finding {
        probe: entry.spec.id.clone(),
        code: entry.spec.id.as_str().to_ascii_uppercase(),
        message,
        hint: entry.spec.hint.clone(),
        severity: entry.spec.severity,
        fault: None,
    }
}

fn fault_finding(entry: &RegisteredProbe, fault: ProbeFault) -> Finding {
    let (code, hint) = match fault.category {
        FaultCategory::NotImplemented => (
            PROBE_IMPLEMENTATION_MISSING_CODE,
            "add a builtin probe for this id or disable the catalog entry".to_string(),
        ),
        _ => (
            PROBE_FAULT_CODE,
            "inspect go-live logs for the failing probe".to_string(),
        ),
    };
    Finding {
        probe: entry.spec.id.clone(),
        code: code.to_string(),
        message: format!("probe could not be evaluated: {fault}"),
        hint: Some(hint),
        severity: Severity::Blocker,
        fault: Some(fault.category),
    }
}

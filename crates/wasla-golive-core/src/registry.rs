// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;

use wasla_golive_model::{FaultCategory, ProbeId, TenantSnapshot};

use crate::catalog::{ProbeCatalog, ProbeSpec};
use crate::probes::{builtin_probe_fn, Probe, ProbeFault, Verdict};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    Duplicate { id: ProbeId },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { id } => write!(f, "probe `{id}` is already registered"),
        }
    }
}

impl std::error::Error for RegistryError {}

pub struct RegisteredProbe {
    pub spec: ProbeSpec,
    probe: Box<dyn Probe>,
}

impl RegisteredProbe {
    pub fn probe(&self) -> &dyn Probe {
        self.probe.as_ref()
    }
}

impl fmt::Debug for RegisteredProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredProbe")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Stands in for a catalog entry with no builtin predicate.
struct MissingImplementation;

impl Probe for MissingImplementation {
    fn evaluate(&self, _snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
        Err(ProbeFault::new(
            FaultCategory::NotImplemented,
            "missing probe implementation",
        ))
    }
}

/// Probes keyed by id; iteration follows id order.
#[derive(Debug, Default)]
pub struct ProbeRegistry {
    probes: BTreeMap<ProbeId, RegisteredProbe>,
}

impl ProbeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enabled catalog entries bound to the builtin probe library.
    pub fn from_catalog(catalog: &ProbeCatalog) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for spec in catalog.probes.iter().filter(|spec| spec.enabled) {
            match builtin_probe_fn(&spec.id) {
                Some(func) => registry.register(spec.clone(), func)?,
                None => registry.register(spec.clone(), MissingImplementation)?,
            }
        }
        Ok(registry)
    }

    pub fn register(
        &mut self,
        spec: ProbeSpec,
        probe: impl Probe + 'static,
    ) -> Result<(), RegistryError> {
        if self.probes.contains_key(&spec.id) {
            return Err(RegistryError::Duplicate { id: spec.id });
        }
        self.probes.insert(
            spec.id.clone(),
            RegisteredProbe {
                spec,
                probe: Box::new(probe),
            },
        );
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProbe> {
        self.probes.values()
    }

    #[must_use]
    pub fn get(&self, id: &ProbeId) -> Option<&RegisteredProbe> {
        self.probes.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_catalog;
    use wasla_golive_model::{Severity, TenantId};

    fn spec(id: &str, severity: Severity) -> ProbeSpec {
        ProbeSpec::new(ProbeId::parse(id).expect("probe id"), severity, id)
    }

    fn always_pass(_: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
        Ok(Verdict::Pass)
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ProbeRegistry::new();
        registry
            .register(spec("custom_always", Severity::Warning), always_pass)
            .expect("first registration");
        let err = registry
            .register(spec("custom_always", Severity::Blocker), always_pass)
            .expect_err("duplicate");
        assert_eq!(err.to_string(), "probe `custom_always` is already registered");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn catalog_binding_skips_disabled_and_keeps_unbound() {
        let text = r#"
[[probes]]
id = "store_logo_configured"
severity = "blocker"
title = "logo"

[[probes]]
id = "domain_custom_configured"
severity = "warning"
title = "domain"
enabled = false

[[probes]]
id = "store_fax_number"
severity = "warning"
title = "fax"
"#;
        let catalog = parse_catalog(text, "inline").expect("catalog");
        let registry = ProbeRegistry::from_catalog(&catalog).expect("registry");
        let ids = registry
            .iter()
            .map(|p| p.spec.id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["store_fax_number", "store_logo_configured"]);

        let unbound = registry
            .get(&ProbeId::parse("store_fax_number").expect("id"))
            .expect("registered");
        let snapshot = TenantSnapshot::empty(TenantId::parse("acme").expect("tenant"));
        let fault = unbound.probe().evaluate(&snapshot).expect_err("fault");
        assert_eq!(fault.category, FaultCategory::NotImplemented);
    }
}

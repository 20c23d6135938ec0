// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Go-live readiness checker.
//!
//! A [`GoLiveChecker`] evaluates every probe in its [`ProbeRegistry`]
//! against a read-only [`TenantSnapshot`] and aggregates the outcomes into a
//! [`Report`]. Probes come from a TOML catalog bound to the builtin probe
//! library, or are registered directly.
//!
//! ```text
//! catalog.toml ──▶ ProbeRegistry ──▶ GoLiveChecker::execute(snapshot) ──▶ Report
//!                                          ▲
//!            TenantStateSource::snapshot ──┘   (StartupCheck drives this once
//!                                               after migrations)
//! ```

pub mod catalog;
pub mod checker;
pub mod ports;
pub mod probes;
pub mod registry;
pub mod render;
pub mod score;
pub mod startup;

pub use catalog::{
    catalog_doctor, default_catalog, explain_output, list_output, load_catalog, parse_catalog,
    validate_catalog, CatalogError, ProbeCatalog, ProbeSpec, DEFAULT_CATALOG_TOML,
};
pub use checker::{GoLiveChecker, PROBE_FAULT_CODE, PROBE_IMPLEMENTATION_MISSING_CODE};
pub use ports::{StaticTenantSource, StoreError, TenantStateSource};
pub use probes::{builtin_probe_fn, Probe, ProbeFault, ProbeFn, Verdict, KNOWN_THEMES};
pub use registry::{ProbeRegistry, RegisteredProbe, RegistryError};
pub use render::{
    exit_code_for_report, render_json, render_jsonl, render_text, render_text_summary,
};
pub use score::{ScorePolicy, ScorePolicyError, DEFAULT_BLOCKER_CEILING, DEFAULT_WARNING_CREDIT_PCT};
pub use startup::{StartupCheck, StartupOutcome, SKIP_REASON_DB_NOT_READY};
pub use wasla_golive_model::{Report, TenantSnapshot};

pub const CRATE_NAME: &str = "wasla-golive-core";

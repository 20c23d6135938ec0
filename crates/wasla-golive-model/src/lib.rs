// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
//! Go-live model SSOT.
//!
//! Data-only types shared by the checker, the storage adapter and the CLI.
//! Nothing in this crate touches the filesystem or a database.
//!
//! ```compile_fail
//! use wasla_golive_model::Severity;
//!
//! fn exhaustive_match(s: Severity) -> &'static str {
//!     match s {
//!         Severity::Blocker => "b",
//!     }
//! }
//! ```

mod finding;
mod ids;
mod report;
mod snapshot;

pub use finding::{FaultCategory, Finding, Severity};
pub use ids::{ProbeId, TenantId, ValidationError, TENANT_ID_MAX_LEN};
pub use report::{report_json_schema, Report, ReportSummary, MAX_SCORE};
pub use snapshot::{
    Branding, CustomDomain, LegalPage, LegalPageKind, PaymentMethod, ProductSummary, Section,
    SectionError, ShippingZone, StoreProfile, TenantSnapshot,
};

pub const CRATE_NAME: &str = "wasla-golive-model";

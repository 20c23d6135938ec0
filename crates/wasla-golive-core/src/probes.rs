// SPDX-License-Identifier: Apache-2.0

//! Builtin probe library.
//!
//! Each probe reads one or two sections of a [`TenantSnapshot`] and returns
//! a [`Verdict`]. A section the store could not read turns into a
//! [`ProbeFault`] instead of a verdict.

use std::fmt;

use wasla_golive_model::{
    FaultCategory, LegalPageKind, ProbeId, Section, SectionError, TenantSnapshot,
};

/// Themes shipped with the storefront.
pub const KNOWN_THEMES: &[&str] = &["bold", "classic", "elegant", "minimal", "modern"];

const REQUIRED_LEGAL_PAGES: &[LegalPageKind] = &[LegalPageKind::Terms, LegalPageKind::Privacy];
const MAX_LISTED_ITEMS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail { message: String },
}

impl Verdict {
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeFault {
    pub category: FaultCategory,
    pub detail: String,
}

impl ProbeFault {
    pub fn new(category: FaultCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            detail: detail.into(),
        }
    }

    fn section(name: &str, err: &SectionError) -> Self {
        Self::new(
            FaultCategory::StoreUnavailable,
            format!("{name} section unavailable ({}): {}", err.category, err.detail),
        )
    }
}

impl fmt::Display for ProbeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.detail)
    }
}

impl std::error::Error for ProbeFault {}

/// A readiness predicate over a tenant snapshot.
pub trait Probe: Send + Sync {
    fn evaluate(&self, snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault>;
}

impl<F> Probe for F
where
    F: Fn(&TenantSnapshot) -> Result<Verdict, ProbeFault> + Send + Sync,
{
    fn evaluate(&self, snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
        self(snapshot)
    }
}

pub type ProbeFn = fn(&TenantSnapshot) -> Result<Verdict, ProbeFault>;

pub fn builtin_probe_fn(id: &ProbeId) -> Option<ProbeFn> {
    match id.as_str() {
        "store_profile_complete" => Some(probe_store_profile_complete),
        "store_logo_configured" => Some(probe_store_logo_configured),
        "store_currency_configured" => Some(probe_store_currency_configured),
        "store_description_present" => Some(probe_store_description_present),
        "payments_method_configured" => Some(probe_payments_method_configured),
        "catalog_published_product" => Some(probe_catalog_published_product),
        "catalog_prices_valid" => Some(probe_catalog_prices_valid),
        "catalog_product_images" => Some(probe_catalog_product_images),
        "shipping_zone_configured" => Some(probe_shipping_zone_configured),
        "legal_pages_published" => Some(probe_legal_pages_published),
        "branding_theme_selected" => Some(probe_branding_theme_selected),
        "branding_colors_configured" => Some(probe_branding_colors_configured),
        "domain_custom_configured" => Some(probe_domain_custom_configured),
        "domain_ssl_active" => Some(probe_domain_ssl_active),
        _ => None,
    }
}

fn loaded<'a, T>(name: &str, section: &'a Section<T>) -> Result<&'a T, ProbeFault> {
    section
        .as_loaded()
        .map_err(|err| ProbeFault::section(name, err))
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn listed(items: &[String]) -> String {
    let mut out = items
        .iter()
        .take(MAX_LISTED_ITEMS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > MAX_LISTED_ITEMS {
        out.push_str(&format!(" (+{} more)", items.len() - MAX_LISTED_ITEMS));
    }
    out
}

fn is_hex_color(raw: &str) -> bool {
    let Some(digits) = raw.trim().strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn probe_store_profile_complete(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let profile = loaded("profile", &snapshot.profile)?;
    if profile.name.trim().is_empty() {
        return Ok(Verdict::fail("store name is empty"));
    }
    match profile.contact_email.as_deref().map(str::trim) {
        None | Some("") => Ok(Verdict::fail("contact email is missing")),
        Some(email) if !email.contains('@') || email.starts_with('@') || email.ends_with('@') => {
            Ok(Verdict::fail(format!("contact email `{email}` is not an address")))
        }
        Some(_) => Ok(Verdict::Pass),
    }
}

fn probe_store_logo_configured(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let profile = loaded("profile", &snapshot.profile)?;
    if is_blank(profile.logo_url.as_ref()) {
        Ok(Verdict::fail("no store logo uploaded"))
    } else {
        Ok(Verdict::Pass)
    }
}

fn probe_store_currency_configured(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let profile = loaded("profile", &snapshot.profile)?;
    match profile.currency.as_deref().map(str::trim) {
        None | Some("") => Ok(Verdict::fail("store currency is not set")),
        Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) => {
            Ok(Verdict::Pass)
        }
        Some(code) => Ok(Verdict::fail(format!(
            "store currency `{code}` is not an ISO 4217 code"
        ))),
    }
}

fn probe_store_description_present(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let profile = loaded("profile", &snapshot.profile)?;
    if is_blank(profile.description.as_ref()) {
        Ok(Verdict::fail("store description is empty"))
    } else {
        Ok(Verdict::Pass)
    }
}

fn probe_payments_method_configured(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let methods = loaded("payments", &snapshot.payments)?;
    if methods.iter().any(|m| m.enabled) {
        Ok(Verdict::Pass)
    } else if methods.is_empty() {
        Ok(Verdict::fail("no payment method configured"))
    } else {
        let providers = methods.iter().map(|m| m.provider.clone()).collect::<Vec<_>>();
        Ok(Verdict::fail(format!(
            "payment methods configured but none enabled: {}",
            listed(&providers)
        )))
    }
}

fn probe_catalog_published_product(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let products = loaded("catalog", &snapshot.catalog)?;
    if products.iter().any(|p| p.published) {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail(format!(
            "no published product ({} drafts)",
            products.len()
        )))
    }
}

fn probe_catalog_prices_valid(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let products = loaded("catalog", &snapshot.catalog)?;
    let mut bad = products
        .iter()
        .filter(|p| p.published && p.price_minor <= 0)
        .map(|p| p.sku.clone())
        .collect::<Vec<_>>();
    bad.sort();
    if bad.is_empty() {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail(format!(
            "published products without a positive price: {}",
            listed(&bad)
        )))
    }
}

fn probe_catalog_product_images(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let products = loaded("catalog", &snapshot.catalog)?;
    let mut bare = products
        .iter()
        .filter(|p| p.published && p.image_count == 0)
        .map(|p| p.sku.clone())
        .collect::<Vec<_>>();
    bare.sort();
    if bare.is_empty() {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail(format!(
            "published products without images: {}",
            listed(&bare)
        )))
    }
}

fn probe_shipping_zone_configured(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let zones = loaded("shipping", &snapshot.shipping)?;
    if zones.iter().any(|z| z.enabled) {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail("no enabled shipping zone"))
    }
}

fn probe_legal_pages_published(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let pages = loaded("legal", &snapshot.legal)?;
    let missing = REQUIRED_LEGAL_PAGES
        .iter()
        .filter(|kind| !pages.iter().any(|p| p.kind == **kind && p.published))
        .map(|kind| kind.as_str().to_string())
        .collect::<Vec<_>>();
    if missing.is_empty() {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail(format!(
            "legal pages not published: {}",
            listed(&missing)
        )))
    }
}

fn probe_branding_theme_selected(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let branding = loaded("branding", &snapshot.branding)?;
    match branding.theme_code.as_deref().map(str::trim) {
        None | Some("") => Ok(Verdict::fail("no theme selected")),
        Some(code) if KNOWN_THEMES.contains(&code) => Ok(Verdict::Pass),
        Some(code) => Ok(Verdict::fail(format!("theme `{code}` is not available"))),
    }
}

fn probe_branding_colors_configured(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let branding = loaded("branding", &snapshot.branding)?;
    let mut problems = Vec::new();
    for (name, value) in [
        ("primary", &branding.primary_color),
        ("secondary", &branding.secondary_color),
    ] {
        match value.as_deref() {
            None => problems.push(format!("{name} colour not set")),
            Some(raw) if !is_hex_color(raw) => {
                problems.push(format!("{name} colour `{raw}` is not a hex colour"))
            }
            Some(_) => {}
        }
    }
    if problems.is_empty() {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail(problems.join("; ")))
    }
}

fn probe_domain_custom_configured(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let domains = loaded("domains", &snapshot.domains)?;
    if domains.iter().any(|d| d.verified) {
        Ok(Verdict::Pass)
    } else if domains.is_empty() {
        Ok(Verdict::fail("no custom domain connected"))
    } else {
        let pending = domains.iter().map(|d| d.hostname.clone()).collect::<Vec<_>>();
        Ok(Verdict::fail(format!(
            "custom domains awaiting verification: {}",
            listed(&pending)
        )))
    }
}

fn probe_domain_ssl_active(snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
    let domains = loaded("domains", &snapshot.domains)?;
    if let Some(domain) = domains.iter().find(|d| d.ssl_active && !d.verified) {
        return Err(ProbeFault::new(
            FaultCategory::InvalidData,
            format!(
                "domain `{}` reports an active certificate without verification",
                domain.hostname
            ),
        ));
    }
    let mut insecure = domains
        .iter()
        .filter(|d| d.verified && !d.ssl_active)
        .map(|d| d.hostname.clone())
        .collect::<Vec<_>>();
    insecure.sort();
    if insecure.is_empty() {
        Ok(Verdict::Pass)
    } else {
        Ok(Verdict::fail(format!(
            "verified domains without HTTPS: {}",
            listed(&insecure)
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasla_golive_model::{
        Branding, CustomDomain, LegalPage, PaymentMethod, ProductSummary, StoreProfile, TenantId,
    };

    fn empty() -> TenantSnapshot {
        TenantSnapshot::empty(TenantId::parse("acme").expect("tenant"))
    }

    fn run(id: &str, snapshot: &TenantSnapshot) -> Result<Verdict, ProbeFault> {
        let id = ProbeId::parse(id).expect("probe id");
        let probe = builtin_probe_fn(&id).expect("builtin probe");
        probe(snapshot)
    }

    fn product(sku: &str, price_minor: i64, published: bool, image_count: u32) -> ProductSummary {
        ProductSummary {
            sku: sku.to_string(),
            name: sku.to_string(),
            price_minor,
            published,
            image_count,
        }
    }

    #[test]
    fn profile_requires_name_and_address() {
        let mut snapshot = empty();
        assert_eq!(
            run("store_profile_complete", &snapshot),
            Ok(Verdict::fail("store name is empty"))
        );
        snapshot.profile = Section::Loaded(StoreProfile {
            name: "Acme".to_string(),
            contact_email: Some("owner".to_string()),
            ..StoreProfile::default()
        });
        assert_eq!(
            run("store_profile_complete", &snapshot),
            Ok(Verdict::fail("contact email `owner` is not an address"))
        );
        snapshot.profile = Section::Loaded(StoreProfile {
            name: "Acme".to_string(),
            contact_email: Some("owner@acme.test".to_string()),
            ..StoreProfile::default()
        });
        assert_eq!(run("store_profile_complete", &snapshot), Ok(Verdict::Pass));
    }

    #[test]
    fn currency_must_be_three_uppercase_letters() {
        let mut snapshot = empty();
        for (raw, passes) in [("SAR", true), ("sar", false), ("SARX", false), ("", false)] {
            snapshot.profile = Section::Loaded(StoreProfile {
                currency: Some(raw.to_string()),
                ..StoreProfile::default()
            });
            let verdict = run("store_currency_configured", &snapshot).expect("verdict");
            assert_eq!(verdict == Verdict::Pass, passes, "currency {raw:?}");
        }
    }

    #[test]
    fn payments_distinguish_missing_from_disabled() {
        let mut snapshot = empty();
        assert_eq!(
            run("payments_method_configured", &snapshot),
            Ok(Verdict::fail("no payment method configured"))
        );
        snapshot.payments = Section::Loaded(vec![PaymentMethod {
            provider: "stripe".to_string(),
            enabled: false,
        }]);
        assert_eq!(
            run("payments_method_configured", &snapshot),
            Ok(Verdict::fail(
                "payment methods configured but none enabled: stripe"
            ))
        );
    }

    #[test]
    fn price_and_image_probes_only_consider_published_products() {
        let mut snapshot = empty();
        snapshot.catalog = Section::Loaded(vec![
            product("draft-1", 0, false, 0),
            product("sku-b", 0, true, 0),
            product("sku-a", 1500, true, 2),
        ]);
        assert_eq!(run("catalog_published_product", &snapshot), Ok(Verdict::Pass));
        assert_eq!(
            run("catalog_prices_valid", &snapshot),
            Ok(Verdict::fail(
                "published products without a positive price: sku-b"
            ))
        );
        assert_eq!(
            run("catalog_product_images", &snapshot),
            Ok(Verdict::fail("published products without images: sku-b"))
        );
    }

    #[test]
    fn long_lists_are_truncated() {
        let items = (0..8).map(|i| format!("sku-{i}")).collect::<Vec<_>>();
        assert_eq!(
            listed(&items),
            "sku-0, sku-1, sku-2, sku-3, sku-4 (+3 more)"
        );
    }

    #[test]
    fn legal_pages_report_each_missing_kind() {
        let mut snapshot = empty();
        snapshot.legal = Section::Loaded(vec![LegalPage {
            kind: LegalPageKind::Privacy,
            published: true,
        }]);
        assert_eq!(
            run("legal_pages_published", &snapshot),
            Ok(Verdict::fail("legal pages not published: terms"))
        );
    }

    #[test]
    fn branding_checks_theme_and_colours() {
        let mut snapshot = empty();
        snapshot.branding = Section::Loaded(Branding {
            theme_code: Some("modern".to_string()),
            primary_color: Some("#FF5733".to_string()),
            secondary_color: Some("33FF57".to_string()),
            ..Branding::default()
        });
        assert_eq!(run("branding_theme_selected", &snapshot), Ok(Verdict::Pass));
        assert_eq!(
            run("branding_colors_configured", &snapshot),
            Ok(Verdict::fail("secondary colour `33FF57` is not a hex colour"))
        );
    }

    #[test]
    fn unverified_domain_with_certificate_is_a_fault() {
        let mut snapshot = empty();
        snapshot.domains = Section::Loaded(vec![CustomDomain {
            hostname: "shop.acme.test".to_string(),
            verified: false,
            ssl_active: true,
        }]);
        let fault = run("domain_ssl_active", &snapshot).expect_err("fault");
        assert_eq!(fault.category, FaultCategory::InvalidData);
    }

    #[test]
    fn unavailable_section_becomes_store_fault() {
        let mut snapshot = empty();
        snapshot.payments = Section::unavailable("unavailable", "database is locked");
        let fault = run("payments_method_configured", &snapshot).expect_err("fault");
        assert_eq!(fault.category, FaultCategory::StoreUnavailable);
        assert_eq!(
            fault.detail,
            "payments section unavailable (unavailable): database is locked"
        );
    }

    #[test]
    fn every_default_catalog_entry_has_a_builtin() {
        let catalog = crate::default_catalog().expect("default catalog");
        for spec in &catalog.probes {
            assert!(builtin_probe_fn(&spec.id).is_some(), "{}", spec.id);
        }
    }
}

// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use wasla_golive_model::{
    Branding, CustomDomain, LegalPage, LegalPageKind, PaymentMethod, ProductSummary, Section,
    ShippingZone, StoreProfile, TenantId, TenantSnapshot,
};

pub fn tenant(raw: &str) -> TenantId {
    TenantId::parse(raw).expect("tenant id")
}

/// A tenant that satisfies every builtin probe.
pub fn ready_snapshot(raw: &str) -> TenantSnapshot {
    TenantSnapshot {
        tenant: tenant(raw),
        profile: Section::Loaded(StoreProfile {
            name: "Acme Coffee".to_string(),
            contact_email: Some("owner@acme.test".to_string()),
            description: Some("Single-origin beans roasted weekly".to_string()),
            currency: Some("SAR".to_string()),
            logo_url: Some("https://cdn.acme.test/logo.png".to_string()),
        }),
        branding: Section::Loaded(Branding {
            theme_code: Some("modern".to_string()),
            primary_color: Some("#1a73e8".to_string()),
            secondary_color: Some("#fff".to_string()),
            accent_color: None,
            font_family: Some("Inter".to_string()),
        }),
        payments: Section::Loaded(vec![PaymentMethod {
            provider: "stripe".to_string(),
            enabled: true,
        }]),
        catalog: Section::Loaded(vec![ProductSummary {
            sku: "BEAN-001".to_string(),
            name: "Ethiopia Guji".to_string(),
            price_minor: 6500,
            published: true,
            image_count: 3,
        }]),
        shipping: Section::Loaded(vec![ShippingZone {
            name: "Riyadh".to_string(),
            enabled: true,
        }]),
        legal: Section::Loaded(
            [
                LegalPageKind::Terms,
                LegalPageKind::Privacy,
                LegalPageKind::Returns,
            ]
            .into_iter()
            .map(|kind| LegalPage {
                kind,
                published: true,
            })
            .collect(),
        ),
        domains: Section::Loaded(vec![CustomDomain {
            hostname: "shop.acme.test".to_string(),
            verified: true,
            ssl_active: true,
        }]),
    }
}

/// No logo, no payment method and no custom domain.
pub fn half_configured_snapshot(raw: &str) -> TenantSnapshot {
    let mut snapshot = ready_snapshot(raw);
    if let Section::Loaded(profile) = &mut snapshot.profile {
        profile.logo_url = None;
    }
    snapshot.payments = Section::Loaded(Vec::new());
    snapshot.domains = Section::Loaded(Vec::new());
    snapshot
}

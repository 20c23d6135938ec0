// SPDX-License-Identifier: Apache-2.0

use crate::TenantId;
use serde::{Deserialize, Serialize};

/// Error recorded in place of a section the data-access layer could not read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionError {
    pub category: String,
    pub detail: String,
}

/// One independently loaded part of the tenant state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded(T),
    Unavailable(SectionError),
}

impl<T> Section<T> {
    pub fn unavailable(category: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Unavailable(SectionError {
            category: category.into(),
            detail: detail.into(),
        })
    }

    pub fn as_loaded(&self) -> Result<&T, &SectionError> {
        match self {
            Self::Loaded(value) => Ok(value),
            Self::Unavailable(err) => Err(err),
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

impl<T: Default> Default for Section<T> {
    fn default() -> Self {
        Self::Loaded(T::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreProfile {
    pub name: String,
    pub contact_email: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub theme_code: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub provider: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub sku: String,
    pub name: String,
    /// Price in the currency's minor unit.
    pub price_minor: i64,
    pub published: bool,
    pub image_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingZone {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalPageKind {
    Terms,
    Privacy,
    Returns,
}

impl LegalPageKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terms => "terms",
            Self::Privacy => "privacy",
            Self::Returns => "returns",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, crate::ValidationError> {
        match raw.trim() {
            "terms" => Ok(Self::Terms),
            "privacy" => Ok(Self::Privacy),
            "returns" => Ok(Self::Returns),
            other => Err(crate::ValidationError(format!(
                "invalid legal page kind `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalPage {
    pub kind: LegalPageKind,
    pub published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDomain {
    pub hostname: String,
    pub verified: bool,
    pub ssl_active: bool,
}

/// Read-only view of one tenant's configuration and catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSnapshot {
    pub tenant: TenantId,
    pub profile: Section<StoreProfile>,
    pub branding: Section<Branding>,
    pub payments: Section<Vec<PaymentMethod>>,
    pub catalog: Section<Vec<ProductSummary>>,
    pub shipping: Section<Vec<ShippingZone>>,
    pub legal: Section<Vec<LegalPage>>,
    pub domains: Section<Vec<CustomDomain>>,
}

impl TenantSnapshot {
    /// Snapshot of a tenant that has configured nothing yet.
    #[must_use]
    pub fn empty(tenant: TenantId) -> Self {
        Self {
            tenant,
            profile: Section::default(),
            branding: Section::default(),
            payments: Section::default(),
            catalog: Section::default(),
            shipping: Section::default(),
            legal: Section::default(),
            domains: Section::default(),
        }
    }

    #[must_use]
    pub fn unavailable_sections(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if !self.profile.is_loaded() {
            out.push("profile");
        }
        if !self.branding.is_loaded() {
            out.push("branding");
        }
        if !self.payments.is_loaded() {
            out.push("payments");
        }
        if !self.catalog.is_loaded() {
            out.push("catalog");
        }
        if !self.shipping.is_loaded() {
            out.push("shipping");
        }
        if !self.legal.is_loaded() {
            out.push("legal");
        }
        if !self.domains.is_loaded() {
            out.push("domains");
        }
        out
    }
}

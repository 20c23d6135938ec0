// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use wasla_golive_core::StoreError;
use wasla_golive_model::{
    Branding, CustomDomain, LegalPage, PaymentMethod, ProductSummary, ShippingZone, StoreProfile,
    TenantId,
};

/// JSON description of one tenant, used to seed a store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantFixture {
    pub tenant: String,
    pub profile: StoreProfile,
    #[serde(default)]
    pub branding: Branding,
    #[serde(default)]
    pub payments: Vec<PaymentMethod>,
    #[serde(default)]
    pub catalog: Vec<ProductSummary>,
    #[serde(default)]
    pub shipping: Vec<ShippingZone>,
    #[serde(default)]
    pub legal: Vec<LegalPage>,
    #[serde(default)]
    pub domains: Vec<CustomDomain>,
}

#[derive(Debug)]
pub enum FixtureError {
    Io { path: PathBuf, detail: String },
    Parse { origin: String, detail: String },
    Invalid { origin: String, detail: String },
    Store(StoreError),
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, detail } => write!(f, "read {} failed: {detail}", path.display()),
            Self::Parse { origin, detail } => write!(f, "{origin}: invalid fixture json: {detail}"),
            Self::Invalid { origin, detail } => write!(f, "{origin}: {detail}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FixtureError {}

impl From<StoreError> for FixtureError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl TenantFixture {
    pub fn parse(text: &str, origin: &str) -> Result<Self, FixtureError> {
        let fixture: Self = serde_json::from_str(text).map_err(|err| FixtureError::Parse {
            origin: origin.to_string(),
            detail: err.to_string(),
        })?;
        fixture.validate(origin)?;
        Ok(fixture)
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let text = fs::read_to_string(path).map_err(|err| FixtureError::Io {
            path: path.to_path_buf(),
            detail: err.to_string(),
        })?;
        Self::parse(&text, &path.display().to_string())
    }

    pub fn tenant_id(&self) -> Result<TenantId, FixtureError> {
        TenantId::parse(&self.tenant).map_err(|err| FixtureError::Invalid {
            origin: self.tenant.clone(),
            detail: err.to_string(),
        })
    }

    fn validate(&self, origin: &str) -> Result<(), FixtureError> {
        let invalid = |detail: String| FixtureError::Invalid {
            origin: origin.to_string(),
            detail,
        };
        TenantId::parse(&self.tenant).map_err(|err| invalid(err.to_string()))?;
        if self.profile.name.trim().is_empty() {
            return Err(invalid("profile.name must not be empty".to_string()));
        }
        let mut skus = self.catalog.iter().map(|p| p.sku.as_str()).collect::<Vec<_>>();
        skus.sort_unstable();
        if let Some(pair) = skus.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(invalid(format!("duplicate product sku `{}`", pair[0])));
        }
        Ok(())
    }
}

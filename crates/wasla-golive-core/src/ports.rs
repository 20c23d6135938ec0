// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use wasla_golive_model::{TenantId, TenantSnapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Schema missing or behind the expected migration.
    NotReady {
        detail: String,
    },
    Unavailable {
        detail: String,
    },
    UnknownTenant {
        tenant: TenantId,
    },
    Query {
        detail: String,
    },
}

impl StoreError {
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "not_ready",
            Self::Unavailable { .. } => "unavailable",
            Self::UnknownTenant { .. } => "unknown_tenant",
            Self::Query { .. } => "query",
        }
    }

    #[must_use]
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady { detail } => write!(f, "store not ready: {detail}"),
            Self::Unavailable { detail } => write!(f, "store unavailable: {detail}"),
            Self::UnknownTenant { tenant } => write!(f, "unknown tenant `{tenant}`"),
            Self::Query { detail } => write!(f, "store query failed: {detail}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read access to tenant configuration, catalog and payment settings.
pub trait TenantStateSource {
    /// Fails with [`StoreError::NotReady`] until migrations have applied.
    fn ensure_ready(&self) -> Result<(), StoreError>;
    fn list_tenants(&self) -> Result<Vec<TenantId>, StoreError>;
    fn snapshot(&self, tenant: &TenantId) -> Result<TenantSnapshot, StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct StaticTenantSource {
    not_ready: Option<String>,
    tenants: BTreeMap<TenantId, TenantSnapshot>,
}

impl StaticTenantSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn not_ready(detail: impl Into<String>) -> Self {
        Self {
            not_ready: Some(detail.into()),
            tenants: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, snapshot: TenantSnapshot) -> Self {
        self.insert(snapshot);
        self
    }

    pub fn insert(&mut self, snapshot: TenantSnapshot) {
        self.tenants.insert(snapshot.tenant.clone(), snapshot);
    }

    fn ready_or_err(&self) -> Result<(), StoreError> {
        match &self.not_ready {
            Some(detail) => Err(StoreError::NotReady {
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl TenantStateSource for StaticTenantSource {
    fn ensure_ready(&self) -> Result<(), StoreError> {
        self.ready_or_err()
    }

    fn list_tenants(&self) -> Result<Vec<TenantId>, StoreError> {
        self.ready_or_err()?;
        Ok(self.tenants.keys().cloned().collect())
    }

    fn snapshot(&self, tenant: &TenantId) -> Result<TenantSnapshot, StoreError> {
        self.ready_or_err()?;
        self.tenants
            .get(tenant)
            .cloned()
            .ok_or_else(|| StoreError::UnknownTenant {
                tenant: tenant.clone(),
            })
    }
}

// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const TENANT_ID_MAX_LEN: usize = 64;

fn is_lower_snake(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn is_area_scoped(raw: &str) -> bool {
    let mut parts = raw.split('_');
    match (parts.next(), parts.next()) {
        (Some(area), Some(name)) => {
            !area.is_empty() && !name.is_empty() && parts.all(|p| !p.is_empty())
        }
        _ => false,
    }
}

/// Identifier of a readiness probe, `<area>_<name>` in lowercase snake_case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProbeId(String);

impl ProbeId {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err(ValidationError("probe id cannot be empty".to_string()));
        }
        if !is_lower_snake(raw) {
            return Err(ValidationError(format!(
                "invalid probe id `{raw}`: expected lowercase snake_case"
            )));
        }
        if !is_area_scoped(raw) {
            return Err(ValidationError(format!(
                "invalid probe id `{raw}`: expected <area>_<name>"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading segment of the id, e.g. `payments` for `payments_method_configured`.
    #[must_use]
    pub fn area(&self) -> &str {
        self.0.split('_').next().unwrap_or_default()
    }
}

impl Display for ProbeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err(ValidationError("tenant id cannot be empty".to_string()));
        }
        if raw.len() > TENANT_ID_MAX_LEN {
            return Err(ValidationError(format!(
                "tenant id exceeds max length {TENANT_ID_MAX_LEN}"
            )));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(ValidationError(format!(
                "invalid tenant id `{raw}`: expected [a-z0-9_-]"
            )));
        }
        Ok(Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_id_validation() {
        assert!(ProbeId::parse("payments_method_configured").is_ok());
        assert!(ProbeId::parse("payments").is_err());
        assert!(ProbeId::parse("payments__method").is_err());
        assert!(ProbeId::parse("Payments_Method").is_err());
        assert!(ProbeId::parse("payments-method").is_err());
        assert!(ProbeId::parse("").is_err());
    }

    #[test]
    fn probe_id_area_is_leading_segment() {
        let id = ProbeId::parse("store_logo_configured").expect("probe id");
        assert_eq!(id.area(), "store");
    }

    #[test]
    fn tenant_id_validation() {
        assert!(TenantId::parse("acme-shop_01").is_ok());
        assert!(TenantId::parse(" acme ").is_ok());
        assert!(TenantId::parse("Acme").is_err());
        assert!(TenantId::parse("acme shop").is_err());
        assert!(TenantId::parse(&"a".repeat(TENANT_ID_MAX_LEN + 1)).is_err());
    }
}

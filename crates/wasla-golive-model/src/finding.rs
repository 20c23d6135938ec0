// SPDX-License-Identifier: Apache-2.0

use crate::ProbeId;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Blocker,
}

impl Severity {
    pub fn parse(raw: &str) -> Result<Self, crate::ValidationError> {
        match raw.trim() {
            "warning" => Ok(Self::Warning),
            "blocker" => Ok(Self::Blocker),
            other => Err(crate::ValidationError(format!(
                "invalid severity `{other}`: expected blocker or warning"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Blocker => "blocker",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a probe could not produce a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FaultCategory {
    MissingData,
    InvalidData,
    StoreUnavailable,
    NotImplemented,
    Panic,
}

impl FaultCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingData => "missing_data",
            Self::InvalidData => "invalid_data",
            Self::StoreUnavailable => "store_unavailable",
            Self::NotImplemented => "not_implemented",
            Self::Panic => "panic",
        }
    }
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub probe: ProbeId,
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<FaultCategory>,
}

impl Finding {
    #[must_use]
    pub fn is_fault(&self) -> bool {
        self.fault.is_some()
    }
}

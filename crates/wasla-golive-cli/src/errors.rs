// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use wasla_golive_core::{CatalogError, StoreError};
use wasla_golive_store::FixtureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// At least one tenant has hard blockers.
    Blocked = 2,
    Store = 3,
    Validation = 4,
    Internal = 10,
    Usage = 64,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Blocked => "blocked",
            Self::Store => "store",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Usage => "usage",
        }
    }
}

#[derive(Debug)]
pub enum CliError {
    Config(String),
    Catalog(CatalogError),
    Store(StoreError),
    Fixture(FixtureError),
    Render(String),
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) | Self::Catalog(_) => ExitCode::Validation,
            Self::Store(_) | Self::Fixture(FixtureError::Store(_)) => ExitCode::Store,
            Self::Fixture(_) => ExitCode::Validation,
            Self::Render(_) => ExitCode::Internal,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(detail) => write!(f, "configuration error: {detail}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Fixture(err) => write!(f, "{err}"),
            Self::Render(detail) => write!(f, "render failed: {detail}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog(err)
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<FixtureError> for CliError {
    fn from(err: FixtureError) -> Self {
        Self::Fixture(err)
    }
}

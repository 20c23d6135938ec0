// SPDX-License-Identifier: Apache-2.0

//! Post-migration go-live check.
//!
//! The hook runs once per process after the storage layer reports that its
//! schema is migrated. It is fail-open: a store that is not ready skips the
//! run, and any other failure is logged and swallowed so startup continues.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{error, info, warn};
use wasla_golive_model::{Report, TenantId};

use crate::checker::{panic_detail, GoLiveChecker};
use crate::ports::{StoreError, TenantStateSource};

pub const SKIP_REASON_DB_NOT_READY: &str = "db_not_ready";

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    Disabled,
    AlreadyCompleted,
    /// Another invocation holds the run.
    InProgress,
    Skipped { reason: &'static str },
    /// Tenants whose snapshot could not be read are listed in `failed`.
    Completed {
        reports: Vec<Report>,
        failed: Vec<TenantId>,
    },
    Failed { error_code: String },
}

#[derive(Debug)]
pub struct StartupCheck {
    enabled: bool,
    checker: GoLiveChecker,
    state: AtomicU8,
}

impl StartupCheck {
    #[must_use]
    pub fn new(checker: GoLiveChecker, enabled: bool) -> Self {
        Self {
            enabled,
            checker,
            state: AtomicU8::new(IDLE),
        }
    }

    #[must_use]
    pub fn checker(&self) -> &GoLiveChecker {
        &self.checker
    }

    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.state.load(Ordering::Acquire) == DONE
    }

    pub fn on_migrations_applied(&self, source: &dyn TenantStateSource) -> StartupOutcome {
        if !self.enabled {
            return StartupOutcome::Disabled;
        }
        match self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(DONE) => return StartupOutcome::AlreadyCompleted,
            Err(_) => return StartupOutcome::InProgress,
        }

        let (outcome, next) = match panic::catch_unwind(AssertUnwindSafe(|| self.run(source))) {
            Ok(Ok((reports, failed))) => (StartupOutcome::Completed { reports, failed }, DONE),
            Ok(Err(err)) if err.is_not_ready() => {
                warn!(
                    reason = SKIP_REASON_DB_NOT_READY,
                    detail = %err,
                    "go_live_startup_check_skipped"
                );
                (
                    StartupOutcome::Skipped {
                        reason: SKIP_REASON_DB_NOT_READY,
                    },
                    IDLE,
                )
            }
            Ok(Err(err)) => {
                error!(
                    error_code = err.category(),
                    detail = %err,
                    "go_live_startup_check_failed"
                );
                (
                    StartupOutcome::Failed {
                        error_code: err.category().to_string(),
                    },
                    IDLE,
                )
            }
            Err(payload) => {
                error!(
                    error_code = "panic",
                    detail = %panic_detail(payload.as_ref()),
                    "go_live_startup_check_failed"
                );
                (
                    StartupOutcome::Failed {
                        error_code: "panic".to_string(),
                    },
                    IDLE,
                )
            }
        };
        self.state.store(next, Ordering::Release);
        outcome
    }

    /// Only readiness and tenant listing abort the run; a tenant whose
    /// snapshot fails is logged and skipped.
    fn run(
        &self,
        source: &dyn TenantStateSource,
    ) -> Result<(Vec<Report>, Vec<TenantId>), StoreError> {
        source.ensure_ready()?;
        let mut reports = Vec::new();
        let mut failed = Vec::new();
        for tenant in source.list_tenants()? {
            match self.checker.check_tenant(source, &tenant) {
                Ok(report) => {
                    info!(
                        tenant = %report.tenant(),
                        ok = report.ok(),
                        score = report.score(),
                        hard_blockers = report.hard_blockers().len(),
                        warnings = report.warnings().len(),
                        "go_live_startup_check"
                    );
                    reports.push(report);
                }
                Err(err) => {
                    error!(
                        tenant = %tenant,
                        error_code = err.category(),
                        detail = %err,
                        "go_live_startup_check_failed"
                    );
                    failed.push(tenant);
                }
            }
        }
        Ok((reports, failed))
    }
}

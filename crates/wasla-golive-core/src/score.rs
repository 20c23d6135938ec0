// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use wasla_golive_model::{ReportSummary, MAX_SCORE};

pub const DEFAULT_WARNING_CREDIT_PCT: u32 = 50;
pub const DEFAULT_BLOCKER_CEILING: u32 = 49;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePolicyError(pub String);

impl fmt::Display for ScorePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ScorePolicyError {}

/// Weighted readiness score in `0..=MAX_SCORE`.
///
/// A passing probe earns full credit, a warning earns
/// `warning_credit_pct`, a blocker or fault earns nothing. The average is
/// floored and, when any blocker is present, capped at `blocker_ceiling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePolicy {
    warning_credit_pct: u32,
    blocker_ceiling: u32,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            warning_credit_pct: DEFAULT_WARNING_CREDIT_PCT,
            blocker_ceiling: DEFAULT_BLOCKER_CEILING,
        }
    }
}

impl ScorePolicy {
    pub fn new(warning_credit_pct: u32, blocker_ceiling: u32) -> Result<Self, ScorePolicyError> {
        if warning_credit_pct >= MAX_SCORE {
            return Err(ScorePolicyError(format!(
                "warning credit {warning_credit_pct} must be below {MAX_SCORE}"
            )));
        }
        if blocker_ceiling >= MAX_SCORE {
            return Err(ScorePolicyError(format!(
                "blocker ceiling {blocker_ceiling} must be below {MAX_SCORE}"
            )));
        }
        Ok(Self {
            warning_credit_pct,
            blocker_ceiling,
        })
    }

    #[must_use]
    pub fn warning_credit_pct(&self) -> u32 {
        self.warning_credit_pct
    }

    #[must_use]
    pub fn blocker_ceiling(&self) -> u32 {
        self.blocker_ceiling
    }

    /// Faulted probes count as blockers.
    #[must_use]
    pub fn score(&self, summary: &ReportSummary) -> u32 {
        let blockers = summary.blocked + summary.faulted;
        let total = summary.passed + summary.warned + blockers;
        if total == 0 {
            return MAX_SCORE;
        }
        let credit = summary.passed * u64::from(MAX_SCORE)
            + summary.warned * u64::from(self.warning_credit_pct);
        let base = u32::try_from(credit / total).unwrap_or(MAX_SCORE);
        if blockers > 0 {
            base.min(self.blocker_ceiling)
        } else {
            base
        }
    }
}

//! Funding ledger: donation totals, progress, deadline, and cancellation rules.
//!
//! Every function here is a pure computation over a project's target, its
//! donation amounts, and a caller-supplied clock reading. Loading the data
//! and persisting the cancelled flag are the caller's concern (see
//! [`crate::store`]).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Amount, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Projects funded at or above this percentage can no longer be cancelled.
pub const CANCEL_THRESHOLD_PERCENT: i64 = 25;

/// Reported progress never exceeds this value, even when over-funded.
pub const MAX_PROGRESS_PERCENT: i64 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The business-relevant slice of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingProject {
    pub target: Amount,
    pub end_time: Timestamp,
    pub is_cancelled: bool,
}

/// A consistent read of a project together with its donation amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingSnapshot {
    pub project: FundingProject,
    pub donations: Vec<Amount>,
}

/// Cancellation lifecycle. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    Active,
    Cancelled,
}

/// Derived funding state returned alongside project reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FundingSummary {
    pub total_donated: Amount,
    pub progress_percent: Decimal,
    pub days_left: i64,
    pub can_cancel: bool,
    pub is_cancelled: bool,
    pub state: ProjectState,
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Stateless funding rules.
pub struct FundingLedger;

impl FundingLedger {
    /// Sum of all donation amounts; zero for an empty set.
    pub fn total_donated(donations: &[Amount]) -> Amount {
        donations.iter().copied().sum()
    }

    /// `min(100, total / target * 100)`.
    ///
    /// Fails with [`CoreError::InvalidConfiguration`] when the target is not
    /// positive.
    pub fn progress_percent(
        project: &FundingProject,
        donations: &[Amount],
    ) -> Result<Decimal, CoreError> {
        if project.target <= Decimal::ZERO {
            return Err(CoreError::InvalidConfiguration(format!(
                "Funding target must be positive (got {})",
                project.target
            )));
        }

        let total = Self::total_donated(donations);
        let ratio = total.checked_div(project.target).ok_or_else(|| {
            CoreError::InvalidConfiguration(format!(
                "Cannot compute progress of {total} against target {}",
                project.target
            ))
        })?;

        let max = Decimal::from(MAX_PROGRESS_PERCENT);
        let percent = ratio.checked_mul(max).unwrap_or(max);
        Ok(percent.min(max))
    }

    /// Whole days remaining until `end_time`, floored. Zero once the
    /// deadline has passed; never negative.
    pub fn days_left(project: &FundingProject, now: Timestamp) -> i64 {
        if project.end_time <= now {
            return 0;
        }
        (project.end_time - now).num_days()
    }

    /// A project may be cancelled while it is below the threshold and not
    /// already cancelled. Ownership and deadlines are not considered.
    pub fn can_cancel(project: &FundingProject, donations: &[Amount]) -> Result<bool, CoreError> {
        if project.is_cancelled {
            return Ok(false);
        }
        let progress = Self::progress_percent(project, donations)?;
        Ok(progress < Decimal::from(CANCEL_THRESHOLD_PERCENT))
    }

    /// Set the cancelled flag. A no-op on an already-cancelled project.
    pub fn cancel(project: FundingProject) -> FundingProject {
        FundingProject {
            is_cancelled: true,
            ..project
        }
    }

    /// `Cancelled` once the flag is set, `Active` otherwise.
    pub fn state(project: &FundingProject) -> ProjectState {
        if project.is_cancelled {
            ProjectState::Cancelled
        } else {
            ProjectState::Active
        }
    }

    /// Compute every derived field for a snapshot in one pass.
    pub fn summarize(snapshot: &FundingSnapshot, now: Timestamp) -> Result<FundingSummary, CoreError> {
        let project = &snapshot.project;
        let donations = snapshot.donations.as_slice();

        Ok(FundingSummary {
            total_donated: Self::total_donated(donations),
            progress_percent: Self::progress_percent(project, donations)?,
            days_left: Self::days_left(project, now),
            can_cancel: Self::can_cancel(project, donations)?,
            is_cancelled: project.is_cancelled,
            state: Self::state(project),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

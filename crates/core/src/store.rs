//! Repository seam between the funding ledger and persistence.
//!
//! [`FundingStore`] abstracts loading a project's funding snapshot and
//! persisting the cancelled flag, so the cancellation flow can be exercised
//! without a database. The PostgreSQL implementation lives in the `db` crate.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::funding::{FundingLedger, FundingSnapshot, CANCEL_THRESHOLD_PERCENT};
use crate::types::DbId;

/// Load/save capability required by the cancellation flow.
#[async_trait]
pub trait FundingStore: Send + Sync {
    /// Load a project and its donation amounts, or `None` if it does not exist.
    async fn load(&self, project_id: DbId) -> Result<Option<FundingSnapshot>, CoreError>;

    /// Persist `is_cancelled = true`. Returns `true` if the flag changed.
    ///
    /// Implementations may refuse the write (returning `false`) when the
    /// stored state no longer permits cancellation.
    async fn mark_cancelled(&self, project_id: DbId) -> Result<bool, CoreError>;
}

/// Result of a successful [`cancel_project`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    Cancelled,
    AlreadyCancelled,
}

/// Cancel a project if the ledger allows it.
///
/// The caller must have verified that the requester owns the project.
/// Re-cancelling an already-cancelled project succeeds without writing.
pub async fn cancel_project<S: FundingStore + ?Sized>(
    store: &S,
    project_id: DbId,
) -> Result<CancelOutcome, CoreError> {
    let snapshot = store
        .load(project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

    if snapshot.project.is_cancelled {
        return Ok(CancelOutcome::AlreadyCancelled);
    }

    if !FundingLedger::can_cancel(&snapshot.project, &snapshot.donations)? {
        return Err(CoreError::Conflict(format!(
            "Project can't be cancelled as it has reached {CANCEL_THRESHOLD_PERCENT}% of target"
        )));
    }

    let cancelled = FundingLedger::cancel(snapshot.project);
    debug_assert!(cancelled.is_cancelled);

    if store.mark_cancelled(project_id).await? {
        return Ok(CancelOutcome::Cancelled);
    }

    // The write was refused: either a concurrent cancel won, or a concurrent
    // donation pushed the project over the threshold.
    match store.load(project_id).await? {
        Some(current) if current.project.is_cancelled => Ok(CancelOutcome::AlreadyCancelled),
        Some(_) => Err(CoreError::Conflict(format!(
            "Project can't be cancelled as it has reached {CANCEL_THRESHOLD_PERCENT}% of target"
        ))),
        None => Err(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }),
    }
}

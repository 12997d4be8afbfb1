//! PostgreSQL implementation of [`FundingStore`].

use async_trait::async_trait;
use crowdfund_core::error::CoreError;
use crowdfund_core::funding::{FundingSnapshot, CANCEL_THRESHOLD_PERCENT};
use crowdfund_core::store::FundingStore;
use crowdfund_core::types::DbId;
use sqlx::PgPool;

use crate::repositories::{DonationRepo, ProjectRepo};

/// Loads funding snapshots from `projects` + `donations` and persists the
/// cancelled flag.
#[derive(Clone)]
pub struct PgFundingStore {
    pool: PgPool,
}

impl PgFundingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn internal(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Funding store query failed");
    CoreError::Internal(err.to_string())
}

#[async_trait]
impl FundingStore for PgFundingStore {
    async fn load(&self, project_id: DbId) -> Result<Option<FundingSnapshot>, CoreError> {
        let Some(project) = ProjectRepo::find_by_id(&self.pool, project_id)
            .await
            .map_err(internal)?
        else {
            return Ok(None);
        };

        let donations = DonationRepo::amounts_for_project(&self.pool, project_id)
            .await
            .map_err(internal)?;

        Ok(Some(FundingSnapshot {
            project: project.funding(),
            donations,
        }))
    }

    /// The threshold is re-checked under a row lock, so a donation committed
    /// after [`Self::load`], or still in flight, blocks the cancel.
    async fn mark_cancelled(&self, project_id: DbId) -> Result<bool, CoreError> {
        ProjectRepo::mark_cancelled_below_threshold(&self.pool, project_id, CANCEL_THRESHOLD_PERCENT)
            .await
            .map_err(internal)
    }
}

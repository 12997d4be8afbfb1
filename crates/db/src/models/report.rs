//! Project / comment report model and DTOs.

use crowdfund_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_reports` table.
///
/// `comment_id` is `None` for a report against the project itself.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub project_id: DbId,
    pub comment_id: Option<DbId>,
    pub user_id: DbId,
    pub reason: String,
    pub is_resolved: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReport {
    pub reason: String,
}

/// Query parameters for the admin report list.
#[derive(Debug, Deserialize)]
pub struct ReportListParams {
    pub resolved: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

//! Project rating model and DTOs. One rating per (project, user).

use crowdfund_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rating {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub rating: i16,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRating {
    pub rating: i16,
}

/// Aggregate rating for a project. `average` is `None` when unrated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RatingStats {
    pub average: Option<f64>,
    pub count: i64,
}

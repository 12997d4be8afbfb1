//! Project comment model and DTOs.

use crowdfund_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `project_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub content: String,
    pub is_reported: bool,
    pub created_at: Timestamp,
}

/// Comment joined with its author's username for listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub project_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub content: String,
    pub is_reported: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
}

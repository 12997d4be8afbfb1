//! Project entity model and DTOs.

use crowdfund_core::funding::FundingProject;
use crowdfund_core::types::{Amount, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub details: String,
    pub category_id: Option<DbId>,
    pub total_target: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub is_cancelled: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The slice of this row the funding ledger works on.
    pub fn funding(&self) -> FundingProject {
        FundingProject {
            target: self.total_target,
            end_time: self.end_time,
            is_cancelled: self.is_cancelled,
        }
    }
}

/// A project row annotated with rating and donation aggregates, as returned
/// by the list queries.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectWithStats {
    pub id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub details: String,
    pub category_id: Option<DbId>,
    pub total_target: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub is_cancelled: bool,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub avg_rating: Option<f64>,
    pub rating_count: i64,
    pub total_donated: Amount,
}

impl ProjectWithStats {
    pub fn funding(&self) -> FundingProject {
        FundingProject {
            target: self.total_target,
            end_time: self.end_time,
            is_cancelled: self.is_cancelled,
        }
    }
}

/// A row from the `project_pictures` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectPicture {
    pub id: DbId,
    pub project_id: DbId,
    pub image_path: String,
    pub is_featured: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a new project. The creator is the authenticated caller.
///
/// The first entry in `pictures` becomes the featured picture.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub title: String,
    pub details: String,
    pub category_id: Option<DbId>,
    pub total_target: Amount,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
    #[serde(default)]
    pub pictures: Vec<String>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// `tag_ids`, when present, replaces the full tag set. The cancelled flag is
/// deliberately absent: cancellation goes through the ledger.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub details: Option<String>,
    pub category_id: Option<DbId>,
    pub total_target: Option<Amount>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub tag_ids: Option<Vec<DbId>>,
}

/// Filters for the public project list.
#[derive(Debug, Clone, Default)]
pub struct PublicProjectFilter {
    /// Only projects whose `end_time` is after this instant are listed.
    pub now: Timestamp,
    pub category_slug: Option<String>,
    /// Matched against the title or any tag name, case-insensitively.
    pub search: Option<String>,
}

/// Filters for the admin project list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminProjectFilter {
    pub category_id: Option<DbId>,
    pub is_featured: Option<bool>,
    pub is_cancelled: Option<bool>,
    /// Matched against the title or details, case-insensitively.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

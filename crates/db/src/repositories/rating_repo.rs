//! Repository for the `project_ratings` table.

use crowdfund_core::types::DbId;
use sqlx::PgPool;

use crate::models::rating::{Rating, RatingStats};

const COLUMNS: &str = "id, project_id, user_id, rating, created_at";

pub struct RatingRepo;

impl RatingRepo {
    /// Insert a rating. A second rating by the same user violates
    /// `uq_project_ratings_project_user`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        rating: i16,
    ) -> Result<Rating, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_ratings (project_id, user_id, rating)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(rating)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Rating>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_ratings WHERE project_id = $1 AND user_id = $2"
        );
        sqlx::query_as::<_, Rating>(&query)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn stats_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<RatingStats, sqlx::Error> {
        sqlx::query_as::<_, RatingStats>(
            "SELECT AVG(rating)::float8 AS average, COUNT(*) AS count
             FROM project_ratings WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}

//! Repository for the `project_reports` table.

use crowdfund_core::types::DbId;
use sqlx::PgPool;

use crate::models::report::Report;

const COLUMNS: &str = "id, project_id, comment_id, user_id, reason, is_resolved, created_at";

pub struct ReportRepo;

impl ReportRepo {
    /// Report a project. One per (project, user), enforced by
    /// `uq_project_reports_project_user`.
    pub async fn create_for_project(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        reason: &str,
    ) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_reports (project_id, user_id, reason)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(reason)
            .fetch_one(pool)
            .await
    }

    /// Report a comment and flag it as reported, atomically. One per
    /// (comment, user), enforced by `uq_project_reports_comment_user`.
    pub async fn create_for_comment(
        pool: &PgPool,
        project_id: DbId,
        comment_id: DbId,
        user_id: DbId,
        reason: &str,
    ) -> Result<Report, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO project_reports (project_id, comment_id, user_id, reason)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let report = sqlx::query_as::<_, Report>(&query)
            .bind(project_id)
            .bind(comment_id)
            .bind(user_id)
            .bind(reason)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE project_comments SET is_reported = true WHERE id = $1")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(report)
    }

    /// Reports, oldest first, optionally filtered by resolution state.
    pub async fn list(
        pool: &PgPool,
        resolved: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_reports
             WHERE ($1::boolean IS NULL OR is_resolved = $1)
             ORDER BY created_at, id
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(resolved)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a report resolved. Returns `None` if it does not exist.
    pub async fn resolve(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE project_reports SET is_resolved = true WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

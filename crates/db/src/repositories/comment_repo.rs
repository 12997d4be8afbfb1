//! Repository for the `project_comments` table.

use crowdfund_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentWithAuthor};

const COLUMNS: &str = "id, project_id, user_id, content, is_reported, created_at";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        content: &str,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_comments (project_id, user_id, content)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Comments on a project with author usernames, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.project_id, c.user_id, u.username, c.content, c.is_reported, c.created_at
             FROM project_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.project_id = $1
             ORDER BY c.created_at, c.id
             LIMIT $2 OFFSET $3",
        )
        .bind(project_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `tags` table and the `project_tags` join.

use crowdfund_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::Tag;

const COLUMNS: &str = "id, name, created_at";

pub struct TagRepo;

impl TagRepo {
    pub async fn create(pool: &PgPool, name: &str) -> Result<Tag, sqlx::Error> {
        let query = format!("INSERT INTO tags (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Tags attached to a project, alphabetically.
    pub async fn list_for_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.created_at
             FROM tags t
             JOIN project_tags pt ON pt.tag_id = t.id
             WHERE pt.project_id = $1
             ORDER BY t.name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `categories` table.

use sqlx::PgPool;

use crate::models::category::Category;

const COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category. The slug must already be validated.
    pub async fn create(
        pool: &PgPool,
        name: &str,
        slug: &str,
        description: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, slug, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(slug)
            .bind(description)
            .fetch_one(pool)
            .await
    }

    /// All categories, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name, id");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE slug = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}

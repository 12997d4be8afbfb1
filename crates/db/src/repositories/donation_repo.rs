//! Repository for the `donations` table. Append-only: there is no update or
//! delete method.

use crowdfund_core::types::{Amount, DbId};
use sqlx::{PgConnection, PgPool};

use crate::models::donation::Donation;

const COLUMNS: &str = "id, project_id, user_id, amount, created_at";

pub struct DonationRepo;

impl DonationRepo {
    /// Record a donation while the project is still accepting them.
    /// Returns `None` if the project is missing or cancelled.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        user_id: DbId,
        amount: Amount,
    ) -> Result<Option<Donation>, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::insert(&mut conn, project_id, user_id, amount).await
    }

    /// [`Self::create`] on a caller-supplied connection or transaction.
    ///
    /// The project row is read `FOR SHARE`, so a cancel holding it
    /// `FOR UPDATE` blocks this insert (and vice versa) until commit. After
    /// a cancel commits, the `is_cancelled` guard is re-evaluated and no row
    /// is inserted.
    pub async fn insert(
        conn: &mut PgConnection,
        project_id: DbId,
        user_id: DbId,
        amount: Amount,
    ) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO donations (project_id, user_id, amount)
             SELECT p.id, $2, $3 FROM projects p
             WHERE p.id = $1 AND p.is_cancelled = false
             FOR SHARE OF p
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(project_id)
            .bind(user_id)
            .bind(amount)
            .fetch_optional(conn)
            .await
    }

    /// Donations to a project, newest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations
             WHERE project_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every donation amount for a project, for the funding ledger.
    pub async fn amounts_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Amount>, sqlx::Error> {
        sqlx::query_scalar::<_, Amount>("SELECT amount FROM donations WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}

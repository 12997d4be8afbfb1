//! Repository for the `refresh_tokens` table.

use crowdfund_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::refresh_token::RefreshToken;

const COLUMNS: &str = "id, user_id, expires_at, revoked_at, created_at";

pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    pub async fn issue(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Revoke a live token and return its owner.
    ///
    /// Lookup and revocation are one statement, so two concurrent refreshes
    /// with the same token cannot both succeed. Returns `None` for unknown,
    /// expired or already revoked tokens.
    pub async fn consume(pool: &PgPool, token_hash: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE token_hash = $1
               AND revoked_at IS NULL
               AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
    }

    /// Revoke every live token of a user. Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}

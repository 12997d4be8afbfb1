use crowdfund_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, LoginFailure, User};

const COLUMNS: &str = "id, username, email, password_hash, role, is_active, \
                       last_login_at, failed_login_count, locked_until, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Duplicate usernames or emails fail on `uq_users_username` /
    /// `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Count a failed login and, once the count reaches `max_attempts`, lock
    /// the account for `lock_minutes`. The counter restarts after an
    /// expired lock.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_minutes: i32,
    ) -> Result<LoginFailure, sqlx::Error> {
        sqlx::query_as::<_, LoginFailure>(
            "WITH counted AS (
                 SELECT id,
                        CASE WHEN locked_until IS NOT NULL AND locked_until <= NOW()
                             THEN 1 ELSE failed_login_count + 1 END AS attempts
                 FROM users WHERE id = $1
             )
             UPDATE users u SET
                 failed_login_count = c.attempts,
                 locked_until = CASE WHEN c.attempts >= $2
                                     THEN NOW() + make_interval(mins => $3)
                                     ELSE NULL END
             FROM counted c
             WHERE u.id = c.id
             RETURNING u.failed_login_count, u.locked_until",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_minutes)
        .fetch_one(pool)
        .await
    }

    /// Reset the failure counter and lock, and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET failed_login_count = 0, locked_until = NULL, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }
}

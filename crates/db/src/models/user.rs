//! Accounts: creators, donors and admins share one table.

use crowdfund_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row of `users`, password hash included. Not `Serialize`: responses go
/// through [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn is_locked(&self, now: Timestamp) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            created_at: user.created_at,
        }
    }
}

/// Insert payload. `password_hash` is already an Argon2 PHC string.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Result of recording a failed login.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct LoginFailure {
    pub failed_login_count: i32,
    /// Set when this failure tripped the lockout.
    pub locked_until: Option<Timestamp>,
}

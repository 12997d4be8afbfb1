use crowdfund_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// An issued refresh token. The token itself is never stored, only its
/// SHA-256 hex digest.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    /// Set when the token is rotated or the user logs out.
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

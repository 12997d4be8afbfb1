//! Bearer token extractors.
//!
//! `AuthUser` rejects requests without a valid access token.
//! `OptionalAuthUser` lets anonymous callers through, but a token that is
//! sent and fails verification is still a 401.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use crowdfund_core::error::CoreError;
use crowdfund_core::types::DbId;

use crate::auth::jwt::verify_access_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity taken from a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// `"admin"` or `"user"`.
    pub role: String,
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.into()))
}

/// `Ok(None)` when no `Authorization` header was sent.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(Some)
        .ok_or_else(|| unauthorized("Authorization header must be 'Bearer <token>'"))
}

fn identify(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    let claims = verify_access_token(state.tokens(), token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected access token");
        unauthorized("Invalid or expired token")
    })?;
    Ok(AuthUser {
        user_id: claims.sub,
        role: claims.role,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| unauthorized("Authentication required"))?;
        identify(state, token)
    }
}

#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = bearer_token(parts)?
            .map(|token| identify(state, token))
            .transpose()?;
        Ok(OptionalAuthUser(user))
    }
}

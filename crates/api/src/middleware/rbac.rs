//! Role gates built on [`AuthUser`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use crowdfund_core::error::CoreError;
use crowdfund_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Admin-only extractor: 401 without a valid token, 403 for non-admins.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::debug!(user_id = user.user_id, role = %user.role, "Admin route refused");
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(Self(user))
    }
}

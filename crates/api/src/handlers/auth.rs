//! Handlers for the `/auth` resource (register, login, refresh, logout).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use crowdfund_core::error::CoreError;
use crowdfund_core::roles::ROLE_USER;
use crowdfund_db::models::user::{CreateUser, PublicUser, User};
use crowdfund_db::repositories::{RefreshTokenRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{issue_access_token, new_refresh_token, refresh_token_digest};
use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum consecutive failed login attempts before locking the account.
const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Duration in minutes to lock an account after exceeding failed attempts.
const LOCK_DURATION_MINS: i32 = 15;

const MAX_USERNAME_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair returned by register, login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: PublicUser,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

fn validate_registration(input: &RegisterRequest, min_password_length: usize) -> AppResult<()> {
    let username = input.username.trim();
    if username.is_empty() || username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Username must be between 1 and {MAX_USERNAME_LENGTH} characters"
        ))));
    }
    let email = input.email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => {
            return Err(AppError::Core(CoreError::Validation(
                "Email address is not valid".into(),
            )))
        }
    }
    validate_new_password(&input.password, username, min_password_length)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a `user`-role account and sign it in. Duplicate usernames or
/// emails surface as 409 through the unique constraints.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    validate_registration(&input, state.config.min_password_length)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let response = create_auth_response(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if user.is_locked(Utc::now()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let failure = UserRepo::record_failed_login(
            &state.pool,
            user.id,
            MAX_FAILED_ATTEMPTS,
            LOCK_DURATION_MINS,
        )
        .await?;

        if let Some(until) = failure.locked_until {
            tracing::warn!(
                user_id = user.id,
                attempts = failure.failed_login_count,
                locked_until = %until,
                "Account locked after repeated login failures"
            );
        }

        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/refresh
///
/// Trade a live refresh token for a new pair. Each refresh token works once.
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let token_hash = refresh_token_digest(&input.refresh_token);

    let user_id = RefreshTokenRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid or expired refresh token".into(),
            ))
        })?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let response = create_auth_response(&state, &user).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/auth/logout
///
/// Revoke every refresh token of the caller. Access tokens stay valid until
/// they expire.
pub async fn logout(State(state): State<AppState>, auth_user: AuthUser) -> AppResult<StatusCode> {
    let revoked = RefreshTokenRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Mint an access token and a stored refresh token for `user`.
async fn create_auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let tokens = state.tokens();
    let access_token = issue_access_token(tokens, user.id, &user.role)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let refresh = new_refresh_token();
    let expires_at = tokens.refresh_expires_at(Utc::now());
    RefreshTokenRepo::issue(&state.pool, user.id, &refresh.digest, expires_at).await?;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh.token,
        expires_in: tokens.access_ttl_secs(),
        user: PublicUser::from(user),
    })
}

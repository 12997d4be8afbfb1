#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use crowdfund_api::auth::jwt::issue_access_token;
use crowdfund_api::auth::password::hash_password;
use crowdfund_api::config::{ServerConfig, TokenConfig};
use crowdfund_api::router::build_app_router;
use crowdfund_api::state::AppState;
use crowdfund_core::types::DbId;
use crowdfund_db::models::project::{CreateProject, Project};
use crowdfund_db::models::user::{CreateUser, User};
use crowdfund_db::repositories::{DonationRepo, ProjectRepo, UserRepo};

/// Plaintext password given to every seeded user.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        db_max_connections: 5,
        min_password_length: 8,
        tokens: TokenConfig {
            secret: "integration-test-secret".to_string(),
            access_ttl_mins: 15,
            refresh_ttl_days: 7,
        },
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState::new(pool, test_config()))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert a user with `role` and return it with a signed access token.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role: role.to_string(),
        },
    )
    .await
    .unwrap();
    let token = issue_access_token(&test_config().tokens, user.id, &user.role).unwrap();
    (user, token)
}

/// Insert an open project (started, ends in 30 days) owned by `creator_id`.
pub async fn create_project(pool: &PgPool, creator_id: DbId, title: &str, target: &str) -> Project {
    create_project_with_tags(pool, creator_id, title, target, Vec::new()).await
}

pub async fn create_project_with_tags(
    pool: &PgPool,
    creator_id: DbId,
    title: &str,
    target: &str,
    tag_ids: Vec<DbId>,
) -> Project {
    let now = Utc::now();
    ProjectRepo::create(
        pool,
        creator_id,
        &CreateProject {
            title: title.to_string(),
            details: format!("Details for {title}"),
            category_id: None,
            total_target: target.parse().unwrap(),
            start_time: now - Duration::hours(1),
            end_time: now + Duration::days(30),
            tag_ids,
            pictures: Vec::new(),
        },
    )
    .await
    .unwrap()
}

pub async fn donate(pool: &PgPool, project_id: DbId, user_id: DbId, amount: &str) {
    DonationRepo::create(pool, project_id, user_id, amount.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
}

/// Refresh tokens of `user_id` that are neither revoked nor expired.
pub async fn live_refresh_tokens(pool: &PgPool, user_id: DbId) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM refresh_tokens
         WHERE user_id = $1 AND revoked_at IS NULL AND expires_at > NOW()",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Parse a JSON decimal (serialized as a string) for exact comparison.
pub fn dec(value: &serde_json::Value) -> Decimal {
    match value {
        serde_json::Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

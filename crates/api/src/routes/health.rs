//! Liveness check, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `"ok"`, or `"degraded"` when Postgres does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    let database = crowdfund_db::health_check(&state.pool)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Database unreachable"))
        .is_ok();

    Json(HealthReport {
        status: if database { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

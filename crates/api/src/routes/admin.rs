//! Route definitions for `/admin`. Every handler requires the `admin` role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /categories                create category
/// POST /tags                      create tag
/// GET  /projects                  list all projects with filters
/// PUT  /projects/{id}/featured    set featured flag
/// GET  /reports                   list reports (?resolved=)
/// POST /reports/{id}/resolve      mark resolved
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/categories", post(admin::create_category))
        .route("/tags", post(admin::create_tag))
        .route("/projects", get(admin::list_projects))
        .route("/projects/{id}/featured", put(admin::set_featured))
        .route("/reports", get(admin::list_reports))
        .route("/reports/{id}/resolve", post(admin::resolve_report))
}

//! Public category and tag listings.

use axum::routing::get;
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/categories`.
pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(taxonomy::list_categories))
}

/// Routes mounted at `/tags`.
pub fn tags_router() -> Router<AppState> {
    Router::new().route("/", get(taxonomy::list_tags))
}

//! Route definitions for the `/projects` resource and its sub-resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{donation, feedback, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET, POST  /                                   list (public), create
/// GET        /category/{slug}                    list within a category
/// GET, PUT   /{id}                               detail, update (creator)
/// POST       /{id}/cancel                        cancel (creator)
/// GET, POST  /{id}/donations                     list, donate
/// GET, POST  /{id}/comments                      list, comment
/// POST       /{id}/ratings                       rate once
/// POST       /{id}/reports                       report the project
/// POST       /{id}/comments/{comment_id}/reports report a comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/category/{slug}", get(project::list_by_category))
        .route("/{id}", get(project::get_by_id).put(project::update))
        .route("/{id}/cancel", post(project::cancel))
        .route(
            "/{id}/donations",
            get(donation::list).post(donation::create),
        )
        .route(
            "/{id}/comments",
            get(feedback::list_comments).post(feedback::create_comment),
        )
        .route("/{id}/ratings", post(feedback::create_rating))
        .route("/{id}/reports", post(feedback::report_project))
        .route(
            "/{id}/comments/{comment_id}/reports",
            post(feedback::report_comment),
        )
}

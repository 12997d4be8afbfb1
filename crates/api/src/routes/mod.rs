pub mod admin;
pub mod auth;
pub mod health;
pub mod project;
pub mod taxonomy;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                              register (public)
/// /auth/login                                 login (public)
/// /auth/refresh                               refresh (public)
/// /auth/logout                                logout (requires auth)
///
/// /projects                                   list (public), create (auth)
/// /projects/category/{slug}                   list within a category
/// /projects/{id}                              detail, update (creator)
/// /projects/{id}/cancel                       cancel (creator)
/// /projects/{id}/donations                    list, donate (auth)
/// /projects/{id}/comments                     list, comment (auth)
/// /projects/{id}/ratings                      rate (auth)
/// /projects/{id}/reports                      report project (auth)
/// /projects/{id}/comments/{cid}/reports       report comment (auth)
///
/// /categories                                 list (public)
/// /tags                                       list (public)
///
/// /admin/categories                           create (admin)
/// /admin/tags                                 create (admin)
/// /admin/projects                             moderation list (admin)
/// /admin/projects/{id}/featured               set featured (admin)
/// /admin/reports                              list (admin)
/// /admin/reports/{id}/resolve                 resolve (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // Projects with donations, comments, ratings and reports.
        .nest("/projects", project::router())
        .nest("/categories", taxonomy::categories_router())
        .nest("/tags", taxonomy::tags_router())
        // Admin-only management and moderation.
        .nest("/admin", admin::router())
}

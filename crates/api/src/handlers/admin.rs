//! Admin-only handlers: taxonomy management, project moderation and the
//! report queue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crowdfund_core::error::CoreError;
use crowdfund_core::search::{
    clamp_limit, clamp_offset, normalize_search, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crowdfund_core::taxonomy::{slugify, validate_category_name, validate_slug, validate_tag_name};
use crowdfund_core::types::DbId;
use crowdfund_db::models::category::{Category, CreateCategory};
use crowdfund_db::models::project::{AdminProjectFilter, Project};
use crowdfund_db::models::report::{Report, ReportListParams};
use crowdfund_db::models::tag::{CreateTag, Tag};
use crowdfund_db::repositories::{CategoryRepo, ProjectRepo, ReportRepo, TagRepo};
use serde::Deserialize;

use super::project::{summarize_row, ProjectListItem};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/projects/{id}/featured`.
#[derive(Debug, Deserialize)]
pub struct SetFeaturedRequest {
    pub is_featured: bool,
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/categories
///
/// The slug defaults to `slugify(name)` when omitted.
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    validate_category_name(&input.name)?;
    let name = input.name.trim();
    let slug = match input.slug {
        Some(ref slug) => slug.trim().to_string(),
        None => slugify(name),
    };
    validate_slug(&slug)?;

    let category = CategoryRepo::create(&state.pool, name, &slug, &input.description).await?;

    tracing::info!(
        category_id = category.id,
        slug = %category.slug,
        user_id = admin.user_id,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// POST /api/v1/admin/tags
pub async fn create_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<DataResponse<Tag>>)> {
    validate_tag_name(&input.name)?;

    let tag = TagRepo::create(&state.pool, input.name.trim()).await?;

    tracing::info!(tag_id = tag.id, name = %tag.name, user_id = admin.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/projects?category_id=&is_featured=&is_cancelled=&search=&limit=&offset=
///
/// Every project, cancelled and expired ones included.
pub async fn list_projects(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(mut filter): Query<AdminProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<ProjectListItem>>>> {
    let limit = clamp_limit(filter.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(filter.offset);
    filter.search = normalize_search(filter.search.as_deref());

    let rows = ProjectRepo::list_admin(&state.pool, &filter, limit, offset).await?;
    let items = rows
        .into_iter()
        .map(|project| {
            let funding = summarize_row(&project)?;
            Ok(ProjectListItem { project, funding })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(Json(DataResponse { data: items }))
}

/// PUT /api/v1/admin/projects/{id}/featured
pub async fn set_featured(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetFeaturedRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = ProjectRepo::set_featured(&state.pool, id, input.is_featured)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    tracing::info!(
        project_id = id,
        is_featured = input.is_featured,
        user_id = admin.user_id,
        "Project featured flag changed"
    );

    Ok(Json(DataResponse { data: project }))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/reports?resolved=&limit=&offset=
pub async fn list_reports(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ReportListParams>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let reports = ReportRepo::list(&state.pool, params.resolved, limit, offset).await?;
    Ok(Json(DataResponse { data: reports }))
}

/// POST /api/v1/admin/reports/{id}/resolve
pub async fn resolve_report(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = ReportRepo::resolve(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Report",
            id,
        }))?;

    tracing::info!(report_id = id, user_id = admin.user_id, "Report resolved");

    Ok(Json(DataResponse { data: report }))
}

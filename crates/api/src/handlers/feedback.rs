//! Handlers for comments, ratings and reports on a project.
//!
//! Ratings and reports are one per user and target; repeats hit the
//! `uq_project_ratings_*` / `uq_project_reports_*` constraints and surface
//! as 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crowdfund_core::comment::{validate_content, validate_reason};
use crowdfund_core::error::CoreError;
use crowdfund_core::rating::validate_rating;
use crowdfund_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crowdfund_core::types::DbId;
use crowdfund_db::models::comment::{Comment, CommentWithAuthor, CreateComment};
use crowdfund_db::models::rating::{CreateRating, Rating};
use crowdfund_db::models::report::{CreateReport, Report};
use crowdfund_db::repositories::{CommentRepo, RatingRepo, ReportRepo};

use super::project::find_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/comments?limit=&offset=
pub async fn list_comments(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<CommentWithAuthor>>>> {
    find_project(&state.pool, project_id).await?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let comments = CommentRepo::list_for_project(&state.pool, project_id, limit, offset).await?;

    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/projects/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    validate_content(&input.content)?;
    find_project(&state.pool, project_id).await?;

    let comment =
        CommentRepo::create(&state.pool, project_id, user.user_id, input.content.trim()).await?;

    tracing::info!(
        comment_id = comment.id,
        project_id,
        user_id = user.user_id,
        "Comment posted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/ratings
///
/// A user rates a project once; a second attempt is a 409.
pub async fn create_rating(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRating>,
) -> AppResult<(StatusCode, Json<DataResponse<Rating>>)> {
    validate_rating(input.rating)?;
    find_project(&state.pool, project_id).await?;

    let rating = RatingRepo::create(&state.pool, project_id, user.user_id, input.rating).await?;

    tracing::info!(
        project_id,
        user_id = user.user_id,
        rating = rating.rating,
        "Project rated"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: rating })))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/reports
pub async fn report_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateReport>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    validate_reason(&input.reason)?;
    find_project(&state.pool, project_id).await?;

    let report =
        ReportRepo::create_for_project(&state.pool, project_id, user.user_id, input.reason.trim())
            .await?;

    tracing::info!(
        report_id = report.id,
        project_id,
        user_id = user.user_id,
        "Project reported"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// POST /api/v1/projects/{id}/comments/{comment_id}/reports
///
/// Reports a comment and flags it as reported. The comment must belong to
/// the project in the path.
pub async fn report_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path((project_id, comment_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateReport>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    validate_reason(&input.reason)?;

    let comment = CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .filter(|c| c.project_id == project_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;

    let report = ReportRepo::create_for_comment(
        &state.pool,
        project_id,
        comment.id,
        user.user_id,
        input.reason.trim(),
    )
    .await?;

    tracing::info!(
        report_id = report.id,
        project_id,
        comment_id,
        user_id = user.user_id,
        "Comment reported"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

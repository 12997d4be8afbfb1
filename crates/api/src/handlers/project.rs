//! Handlers for the `/projects` resource: public list, detail, create,
//! update and cancel.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use crowdfund_core::error::CoreError;
use crowdfund_core::funding::{FundingLedger, FundingSnapshot, FundingSummary};
use crowdfund_core::project::{
    validate_details, validate_start_not_past, validate_target, validate_title, validate_window,
};
use crowdfund_core::search::{
    clamp_limit, clamp_page, normalize_search, page_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crowdfund_core::store::{cancel_project, CancelOutcome};
use crowdfund_core::types::DbId;
use crowdfund_db::models::category::Category;
use crowdfund_db::models::project::{
    CreateProject, Project, ProjectPicture, ProjectWithStats, PublicProjectFilter, UpdateProject,
};
use crowdfund_db::models::tag::Tag;
use crowdfund_db::repositories::{CategoryRepo, DonationRepo, ProjectRepo, RatingRepo, TagRepo};
use crowdfund_db::{DbPool, PgFundingStore};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::query::ProjectListParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

/// Number of similar projects shown on the detail page.
const SIMILAR_PROJECTS_LIMIT: i64 = 4;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One row of the public list: the project, its aggregates and funding state.
#[derive(Debug, Serialize)]
pub struct ProjectListItem {
    #[serde(flatten)]
    pub project: ProjectWithStats,
    pub funding: FundingSummary,
}

/// Public list page plus every category, for filter navigation.
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    #[serde(flatten)]
    pub page: Page<ProjectListItem>,
    pub categories: Vec<Category>,
    /// The category being browsed; `null` for the unfiltered list or an
    /// unknown slug.
    pub category: Option<Category>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub tags: Vec<Tag>,
    pub pictures: Vec<ProjectPicture>,
    pub funding: FundingSummary,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
    /// The caller's own rating, when authenticated and already rated.
    pub user_rating: Option<i16>,
    pub can_rate: bool,
    pub similar: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub project_id: DbId,
    pub outcome: CancelOutcome,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a project or fail with 404.
pub(crate) async fn find_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Load a project and check that `user` created it.
async fn find_owned_project(pool: &DbPool, id: DbId, user: &AuthUser) -> AppResult<Project> {
    let project = find_project(pool, id).await?;
    if project.creator_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the project creator may modify this project".into(),
        )));
    }
    Ok(project)
}

/// Funding summary for a list row, computed from its aggregated total.
pub(crate) fn summarize_row(project: &ProjectWithStats) -> AppResult<FundingSummary> {
    let snapshot = FundingSnapshot {
        project: project.funding(),
        donations: vec![project.total_donated],
    };
    Ok(FundingLedger::summarize(&snapshot, Utc::now())?)
}

async fn list_with_filter(
    state: &AppState,
    params: ProjectListParams,
    category_slug: Option<String>,
) -> AppResult<ProjectListResponse> {
    let page = clamp_page(params.page);
    let page_size = clamp_limit(params.page_size, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

    let filter = PublicProjectFilter {
        now: Utc::now(),
        category_slug: category_slug.or(params.category),
        search: normalize_search(params.search.as_deref()),
    };
    let category = match filter.category_slug.as_deref() {
        Some(slug) => CategoryRepo::find_by_slug(&state.pool, slug).await?,
        None => None,
    };

    let rows = ProjectRepo::list_public(
        &state.pool,
        &filter,
        page_size,
        page_offset(page, page_size),
    )
    .await?;
    let total = ProjectRepo::count_public(&state.pool, &filter).await?;
    let categories = CategoryRepo::list(&state.pool).await?;

    let items = rows
        .into_iter()
        .map(|project| {
            let funding = summarize_row(&project)?;
            Ok(ProjectListItem { project, funding })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ProjectListResponse {
        page: Page {
            page,
            page_size,
            total,
            items,
        },
        categories,
        category,
    })
}

fn validate_create(input: &CreateProject) -> AppResult<()> {
    validate_title(&input.title)?;
    validate_details(&input.details)?;
    validate_target(input.total_target)?;
    validate_window(input.start_time, input.end_time)?;
    validate_start_not_past(input.start_time, Utc::now())?;
    if input.pictures.iter().any(|p| p.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Picture paths must not be empty".into(),
        )));
    }
    Ok(())
}

/// Validate the fields present in `input` against the stored project.
///
/// The start-in-the-future rule only applies when the start time changes.
fn validate_update(current: &Project, input: &UpdateProject) -> AppResult<()> {
    if let Some(ref title) = input.title {
        validate_title(title)?;
    }
    if let Some(ref details) = input.details {
        validate_details(details)?;
    }
    if let Some(target) = input.total_target {
        validate_target(target)?;
    }
    if input.start_time.is_some() || input.end_time.is_some() {
        let start = input.start_time.unwrap_or(current.start_time);
        let end = input.end_time.unwrap_or(current.end_time);
        validate_window(start, end)?;
    }
    if let Some(start) = input.start_time {
        if start != current.start_time {
            validate_start_not_past(start, Utc::now())?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects?search=&category=&page=&page_size=
///
/// Open projects (not cancelled, deadline ahead), newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<DataResponse<ProjectListResponse>>> {
    let response = list_with_filter(&state, params, None).await?;
    Ok(Json(DataResponse { data: response }))
}

/// GET /api/v1/projects/category/{slug}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<DataResponse<ProjectListResponse>>> {
    let response = list_with_filter(&state, params, Some(slug)).await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/projects
///
/// Create a project owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate_create(&input)?;

    let project = ProjectRepo::create(&state.pool, user.user_id, &input).await?;

    tracing::info!(
        project_id = project.id,
        user_id = user.user_id,
        target = %project.total_target,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{id}
///
/// Full detail view. An optional bearer token adds the caller's own rating.
pub async fn get_by_id(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = find_project(&state.pool, id).await?;

    let donations = DonationRepo::amounts_for_project(&state.pool, id).await?;
    let snapshot = FundingSnapshot {
        project: project.funding(),
        donations,
    };
    let funding = FundingLedger::summarize(&snapshot, Utc::now())?;

    let tags = TagRepo::list_for_project(&state.pool, id).await?;
    let pictures = ProjectRepo::pictures(&state.pool, id).await?;
    let stats = RatingRepo::stats_for_project(&state.pool, id).await?;
    let similar = ProjectRepo::similar_by_tags(&state.pool, id, SIMILAR_PROJECTS_LIMIT).await?;

    let user_rating = match user {
        Some(ref user) => RatingRepo::find_for_user(&state.pool, id, user.user_id)
            .await?
            .map(|r| r.rating),
        None => None,
    };

    Ok(Json(DataResponse {
        data: ProjectDetail {
            project,
            tags,
            pictures,
            funding,
            average_rating: stats.average,
            rating_count: stats.count,
            user_rating,
            can_rate: user_rating.is_none(),
            similar,
        },
    }))
}

/// PUT /api/v1/projects/{id}
///
/// Partial update by the creator. Cancelled projects are frozen.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let current = find_owned_project(&state.pool, id, &user).await?;
    if current.is_cancelled {
        return Err(AppError::Core(CoreError::Conflict(
            "A cancelled project cannot be updated".into(),
        )));
    }
    validate_update(&current, &input)?;

    let Some(project) = ProjectRepo::update(&state.pool, id, &input).await? else {
        // Refused by the guard: cancelled since the read above, or gone.
        return Err(match find_project(&state.pool, id).await? {
            current if current.is_cancelled => AppError::Core(CoreError::Conflict(
                "A cancelled project cannot be updated".into(),
            )),
            _ => AppError::Core(CoreError::Internal(format!(
                "Update of project {id} matched no row"
            ))),
        });
    };

    tracing::info!(project_id = id, user_id = user.user_id, "Project updated");

    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/cancel
///
/// Creator-only. Refused with 409 once donations reach the threshold;
/// repeating a successful cancel is a no-op.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CancelResponse>>> {
    find_owned_project(&state.pool, id, &user).await?;

    let store = PgFundingStore::new(state.pool.clone());
    let outcome = cancel_project(&store, id).await?;

    match outcome {
        CancelOutcome::Cancelled => {
            tracing::info!(project_id = id, user_id = user.user_id, "Project cancelled");
        }
        CancelOutcome::AlreadyCancelled => {
            tracing::debug!(project_id = id, "Project was already cancelled");
        }
    }

    Ok(Json(DataResponse {
        data: CancelResponse {
            project_id: id,
            outcome,
        },
    }))
}

//! Handlers for `/projects/{id}/donations`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use crowdfund_core::donation::{ensure_accepting, validate_amount};
use crowdfund_core::error::CoreError;
use crowdfund_core::search::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crowdfund_core::types::DbId;
use crowdfund_db::models::donation::{CreateDonation, Donation};
use crowdfund_db::repositories::DonationRepo;

use super::project::find_project;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{id}/donations?limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Donation>>>> {
    find_project(&state.pool, project_id).await?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    let offset = clamp_offset(params.offset);
    let donations = DonationRepo::list_for_project(&state.pool, project_id, limit, offset).await?;

    Ok(Json(DataResponse { data: donations }))
}

/// POST /api/v1/projects/{id}/donations
///
/// Donate to an open project. Cancelled projects answer 409.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateDonation>,
) -> AppResult<(StatusCode, Json<DataResponse<Donation>>)> {
    validate_amount(input.amount)?;

    let project = find_project(&state.pool, project_id).await?;
    ensure_accepting(project.is_cancelled)?;

    // The insert re-checks the flag; `None` means a cancel landed in between.
    let Some(donation) =
        DonationRepo::create(&state.pool, project_id, user.user_id, input.amount).await?
    else {
        return Err(AppError::Core(CoreError::Conflict(
            "Project has been cancelled and no longer accepts donations".into(),
        )));
    };

    tracing::info!(
        donation_id = donation.id,
        project_id,
        user_id = user.user_id,
        amount = %donation.amount,
        "Donation recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

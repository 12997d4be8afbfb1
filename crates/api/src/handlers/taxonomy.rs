//! Public listing of categories and tags.

use axum::extract::State;
use axum::Json;
use crowdfund_db::models::category::Category;
use crowdfund_db::models::tag::Tag;
use crowdfund_db::repositories::{CategoryRepo, TagRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/tags
pub async fn list_tags(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Tag>>>> {
    let tags = TagRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

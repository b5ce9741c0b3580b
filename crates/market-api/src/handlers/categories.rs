//! Category handler

use axum::{extract::State, Json};
use market_service::dto::CategoryResponse;
use market_service::CategoryService;

use crate::response::ApiResult;
use crate::state::AppState;

/// GET /categories
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let categories = CategoryService::new(state.service_context()).list().await?;
    Ok(Json(categories))
}

//! Favorite handlers

use axum::{extract::State, Json};
use market_service::dto::{IsFavoriteResponse, ItemsResponse, ListingCard, SuccessResponse};
use market_service::FavoriteService;
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath, OptionalAuthUser};
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// POST /listings/{listing_id}/favorite
pub async fn favorite(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = FavoriteService::new(state.service_context())
        .favorite(auth.user_id, listing_id)
        .await?;
    Ok(Json(response))
}

/// POST /listings/{listing_id}/unfavorite
pub async fn unfavorite(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = FavoriteService::new(state.service_context())
        .unfavorite(auth.user_id, listing_id)
        .await?;
    Ok(Json(response))
}

/// `false` for anonymous callers
///
/// GET /listings/{listing_id}/is-favorite
pub async fn is_favorite(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<NoStore<IsFavoriteResponse>> {
    let response = FavoriteService::new(state.service_context())
        .is_favorite(auth.user_id(), listing_id)
        .await?;
    Ok(NoStore(response))
}

/// The caller's saved listings
///
/// GET /favorites
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoStore<ItemsResponse<ListingCard>>> {
    let response = FavoriteService::new(state.service_context())
        .list(auth.user_id)
        .await?;
    Ok(NoStore(response))
}

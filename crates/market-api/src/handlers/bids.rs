//! Bid handlers

use axum::{extract::State, Json};
use market_service::dto::{BidItem, BidResponse, BidSummaryResponse, PlaceBidRequest};
use market_service::BidService;
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath, JsonBody};
use crate::response::{ApiResult, Created, NoStore};
use crate::state::AppState;

/// Bids on a listing, highest first
///
/// GET /listings/{listing_id}/bids
pub async fn list(
    State(state): State<AppState>,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<NoStore<Vec<BidItem>>> {
    let bids = BidService::new(state.service_context()).list(listing_id).await?;
    Ok(NoStore(bids))
}

/// Place a bid
///
/// POST /listings/{listing_id}/bids
pub async fn place(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(listing_id): IdPath<Uuid>,
    JsonBody(request): JsonBody<PlaceBidRequest>,
) -> ApiResult<Created<Json<BidResponse>>> {
    let response = BidService::new(state.service_context())
        .place(auth.user_id, listing_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /listings/{listing_id}/bids/summary
pub async fn summary(
    State(state): State<AppState>,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<NoStore<BidSummaryResponse>> {
    let summary = BidService::new(state.service_context()).summary(listing_id).await?;
    Ok(NoStore(summary))
}

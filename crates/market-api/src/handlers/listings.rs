//! Listing handlers
//!
//! Browse grid and CRUD for a seller's own listings.

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use market_service::dto::{
    BrowseListingsParams, CreateListingRequest, ListingResponse, SuccessResponse,
    UpdateListingRequest,
};
use market_service::ListingService;
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath, LooseQuery, ValidatedJson};
use crate::response::{ApiResult, Created, NoStore};
use crate::state::AppState;

/// Milliseconds spent answering a browse request
pub const QUERY_TIME_HEADER: &str = "x-query-time";

/// Browse active listings
///
/// GET /listings
pub async fn browse(
    State(state): State<AppState>,
    LooseQuery(params): LooseQuery<BrowseListingsParams>,
) -> ApiResult<Response> {
    let page = ListingService::new(state.service_context()).browse(params).await?;
    let duration_ms = page.meta.as_ref().map(|m| m.duration_ms);

    let mut response = NoStore(page).into_response();
    if let Some(ms) = duration_ms {
        response
            .headers_mut()
            .insert(HeaderName::from_static(QUERY_TIME_HEADER), HeaderValue::from(ms));
    }
    Ok(response)
}

/// Create listing
///
/// POST /listings
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateListingRequest>,
) -> ApiResult<Created<Json<ListingResponse>>> {
    let response = ListingService::new(state.service_context())
        .create(auth.user_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// Get listing by ID
///
/// GET /listings/{listing_id}
pub async fn get(
    State(state): State<AppState>,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<Json<ListingResponse>> {
    let response = ListingService::new(state.service_context()).get(listing_id).await?;
    Ok(Json(response))
}

/// Update own listing
///
/// PUT /listings/{listing_id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(listing_id): IdPath<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateListingRequest>,
) -> ApiResult<Json<ListingResponse>> {
    let response = ListingService::new(state.service_context())
        .update(auth.user_id, listing_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete own listing
///
/// DELETE /listings/{listing_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(listing_id): IdPath<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = ListingService::new(state.service_context())
        .delete(auth.user_id, listing_id)
        .await?;
    Ok(Json(response))
}

//! Review handlers

use axum::{extract::State, Json};
use market_service::dto::{CreateReviewRequest, ItemsResponse, ReviewItem, ReviewListParams, SubmittedReview};
use market_service::ReviewService;

use crate::extractors::{AuthUser, JsonBody, LooseQuery};
use crate::response::{ApiResult, Created, NoStore};
use crate::state::AppState;

/// Reviews for a listing and/or business
///
/// GET /reviews?listing_id=&business_id=
pub async fn list(
    State(state): State<AppState>,
    LooseQuery(params): LooseQuery<ReviewListParams>,
) -> ApiResult<NoStore<ItemsResponse<ReviewItem>>> {
    let reviews = ReviewService::new(state.service_context()).list(params).await?;
    Ok(NoStore(reviews))
}

/// Leave or overwrite a review
///
/// POST /reviews
pub async fn submit(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<CreateReviewRequest>,
) -> ApiResult<Created<Json<SubmittedReview>>> {
    let review = ReviewService::new(state.service_context())
        .submit(auth.user_id, request)
        .await?;
    Ok(Created(Json(review)))
}

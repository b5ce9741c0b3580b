//! Payment request handler

use axum::{extract::State, Json};
use market_service::dto::{PaymentRequestBody, PaymentRequestResponse};
use market_service::PaymentRequestService;

use crate::extractors::{AuthUser, JsonBody};
use crate::response::ApiResult;
use crate::state::AppState;

/// Ask the seller for a payment link in chat
///
/// POST /payments/request
pub async fn request(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(body): JsonBody<PaymentRequestBody>,
) -> ApiResult<Json<PaymentRequestResponse>> {
    let response = PaymentRequestService::new(state.service_context())
        .request(auth.user_id, body)
        .await?;
    Ok(Json(response))
}

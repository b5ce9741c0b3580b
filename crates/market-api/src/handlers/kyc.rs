//! Seller onboarding handlers
//!
//! Thin plumbing between the onboarding form and the payment processor.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use market_core::value_objects::IDENTITY_DOCUMENT_MAX_BYTES;
use market_service::dto::{
    ExternalAccountRequest, ExternalAccountResponse, KycAccountResponse, KycFileParams,
    KycFileResponse, KycOnboardRequest, KycStatusResponse, OnboardResponse, VerificationResponse,
};
use market_service::KycService;
use serde_json::Value;

use crate::extractors::{AuthUser, ClientIp, JsonBody, LooseQuery};
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// Create the caller's connected account
///
/// POST /kyc/onboard
pub async fn onboard(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(form): JsonBody<KycOnboardRequest>,
) -> ApiResult<Json<OnboardResponse>> {
    let response = KycService::new(state.service_context())
        .onboard(auth.user_id, form)
        .await?;
    Ok(Json(response))
}

/// Verification status of the connected account
///
/// GET /kyc/status
pub async fn status(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoStore<KycStatusResponse>> {
    let response = KycService::new(state.service_context())
        .status(auth.user_id)
        .await?;
    Ok(NoStore(response))
}

/// Body limit for identity document uploads; the service reports sizes
/// between the document maximum and this limit as `FILE_TOO_LARGE`
pub const KYC_FILE_BODY_LIMIT: usize = IDENTITY_DOCUMENT_MAX_BYTES * 2;

/// Whether the caller's account holder details are submitted
///
/// GET /kyc/verification
pub async fn verification(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoStore<VerificationResponse>> {
    let response = KycService::new(state.service_context())
        .verification(auth.user_id)
        .await?;
    Ok(NoStore(response))
}

/// Upload an identity document as the raw request body
///
/// POST /kyc/file?filename=...
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    LooseQuery(params): LooseQuery<KycFileParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<KycFileResponse>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let response = KycService::new(state.service_context())
        .upload_identity_document(auth.user_id, params.filename, content_type, body.to_vec())
        .await?;
    Ok(Json(response))
}

/// Attach a tokenized bank account
///
/// POST /kyc/external-account
pub async fn external_account(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<ExternalAccountRequest>,
) -> ApiResult<Json<ExternalAccountResponse>> {
    let response = KycService::new(state.service_context())
        .add_external_account(auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Send requested verification details; terms acceptance is stamped here
///
/// PATCH /kyc/account
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    client_ip: ClientIp,
    JsonBody(update): JsonBody<Value>,
) -> ApiResult<Json<KycAccountResponse>> {
    let response = KycService::new(state.service_context())
        .update_account(auth.user_id, update, client_ip.as_deref())
        .await?;
    Ok(Json(response))
}

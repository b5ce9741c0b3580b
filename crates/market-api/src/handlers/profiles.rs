//! Profile handlers

use axum::{extract::State, Json};
use market_service::dto::{CurrentProfileResponse, EntitlementsResponse, ProfileResponse};
use market_service::{EntitlementService, ProfileService};
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath};
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// Get current user's profile
///
/// GET /profiles/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<CurrentProfileResponse>> {
    let profile = ProfileService::new(state.service_context()).me(auth.user_id).await?;
    Ok(Json(profile))
}

/// Plan limits and live usage
///
/// GET /profiles/me/entitlements
pub async fn entitlements(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoStore<EntitlementsResponse>> {
    let report = EntitlementService::new(state.service_context())
        .report(auth.user_id)
        .await?;
    Ok(NoStore(report))
}

/// Get public profile
///
/// GET /profiles/{profile_id}
pub async fn get(
    State(state): State<AppState>,
    IdPath(profile_id): IdPath<Uuid>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = ProfileService::new(state.service_context()).get(profile_id).await?;
    Ok(Json(profile))
}

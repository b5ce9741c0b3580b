//! Chat dock handlers
//!
//! Each call returns the recomputed layout of the caller's docks.

use axum::{extract::State, Json};
use market_service::dto::{DockOffsetRequest, DockResponse, DockWidthRequest, MinimizeDockRequest, OpenDockRequest};
use market_service::DockService;
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath, JsonBody, ValidatedJson};
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// GET /dock
pub async fn get(State(state): State<AppState>, auth: AuthUser) -> ApiResult<NoStore<DockResponse>> {
    let layout = DockService::new(state.service_context()).get(auth.user_id).await?;
    Ok(NoStore(layout))
}

/// POST /dock/open
pub async fn open(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<OpenDockRequest>,
) -> ApiResult<Json<DockResponse>> {
    let layout = DockService::new(state.service_context())
        .open(auth.user_id, request)
        .await?;
    Ok(Json(layout))
}

/// POST /dock/{dock_id}/close
pub async fn close(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(dock_id): IdPath<Uuid>,
) -> ApiResult<Json<DockResponse>> {
    let layout = DockService::new(state.service_context())
        .close(auth.user_id, dock_id)
        .await?;
    Ok(Json(layout))
}

/// POST /dock/{dock_id}/minimize
pub async fn minimize(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(dock_id): IdPath<Uuid>,
    JsonBody(request): JsonBody<MinimizeDockRequest>,
) -> ApiResult<Json<DockResponse>> {
    let layout = DockService::new(state.service_context())
        .minimize(auth.user_id, dock_id, request)
        .await?;
    Ok(Json(layout))
}

/// Rendered width reported by the client
///
/// POST /dock/{dock_id}/width
pub async fn width(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(dock_id): IdPath<Uuid>,
    ValidatedJson(request): ValidatedJson<DockWidthRequest>,
) -> ApiResult<Json<DockResponse>> {
    let layout = DockService::new(state.service_context())
        .report_width(auth.user_id, dock_id, request)
        .await?;
    Ok(Json(layout))
}

/// POST /dock/offset
pub async fn offset(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<DockOffsetRequest>,
) -> ApiResult<Json<DockResponse>> {
    let layout = DockService::new(state.service_context())
        .set_offset(auth.user_id, request)
        .await?;
    Ok(Json(layout))
}

/// Navigation closes every dock
///
/// POST /dock/close-all
pub async fn close_all(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<DockResponse>> {
    let layout = DockService::new(state.service_context())
        .close_all(auth.user_id)
        .await?;
    Ok(Json(layout))
}

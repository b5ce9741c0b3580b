//! Conversation handlers

use axum::{extract::State, Json};
use market_service::dto::{ConversationResponse, ConversationSummary, OkResponse, StartConversationRequest};
use market_service::{ConversationService, ReadService};
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath, JsonBody};
use crate::response::{ApiResult, NoStore};
use crate::state::AppState;

/// Caller's conversations, most recent first
///
/// GET /conversations
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<NoStore<Vec<ConversationSummary>>> {
    let conversations = ConversationService::new(state.service_context())
        .list(auth.user_id)
        .await?;
    Ok(NoStore(conversations))
}

/// Start or reopen a conversation
///
/// POST /conversations
pub async fn start(
    State(state): State<AppState>,
    auth: AuthUser,
    JsonBody(request): JsonBody<StartConversationRequest>,
) -> ApiResult<Json<ConversationResponse>> {
    let conversation = ConversationService::new(state.service_context())
        .start(auth.user_id, request)
        .await?;
    Ok(Json(conversation))
}

/// GET /conversations/{conversation_id}
pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath<Uuid>,
) -> ApiResult<Json<ConversationResponse>> {
    let conversation = ConversationService::new(state.service_context())
        .get(auth.user_id, conversation_id)
        .await?;
    Ok(Json(conversation))
}

/// Mark the conversation read up to now
///
/// POST /conversations/{conversation_id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath<Uuid>,
) -> ApiResult<Json<OkResponse>> {
    let response = ReadService::new(state.service_context())
        .mark_read(auth.user_id, conversation_id)
        .await?;
    Ok(Json(response))
}

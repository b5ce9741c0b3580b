//! Message handlers
//!
//! Endpoints for message operations.

use axum::{extract::State, Json};
use market_service::dto::{
    EditMessageRequest, MessageListParams, MessageResponse, SendMessageRequest, SuccessResponse,
    UnreadResponse,
};
use market_service::{MessageService, ReadService};
use uuid::Uuid;

use crate::extractors::{AuthUser, IdPath, LooseQuery, OptionalAuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoStore};
use crate::state::AppState;

/// Get messages in conversation, oldest first
///
/// GET /conversations/{conversation_id}/messages?before=&limit=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath<Uuid>,
    LooseQuery(params): LooseQuery<MessageListParams>,
) -> ApiResult<NoStore<Vec<MessageResponse>>> {
    let messages = MessageService::new(state.service_context())
        .list(auth.user_id, conversation_id, params)
        .await?;
    Ok(NoStore(messages))
}

/// Send message
///
/// POST /conversations/{conversation_id}/messages
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(conversation_id): IdPath<Uuid>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let message = MessageService::new(state.service_context())
        .send(auth.user_id, conversation_id, request)
        .await?;
    Ok(Created(Json(message)))
}

/// Edit own message
///
/// PATCH /messages/{message_id}
pub async fn edit(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath<Uuid>,
    ValidatedJson(request): ValidatedJson<EditMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message = MessageService::new(state.service_context())
        .edit(auth.user_id, message_id, request)
        .await?;
    Ok(Json(message))
}

/// Soft-delete own message
///
/// DELETE /messages/{message_id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    let response = MessageService::new(state.service_context())
        .delete(auth.user_id, message_id)
        .await?;
    Ok(Json(response))
}

/// Unread badge; anonymous callers get zero
///
/// GET /messages/unread
pub async fn unread(
    State(state): State<AppState>,
    auth: OptionalAuthUser,
) -> ApiResult<NoStore<UnreadResponse>> {
    let response = ReadService::new(state.service_context())
        .unread_total(auth.user_id())
        .await?;
    Ok(NoStore(response))
}

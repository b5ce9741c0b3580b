//! Subscribe (op 3) and unsubscribe (op 4) handlers

use super::{GatewayError, GatewayResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, ConversationPayload};
use crate::server::GatewayState;
use market_cache::PubSubChannel;
use market_service::services::ConversationService;
use serde_json::json;
use std::sync::Arc;

/// Dispatched once the connection receives a conversation's events
pub const SUBSCRIBED: &str = "SUBSCRIBED";
/// Dispatched when the caller is not a participant
pub const SUBSCRIPTION_REJECTED: &str = "SUBSCRIPTION_REJECTED";

pub struct SubscriptionHandler;

impl SubscriptionHandler {
    /// Bind to `conversation:{id}` after checking membership
    pub async fn subscribe(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: ConversationPayload,
    ) -> GatewayResult<Option<CloseCode>> {
        let user_id = connection.user_id().ok_or(GatewayError::NotAuthenticated)?;
        let conversation_id = payload.conversation_id;

        let member = ConversationService::new(state.service_context())
            .is_participant(user_id, conversation_id)
            .await?;
        let body = json!({ "conversation_id": conversation_id });

        if !member {
            tracing::debug!(
                session_id = %connection.session_id(),
                conversation_id = %conversation_id,
                "Subscription rejected"
            );
            connection
                .dispatch(SUBSCRIPTION_REJECTED, body)
                .await
                .map_err(|_| GatewayError::ConnectionClosed)?;
            return Ok(None);
        }

        state
            .connection_manager()
            .subscribe_to_conversation(connection.session_id(), conversation_id);
        state
            .event_dispatcher()
            .bind(PubSubChannel::conversation(conversation_id))
            .await?;
        connection
            .dispatch(SUBSCRIBED, body)
            .await
            .map_err(|_| GatewayError::ConnectionClosed)?;

        Ok(None)
    }

    /// Drop the binding; the Redis channel is released with its last watcher
    pub async fn unsubscribe(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: ConversationPayload,
    ) -> GatewayResult<Option<CloseCode>> {
        let conversation_id = payload.conversation_id;
        let emptied = state
            .connection_manager()
            .unsubscribe_from_conversation(connection.session_id(), conversation_id);
        if emptied {
            state
                .event_dispatcher()
                .unbind(&[PubSubChannel::conversation(conversation_id)])
                .await?;
        }
        Ok(None)
    }
}

//! Mark-read handler (op 5)

use super::{GatewayError, GatewayResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, ConversationPayload};
use crate::server::GatewayState;
use market_service::services::ReadService;
use std::sync::Arc;

pub struct MarkReadHandler;

impl MarkReadHandler {
    /// Queue a debounced read-marker update
    pub fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: ConversationPayload,
    ) -> GatewayResult<Option<CloseCode>> {
        let user_id = connection.user_id().ok_or(GatewayError::NotAuthenticated)?;
        let conversation_id = payload.conversation_id;
        let state = state.clone();

        connection.reads().schedule(conversation_id, async move {
            let result = ReadService::new(state.service_context())
                .mark_read(user_id, conversation_id)
                .await;
            if let Err(e) = result {
                tracing::warn!(
                    user_id = %user_id,
                    conversation_id = %conversation_id,
                    error = %e,
                    "Mark read failed"
                );
            }
        });

        Ok(None)
    }
}

//! Op code handlers

mod error;
mod heartbeat;
mod identify;
mod mark_read;
mod subscription;

pub use error::{GatewayError, GatewayResult};
pub use heartbeat::HeartbeatHandler;
pub use identify::IdentifyHandler;
pub use mark_read::MarkReadHandler;
pub use subscription::{SubscriptionHandler, SUBSCRIBED, SUBSCRIPTION_REJECTED};

use crate::connection::Connection;
use crate::protocol::{CloseCode, ConversationPayload, GatewayMessage, IdentifyPayload, OpCode};
use crate::server::GatewayState;
use std::sync::Arc;

/// Routes parsed client frames to their handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle one client frame; `Some` closes the connection with that code
    pub async fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> GatewayResult<Option<CloseCode>> {
        if !message.op.allowed_before_identify() && !connection.is_authenticated() {
            tracing::debug!(
                session_id = %connection.session_id(),
                op = %message.op,
                "Op sent before Identify"
            );
            return Ok(Some(CloseCode::NotAuthenticated));
        }

        match message.op {
            OpCode::Heartbeat => HeartbeatHandler::handle(connection).await,
            OpCode::Identify => {
                let payload: IdentifyPayload = message
                    .payload()
                    .ok_or(GatewayError::InvalidPayload("Identify needs a token"))?;
                IdentifyHandler::handle(state, connection, payload).await
            }
            OpCode::Subscribe => {
                SubscriptionHandler::subscribe(state, connection, conversation(&message)?).await
            }
            OpCode::Unsubscribe => {
                SubscriptionHandler::unsubscribe(state, connection, conversation(&message)?).await
            }
            OpCode::MarkRead => MarkReadHandler::handle(state, connection, conversation(&message)?),
            OpCode::Dispatch | OpCode::Hello | OpCode::HeartbeatAck | OpCode::Ready => {
                Ok(Some(CloseCode::UnknownOpcode))
            }
        }
    }
}

fn conversation(message: &GatewayMessage) -> GatewayResult<ConversationPayload> {
    message
        .payload()
        .ok_or(GatewayError::InvalidPayload("conversation_id is required"))
}

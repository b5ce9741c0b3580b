//! Identify handler (op 2)

use super::{GatewayError, GatewayResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage, IdentifyPayload, ReadyPayload};
use crate::server::GatewayState;
use market_cache::PubSubChannel;
use std::sync::Arc;

pub struct IdentifyHandler;

impl IdentifyHandler {
    /// Validate the token, bind the connection to the user and answer READY
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: IdentifyPayload,
    ) -> GatewayResult<Option<CloseCode>> {
        if connection.is_authenticated() {
            tracing::warn!(
                session_id = %connection.session_id(),
                "Client sent Identify while already authenticated"
            );
            return Ok(Some(CloseCode::AlreadyAuthenticated));
        }

        let user_id = state
            .service_context()
            .jwt_service()
            .authenticate(payload.bare_token())
            .map_err(|e| {
                tracing::debug!(error = %e, "Token validation failed");
                GatewayError::AuthenticationFailed(e.to_string())
            })?;

        state
            .connection_manager()
            .authenticate_connection(connection.session_id(), user_id);
        state
            .event_dispatcher()
            .bind(PubSubChannel::user(user_id))
            .await?;

        let ready = ReadyPayload {
            session_id: connection.session_id().to_string(),
            user_id,
        };
        connection
            .send(GatewayMessage::ready(&ready))
            .await
            .map_err(|_| GatewayError::ConnectionClosed)?;

        tracing::info!(
            session_id = %connection.session_id(),
            user_id = %user_id,
            "Connection identified"
        );

        Ok(None)
    }
}

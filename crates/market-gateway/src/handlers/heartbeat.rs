//! Heartbeat handler (op 1)

use super::{GatewayError, GatewayResult};
use crate::connection::Connection;
use crate::protocol::{CloseCode, GatewayMessage};
use std::sync::Arc;

pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Record the heartbeat and acknowledge it
    pub async fn handle(connection: &Arc<Connection>) -> GatewayResult<Option<CloseCode>> {
        connection.record_heartbeat();

        tracing::trace!(
            session_id = %connection.session_id(),
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        connection
            .send(GatewayMessage::heartbeat_ack())
            .await
            .map_err(|_| GatewayError::ConnectionClosed)?;

        Ok(None)
    }
}

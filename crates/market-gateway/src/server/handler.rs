//! WebSocket handler
//!
//! One reader task, one writer task and a heartbeat watch per socket.

use crate::connection::{Connection, ConnectionState, Outbound};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload};
use crate::server::{GatewayState, HeartbeatConfig};
use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use market_cache::PubSubChannel;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use uuid::Uuid;

/// Outgoing frames buffered per connection
const MESSAGE_BUFFER_SIZE: usize = 100;

/// How long the writer gets to flush the close frame
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket gateway handler
pub async fn gateway_handler(State(state): State<GatewayState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::channel::<Outbound>(MESSAGE_BUFFER_SIZE);
    let connection = state
        .connection_manager()
        .add_connection(session_id.clone(), tx);

    tracing::info!(session_id = %session_id, "WebSocket connection established");

    let (mut ws_sink, ws_stream) = socket.split();

    let heartbeat = state.heartbeat();
    let hello = GatewayMessage::hello(&HelloPayload::with_interval(heartbeat.interval_ms()));
    if send_frame(&mut ws_sink, &hello).await.is_err() {
        tracing::warn!(session_id = %session_id, "Failed to send Hello message");
        cleanup_connection(&state, &connection).await;
        return;
    }

    let mut send_task = tokio::spawn(write_loop(ws_sink, rx, session_id.clone()));
    let mut recv_task = tokio::spawn(read_loop(state.clone(), connection.clone(), ws_stream));

    let mut writer_done = false;
    let close_code = tokio::select! {
        result = &mut recv_task => result.ok().flatten(),
        () = watch_heartbeat(connection.clone(), heartbeat) => Some(CloseCode::SessionTimeout),
        _ = &mut send_task => {
            writer_done = true;
            None
        }
    };
    recv_task.abort();

    if let Some(code) = close_code {
        tracing::debug!(session_id = %session_id, close_code = %code, "Closing connection");
    }

    if !writer_done {
        let flushed = tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, async {
            connection.close(close_code).await;
            (&mut send_task).await.ok();
        })
        .await;
        if flushed.is_err() {
            send_task.abort();
        }
    }

    cleanup_connection(&state, &connection).await;
}

async fn send_frame(
    sink: &mut SplitSink<WebSocket, Message>,
    message: &GatewayMessage,
) -> Result<(), axum::Error> {
    let json = message.to_json().map_err(axum::Error::new)?;
    sink.send(Message::Text(json)).await
}

async fn write_loop(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
    session_id: String,
) {
    while let Some(outbound) = rx.recv().await {
        match outbound {
            Outbound::Frame(message) => {
                if send_frame(&mut sink, &message).await.is_err() {
                    tracing::warn!(session_id = %session_id, "Failed to send message to WebSocket");
                    return;
                }
            }
            Outbound::Close(Some(code)) => {
                let frame = CloseFrame {
                    code: code.as_u16(),
                    reason: Cow::Borrowed(code.description()),
                };
                sink.send(Message::Close(Some(frame))).await.ok();
                return;
            }
            Outbound::Close(None) => break,
        }
    }
    sink.close().await.ok();
}

async fn read_loop(
    state: GatewayState,
    connection: Arc<Connection>,
    mut stream: SplitStream<WebSocket>,
) -> Option<CloseCode> {
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if !connection.admit_frame() {
                    tracing::warn!(session_id = %connection.session_id(), "Frame budget exceeded");
                    return Some(CloseCode::RateLimited);
                }
                if let Err(code) = handle_text_message(&state, &connection, &text).await {
                    return Some(code);
                }
            }
            Ok(Message::Binary(_)) => {
                tracing::debug!(session_id = %connection.session_id(), "Binary messages not supported");
                return Some(CloseCode::DecodeError);
            }
            // Pong replies are handled by axum
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                tracing::info!(session_id = %connection.session_id(), "Client closed connection");
                return None;
            }
            Err(e) => {
                tracing::warn!(session_id = %connection.session_id(), error = %e, "WebSocket error");
                return Some(CloseCode::UnknownError);
            }
        }
    }
    None
}

/// Resolves once the client has been silent for longer than the timeout
async fn watch_heartbeat(connection: Arc<Connection>, heartbeat: HeartbeatConfig) {
    let mut check = interval(heartbeat.interval / 2);
    loop {
        check.tick().await;
        let silent = connection.time_since_heartbeat();
        if silent > heartbeat.timeout {
            tracing::warn!(
                session_id = %connection.session_id(),
                silent_ms = silent.as_millis(),
                "Connection timed out (no heartbeat)"
            );
            return;
        }
    }
}

async fn handle_text_message(
    state: &GatewayState,
    connection: &Arc<Connection>,
    text: &str,
) -> Result<(), CloseCode> {
    let message = GatewayMessage::parse(text).inspect_err(|code| {
        tracing::debug!(session_id = %connection.session_id(), close_code = %code, "Rejected frame");
    })?;

    tracing::trace!(session_id = %connection.session_id(), op = %message.op, "Received message");

    match MessageDispatcher::dispatch(state, connection, message).await {
        Ok(Some(close_code)) => Err(close_code),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::warn!(session_id = %connection.session_id(), error = %e, "Handler error");
            Err(e.close_code())
        }
    }
}

/// Drop the connection and release Redis channels nobody else needs
async fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    connection.set_state(ConnectionState::Disconnected);

    let released = state
        .connection_manager()
        .remove_connection(connection.session_id());
    let channels: Vec<PubSubChannel> = released
        .user
        .map(PubSubChannel::user)
        .into_iter()
        .chain(released.conversations.into_iter().map(PubSubChannel::conversation))
        .collect();

    if let Err(e) = state.event_dispatcher().unbind(&channels).await {
        tracing::warn!(session_id = %connection.session_id(), error = %e, "Failed to release channels");
    }

    tracing::info!(
        session_id = %connection.session_id(),
        age_secs = connection.age().as_secs(),
        "Connection closed"
    );
}

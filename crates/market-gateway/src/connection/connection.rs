//! A single WebSocket connection and its state

use crate::protocol::{CloseCode, GatewayMessage};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::ReadDebouncer;

/// Frames a client may send per window before it is closed with 4008
pub const MAX_FRAMES_PER_WINDOW: u32 = 120;
pub const FRAME_WINDOW: Duration = Duration::from_secs(60);

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for Identify
    Connecting,
    Connected,
    Disconnected,
}

/// What the writer task puts on the socket
#[derive(Debug, Clone)]
pub enum Outbound {
    Frame(GatewayMessage),
    /// Close the socket, with a gateway code when the server ends the session
    Close(Option<CloseCode>),
}

/// A single WebSocket connection
pub struct Connection {
    session_id: String,
    user_id: RwLock<Option<Uuid>>,
    state: RwLock<ConnectionState>,
    sender: mpsc::Sender<Outbound>,
    /// Last dispatch sequence number sent
    sequence: AtomicU64,
    last_heartbeat: RwLock<Instant>,
    conversations: RwLock<HashSet<Uuid>>,
    /// Start of the current rate window and frames seen in it
    frame_window: Mutex<(Instant, u32)>,
    reads: Arc<ReadDebouncer>,
    created_at: Instant,
}

impl Connection {
    pub fn new(session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Self::with_debouncer(session_id, sender, ReadDebouncer::shared())
    }

    pub fn with_debouncer(
        session_id: String,
        sender: mpsc::Sender<Outbound>,
        reads: Arc<ReadDebouncer>,
    ) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            session_id,
            user_id: RwLock::new(None),
            state: RwLock::new(ConnectionState::Connecting),
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: RwLock::new(now),
            conversations: RwLock::new(HashSet::new()),
            frame_window: Mutex::new((now, 0)),
            reads,
            created_at: now,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn user_id(&self) -> Option<Uuid> {
        *self.user_id.read()
    }

    /// Bind the connection to a user once Identify succeeds
    pub fn authenticate(&self, user_id: Uuid) {
        *self.user_id.write() = Some(user_id);
        *self.state.write() = ConnectionState::Connected;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.read().is_some()
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.read()
    }

    pub fn set_state(&self, state: ConnectionState) {
        *self.state.write() = state;
    }

    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.write() = Instant::now();
    }

    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().elapsed()
    }

    /// Returns `true` if the conversation was not yet subscribed
    pub fn subscribe(&self, conversation_id: Uuid) -> bool {
        self.conversations.write().insert(conversation_id)
    }

    pub fn unsubscribe(&self, conversation_id: Uuid) -> bool {
        self.conversations.write().remove(&conversation_id)
    }

    pub fn is_subscribed_to(&self, conversation_id: Uuid) -> bool {
        self.conversations.read().contains(&conversation_id)
    }

    pub fn conversations(&self) -> Vec<Uuid> {
        self.conversations.read().iter().copied().collect()
    }

    /// Count a received frame; `false` once the window's budget is spent
    pub fn admit_frame(&self) -> bool {
        let mut window = self.frame_window.lock();
        if window.0.elapsed() >= FRAME_WINDOW {
            *window = (Instant::now(), 0);
        }
        window.1 += 1;
        window.1 <= MAX_FRAMES_PER_WINDOW
    }

    pub fn reads(&self) -> &Arc<ReadDebouncer> {
        &self.reads
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub async fn send(&self, message: GatewayMessage) -> Result<(), mpsc::error::SendError<Outbound>> {
        self.sender.send(Outbound::Frame(message)).await
    }

    /// Push an event with this connection's next sequence number
    pub async fn dispatch(
        &self,
        event_type: &str,
        data: serde_json::Value,
    ) -> Result<(), mpsc::error::SendError<Outbound>> {
        let seq = self.next_sequence();
        self.send(GatewayMessage::dispatch(event_type, seq, data)).await
    }

    /// Ask the writer task to close the socket
    pub async fn close(&self, code: Option<CloseCode>) {
        self.sender.send(Outbound::Close(code)).await.ok();
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("session_id", &self.session_id)
            .field("user_id", &self.user_id())
            .field("sequence", &self.current_sequence())
            .finish_non_exhaustive()
    }
}

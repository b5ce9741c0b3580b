//! Connection manager
//!
//! Indexes live connections by session, user and subscribed conversation.

use super::{Connection, Outbound};
use dashmap::DashMap;
use market_cache::PubSubEvent;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    connections: DashMap<String, Arc<Connection>>,
    user_connections: DashMap<Uuid, HashSet<String>>,
    conversation_connections: DashMap<Uuid, HashSet<String>>,
}

/// Remove a session from an index entry; `true` when the entry became empty
fn detach(index: &DashMap<Uuid, HashSet<String>>, key: Uuid, session_id: &str) -> bool {
    if let Some(mut sessions) = index.get_mut(&key) {
        sessions.remove(session_id);
    }
    index.remove_if(&key, |_, sessions| sessions.is_empty()).is_some()
}

/// What a removed connection leaves behind
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Released {
    /// Set when the user has no other connection
    pub user: Option<Uuid>,
    /// Conversations nobody watches any more
    pub conversations: Vec<Uuid>,
}

impl ConnectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            conversation_connections: DashMap::new(),
        }
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn add_connection(&self, session_id: String, sender: mpsc::Sender<Outbound>) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), sender);
        self.connections.insert(session_id.clone(), connection.clone());
        tracing::debug!(session_id = %session_id, "Connection added");
        connection
    }

    /// Drop a connection from every index
    pub fn remove_connection(&self, session_id: &str) -> Released {
        let Some((_, connection)) = self.connections.remove(session_id) else {
            return Released::default();
        };

        let user = connection
            .user_id()
            .filter(|user_id| detach(&self.user_connections, *user_id, session_id));

        let conversations = connection
            .conversations()
            .into_iter()
            .filter(|id| detach(&self.conversation_connections, *id, session_id))
            .collect();

        tracing::debug!(session_id = %session_id, "Connection removed");
        Released { user, conversations }
    }

    pub fn get_connection(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.connections.get(session_id).map(|r| r.clone())
    }

    /// Link a connection to its user
    pub fn authenticate_connection(&self, session_id: &str, user_id: Uuid) -> bool {
        let Some(connection) = self.get_connection(session_id) else {
            return false;
        };
        connection.authenticate(user_id);
        self.user_connections
            .entry(user_id)
            .or_default()
            .insert(session_id.to_string());

        tracing::debug!(session_id = %session_id, user_id = %user_id, "Connection authenticated");
        true
    }

    pub fn subscribe_to_conversation(&self, session_id: &str, conversation_id: Uuid) -> bool {
        let Some(connection) = self.get_connection(session_id) else {
            return false;
        };
        connection.subscribe(conversation_id);
        self.conversation_connections
            .entry(conversation_id)
            .or_default()
            .insert(session_id.to_string());

        tracing::trace!(session_id = %session_id, conversation_id = %conversation_id, "Subscribed to conversation");
        true
    }

    /// Returns `true` when this was the conversation's last watcher
    pub fn unsubscribe_from_conversation(&self, session_id: &str, conversation_id: Uuid) -> bool {
        if let Some(connection) = self.get_connection(session_id) {
            connection.unsubscribe(conversation_id);
        }
        let emptied = detach(&self.conversation_connections, conversation_id, session_id);

        tracing::trace!(session_id = %session_id, conversation_id = %conversation_id, "Unsubscribed from conversation");
        emptied
    }

    fn resolve(&self, index: &DashMap<Uuid, HashSet<String>>, key: Uuid) -> Vec<Arc<Connection>> {
        // Collect ids first so no index shard stays locked while sending
        let sessions: Vec<String> = index
            .get(&key)
            .map(|sessions| sessions.iter().cloned().collect())
            .unwrap_or_default();
        sessions.iter().filter_map(|sid| self.get_connection(sid)).collect()
    }

    pub fn get_user_connections(&self, user_id: Uuid) -> Vec<Arc<Connection>> {
        self.resolve(&self.user_connections, user_id)
    }

    pub fn get_conversation_connections(&self, conversation_id: Uuid) -> Vec<Arc<Connection>> {
        self.resolve(&self.conversation_connections, conversation_id)
    }

    async fn deliver<'a>(
        connections: impl IntoIterator<Item = &'a Arc<Connection>>,
        event: &PubSubEvent,
    ) -> usize {
        let mut sent = 0;
        for conn in connections {
            if conn.user_id().is_some_and(|id| event.excludes(id)) {
                continue;
            }
            if conn.dispatch(&event.event_type, event.data.clone()).await.is_ok() {
                sent += 1;
            }
        }
        sent
    }

    /// Send to every connection of a user
    ///
    /// Connections already watching the event's conversation get it through
    /// the conversation channel and are skipped here.
    pub async fn send_to_user(&self, user_id: Uuid, event: &PubSubEvent) -> usize {
        let watched = event.target.as_ref().and_then(|t| t.conversation_id);
        let connections: Vec<_> = self
            .get_user_connections(user_id)
            .into_iter()
            .filter(|c| !watched.is_some_and(|id| c.is_subscribed_to(id)))
            .collect();
        Self::deliver(&connections, event).await
    }

    pub async fn send_to_conversation(&self, conversation_id: Uuid, event: &PubSubEvent) -> usize {
        let connections = self.get_conversation_connections(conversation_id);
        Self::deliver(&connections, event).await
    }

    pub async fn broadcast(&self, event: &PubSubEvent) -> usize {
        let connections: Vec<_> = self.connections.iter().map(|r| r.value().clone()).collect();
        Self::deliver(&connections, event).await
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Unique authenticated users
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    /// Conversations with at least one watcher
    pub fn conversation_count(&self) -> usize {
        self.conversation_connections.len()
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.connections.contains_key(session_id)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .field("conversations", &self.conversation_connections.len())
            .finish()
    }
}

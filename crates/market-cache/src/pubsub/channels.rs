//! Pub/Sub channel naming.

use uuid::Uuid;

/// Channel prefix for conversation events
pub const CONVERSATION_CHANNEL_PREFIX: &str = "conversation:";
/// Channel prefix for user-specific events
pub const USER_CHANNEL_PREFIX: &str = "user:";
/// Channel prefix for listing events
pub const LISTING_CHANNEL_PREFIX: &str = "listing:";
/// Channel for broadcast events (all connected clients)
pub const BROADCAST_CHANNEL: &str = "broadcast";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Both participants of a conversation
    Conversation(Uuid),
    /// Every session of one user
    User(Uuid),
    /// Watchers of a listing (bids, status changes)
    Listing(Uuid),
    Broadcast,
    Custom(String),
}

impl PubSubChannel {
    #[must_use]
    pub fn conversation(conversation_id: Uuid) -> Self {
        Self::Conversation(conversation_id)
    }

    #[must_use]
    pub fn user(user_id: Uuid) -> Self {
        Self::User(user_id)
    }

    #[must_use]
    pub fn listing(listing_id: Uuid) -> Self {
        Self::Listing(listing_id)
    }

    #[must_use]
    pub fn broadcast() -> Self {
        Self::Broadcast
    }

    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Conversation(id) => format!("{CONVERSATION_CHANNEL_PREFIX}{id}"),
            Self::User(id) => format!("{USER_CHANNEL_PREFIX}{id}"),
            Self::Listing(id) => format!("{LISTING_CHANNEL_PREFIX}{id}"),
            Self::Broadcast => BROADCAST_CHANNEL.to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name; anything unrecognised becomes `Custom`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == BROADCAST_CHANNEL {
            return Self::Broadcast;
        }

        let prefixed: [(&str, fn(Uuid) -> Self); 3] = [
            (CONVERSATION_CHANNEL_PREFIX, Self::Conversation),
            (USER_CHANNEL_PREFIX, Self::User),
            (LISTING_CHANNEL_PREFIX, Self::Listing),
        ];

        for (prefix, build) in prefixed {
            if let Some(id) = name.strip_prefix(prefix).and_then(|s| Uuid::parse_str(s).ok()) {
                return build(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

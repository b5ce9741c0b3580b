//! Redis Pub/Sub publisher.

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;
use market_core::DomainEvent;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name (e.g., "MESSAGE_CREATED", "BID_PLACED")
    pub event_type: String,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<EventTarget>,
}

/// Routing hints carried next to the payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventTarget {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<Uuid>,
    /// Users that must not receive this event
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub exclude_users: Vec<Uuid>,
}

impl PubSubEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            target: None,
        }
    }

    /// Wrap a domain event; the conversation id becomes the target
    pub fn from_domain(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        let mut wrapped = Self::new(event.event_type(), serde_json::to_value(event)?);
        if let Some(conversation_id) = event.conversation_id() {
            wrapped = wrapped.with_target(EventTarget::empty().with_conversation(conversation_id));
        }
        Ok(wrapped)
    }

    #[must_use]
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether the user is listed in the exclusion list
    #[must_use]
    pub fn excludes(&self, user_id: Uuid) -> bool {
        self.target
            .as_ref()
            .is_some_and(|t| t.exclude_users.contains(&user_id))
    }
}

impl EventTarget {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_conversation(mut self, conversation_id: Uuid) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    #[must_use]
    pub fn exclude_user(mut self, user_id: Uuid) -> Self {
        self.exclude_users.push(user_id);
        self
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel, returning the number of receivers
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }

    /// Publish to several channels over one connection
    pub async fn publish_many(&self, channels: &[PubSubChannel], event: &PubSubEvent) -> RedisResult<u32> {
        let payload = event.to_json()?;
        let mut total_receivers = 0;
        let mut conn = self.pool.get().await?;

        for channel in channels {
            let receivers: u32 = conn.publish(channel.name(), &payload).await?;
            total_receivers += receivers;
        }

        tracing::debug!(
            channels = channels.len(),
            event_type = %event.event_type,
            total_receivers = total_receivers,
            "Published event to multiple channels"
        );

        Ok(total_receivers)
    }

    /// Publish a domain event to a single channel
    pub async fn publish_domain_event(&self, channel: &PubSubChannel, event: &DomainEvent) -> RedisResult<u32> {
        self.publish(channel, &PubSubEvent::from_domain(event)?).await
    }

    /// Publish a conversation event to the conversation and to both participants
    pub async fn publish_to_conversation(
        &self,
        conversation_id: Uuid,
        participants: [Uuid; 2],
        event: &DomainEvent,
    ) -> RedisResult<u32> {
        let channels = [
            PubSubChannel::conversation(conversation_id),
            PubSubChannel::user(participants[0]),
            PubSubChannel::user(participants[1]),
        ];
        self.publish_many(&channels, &PubSubEvent::from_domain(event)?).await
    }
}

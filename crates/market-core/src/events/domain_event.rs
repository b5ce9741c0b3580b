//! Domain events - emitted when marketplace state changes
//!
//! Services publish these over Redis; the realtime gateway forwards them to
//! connected clients as dispatch frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Message Events
    // =========================================================================
    MessageCreated(MessageCreatedEvent),
    MessageUpdated(MessageUpdatedEvent),
    MessageDeleted(MessageDeletedEvent),

    // =========================================================================
    // Conversation Events
    // =========================================================================
    ConversationRead(ConversationReadEvent),

    // =========================================================================
    // Listing Events
    // =========================================================================
    BidPlaced(BidPlacedEvent),
    ReviewSubmitted(ReviewSubmittedEvent),
    ListingUpdated(ListingUpdatedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::MessageCreated(_) => "MESSAGE_CREATED",
            Self::MessageUpdated(_) => "MESSAGE_UPDATED",
            Self::MessageDeleted(_) => "MESSAGE_DELETED",
            Self::ConversationRead(_) => "CONVERSATION_READ",
            Self::BidPlaced(_) => "BID_PLACED",
            Self::ReviewSubmitted(_) => "REVIEW_SUBMITTED",
            Self::ListingUpdated(_) => "LISTING_UPDATED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::MessageCreated(e) => e.timestamp,
            Self::MessageUpdated(e) => e.timestamp,
            Self::MessageDeleted(e) => e.timestamp,
            Self::ConversationRead(e) => e.timestamp,
            Self::BidPlaced(e) => e.timestamp,
            Self::ReviewSubmitted(e) => e.timestamp,
            Self::ListingUpdated(e) => e.timestamp,
        }
    }

    /// Conversation this event belongs to, if any
    pub fn conversation_id(&self) -> Option<Uuid> {
        match self {
            Self::MessageCreated(e) => Some(e.conversation_id),
            Self::MessageUpdated(e) => Some(e.conversation_id),
            Self::MessageDeleted(e) => Some(e.conversation_id),
            Self::ConversationRead(e) => Some(e.conversation_id),
            Self::BidPlaced(_) | Self::ReviewSubmitted(_) | Self::ListingUpdated(_) => None,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreatedEvent {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub participants: [Uuid; 2],
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageUpdatedEvent {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub body: String,
    pub edited_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletedEvent {
    pub message_id: Uuid,
    pub conversation_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationReadEvent {
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub last_read_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidPlacedEvent {
    pub bid_id: Uuid,
    pub listing_id: Uuid,
    pub seller_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmittedEvent {
    pub review_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub business_id: Option<Uuid>,
    pub rating: i16,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingUpdatedEvent {
    pub listing_id: Uuid,
    pub seller_id: Uuid,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Constructors
// ============================================================================

impl MessageCreatedEvent {
    pub fn new(
        message_id: Uuid,
        conversation_id: Uuid,
        sender_id: Uuid,
        participants: [Uuid; 2],
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            message_id,
            conversation_id,
            sender_id,
            participants,
            body,
            created_at,
            timestamp: Utc::now(),
        }
    }
}

impl MessageUpdatedEvent {
    pub fn new(message_id: Uuid, conversation_id: Uuid, body: String, edited_at: DateTime<Utc>) -> Self {
        Self {
            message_id,
            conversation_id,
            body,
            edited_at,
            timestamp: Utc::now(),
        }
    }
}

impl MessageDeletedEvent {
    pub fn new(message_id: Uuid, conversation_id: Uuid) -> Self {
        Self {
            message_id,
            conversation_id,
            timestamp: Utc::now(),
        }
    }
}

impl ConversationReadEvent {
    pub fn new(conversation_id: Uuid, user_id: Uuid, last_read_at: DateTime<Utc>) -> Self {
        Self {
            conversation_id,
            user_id,
            last_read_at,
            timestamp: Utc::now(),
        }
    }
}

impl BidPlacedEvent {
    pub fn new(bid_id: Uuid, listing_id: Uuid, seller_id: Uuid, bidder_id: Uuid, amount: f64) -> Self {
        Self {
            bid_id,
            listing_id,
            seller_id,
            bidder_id,
            amount,
            timestamp: Utc::now(),
        }
    }
}

impl ReviewSubmittedEvent {
    pub fn new(review_id: Uuid, listing_id: Option<Uuid>, business_id: Option<Uuid>, rating: i16) -> Self {
        Self {
            review_id,
            listing_id,
            business_id,
            rating,
            timestamp: Utc::now(),
        }
    }
}

impl ListingUpdatedEvent {
    pub fn new(listing_id: Uuid, seller_id: Uuid, status: String) -> Self {
        Self {
            listing_id,
            seller_id,
            status,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let conv = Uuid::new_v4();
        let event = DomainEvent::MessageCreated(MessageCreatedEvent::new(
            Uuid::new_v4(),
            conv,
            Uuid::new_v4(),
            [Uuid::new_v4(), Uuid::new_v4()],
            "Is dit nog beschikbaar?".to_string(),
            Utc::now(),
        ));

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"MESSAGE_CREATED\""));

        let parsed: DomainEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.event_type(), "MESSAGE_CREATED");
        assert_eq!(parsed.conversation_id(), Some(conv));
    }

    #[test]
    fn test_event_type() {
        let event = DomainEvent::ConversationRead(ConversationReadEvent::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
        ));
        assert_eq!(event.event_type(), "CONVERSATION_READ");

        let bid = DomainEvent::BidPlaced(BidPlacedEvent::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            120.0,
        ));
        assert_eq!(bid.event_type(), "BID_PLACED");
        assert!(bid.conversation_id().is_none());
    }
}

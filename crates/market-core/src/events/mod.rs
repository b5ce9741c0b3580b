//! Domain events

mod domain_event;

pub use domain_event::{
    BidPlacedEvent, ConversationReadEvent, DomainEvent, ListingUpdatedEvent,
    MessageCreatedEvent, MessageDeletedEvent, MessageUpdatedEvent, ReviewSubmittedEvent,
};

//! Redis Pub/Sub module.
//!
//! Services publish domain events; gateway instances subscribe and forward.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{
    PubSubChannel, BROADCAST_CHANNEL, CONVERSATION_CHANNEL_PREFIX, LISTING_CHANNEL_PREFIX,
    USER_CHANNEL_PREFIX,
};
pub use publisher::{EventTarget, PubSubEvent, Publisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};

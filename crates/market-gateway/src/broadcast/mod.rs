//! Event broadcasting
//!
//! Distributes events from Redis Pub/Sub to WebSocket connections.

mod dispatcher;

pub use dispatcher::{EventDispatcher, EventDispatcherConfig};

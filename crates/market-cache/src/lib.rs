//! # market-cache
//!
//! Redis layer for realtime fan-out and small per-user state.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Domain events distributed to gateway instances
//! - **Dock Store**: Each user's chat dock layout, kept for a week
//!
//! ## Example
//!
//! ```ignore
//! use market_cache::{DockStore, PubSubChannel, Publisher, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool.clone());
//!
//! publisher
//!     .publish_domain_event(&PubSubChannel::conversation(conversation_id), &event)
//!     .await?;
//!
//! let docks = DockStore::new(pool);
//! let manager = docks.load(user_id).await?;
//! ```

pub mod dock;
pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export dock types
pub use dock::{DockStore, DOCK_KEY_PREFIX, DOCK_TTL_SECS};

// Re-export pubsub types
pub use pubsub::{
    EventTarget, PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, Subscriber,
    SubscriberBuilder, SubscriberConfig, SubscriberError, SubscriberResult, BROADCAST_CHANNEL,
    CONVERSATION_CHANNEL_PREFIX, LISTING_CHANNEL_PREFIX, USER_CHANNEL_PREFIX,
};

//! Event dispatcher
//!
//! Receives events from Redis Pub/Sub and hands them to the connections bound
//! to the matching channel.

use crate::connection::ConnectionManager;
use market_cache::{PubSubChannel, ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Configuration for the event dispatcher
#[derive(Debug, Clone)]
pub struct EventDispatcherConfig {
    pub redis_url: String,
    pub broadcast_buffer: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for EventDispatcherConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Routes Redis Pub/Sub messages to WebSocket connections
pub struct EventDispatcher {
    connection_manager: Arc<ConnectionManager>,
    subscriber: Subscriber,
    running: Arc<AtomicBool>,
}

impl EventDispatcher {
    /// Create a dispatcher listening on the broadcast channel
    pub async fn new(
        config: EventDispatcherConfig,
        connection_manager: Arc<ConnectionManager>,
    ) -> SubscriberResult<Self> {
        let subscriber = SubscriberBuilder::new()
            .redis_url(&config.redis_url)
            .broadcast_buffer(config.broadcast_buffer)
            .reconnect_delay_ms(config.reconnect_delay_ms)
            .subscribe(PubSubChannel::broadcast())
            .build()
            .await?;

        Ok(Self {
            connection_manager,
            subscriber,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start receiving a channel's events
    pub async fn bind(&self, channel: PubSubChannel) -> SubscriberResult<()> {
        self.subscriber.subscribe(&[channel]).await
    }

    /// Stop receiving events for channels nobody listens to any more
    pub async fn unbind(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        if channels.is_empty() {
            return Ok(());
        }
        self.subscriber.unsubscribe(channels).await
    }

    /// Spawn the routing loop
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return;
        }

        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run().await;
        });

        tracing::info!("Event dispatcher started");
    }

    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.subscriber.shutdown().await.ok();
        tracing::info!("Event dispatcher stopped");
    }

    async fn run(&self) {
        let mut receiver = self.subscriber.receiver();

        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Ok(msg) => {
                    self.route(&msg).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Event dispatcher lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Event dispatcher channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher loop ended");
    }

    /// Deliver one message; returns the number of connections reached
    pub async fn route(&self, msg: &ReceivedMessage) -> usize {
        let Some(event) = &msg.event else {
            tracing::debug!(channel = %msg.channel, "Received non-event message, ignoring");
            return 0;
        };

        let manager = &self.connection_manager;
        let sent = match &msg.channel {
            PubSubChannel::Conversation(id) => manager.send_to_conversation(*id, event).await,
            PubSubChannel::User(id) => manager.send_to_user(*id, event).await,
            PubSubChannel::Broadcast => manager.broadcast(event).await,
            PubSubChannel::Listing(_) | PubSubChannel::Custom(_) => {
                tracing::trace!(channel = %msg.channel, "No gateway route for channel");
                0
            }
        };

        tracing::trace!(
            channel = %msg.channel,
            event_type = %event.event_type,
            sent = sent,
            "Event dispatched"
        );
        sent
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

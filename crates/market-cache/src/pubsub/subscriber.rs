//! Redis Pub/Sub subscriber.
//!
//! One background task owns the Redis connection, re-subscribes after a
//! reconnect and fans every message out on a tokio broadcast channel.

use crate::pubsub::{PubSubChannel, PubSubEvent};
use futures_util::StreamExt;
use redis::Client;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, RwLock};

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to parse event: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Subscriber task has stopped")]
    ChannelClosed,
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Message received from Pub/Sub
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub channel: PubSubChannel,
    /// Parsed event, `None` when the payload is not a `PubSubEvent`
    pub event: Option<PubSubEvent>,
    pub payload: String,
}

impl ReceivedMessage {
    fn from_redis(channel_name: &str, payload: String) -> Self {
        Self {
            channel: PubSubChannel::parse(channel_name),
            event: serde_json::from_str(&payload).ok(),
            payload,
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    pub redis_url: String,
    /// Capacity of the fan-out broadcast channel
    pub broadcast_buffer: usize,
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

#[derive(Debug)]
enum Command {
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    Shutdown,
}

/// How a listener session ended
enum SessionEnd {
    Shutdown,
    Reconnect,
}

/// Redis Pub/Sub subscriber handle
pub struct Subscriber {
    subscribed: Arc<RwLock<HashSet<String>>>,
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    control_tx: mpsc::Sender<Command>,
}

impl Subscriber {
    /// Create a subscriber and spawn its listener task
    #[must_use]
    pub fn spawn(config: SubscriberConfig) -> Self {
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (control_tx, control_rx) = mpsc::channel(32);
        let subscribed = Arc::new(RwLock::new(HashSet::new()));

        tokio::spawn(listen(config, subscribed.clone(), broadcast_tx.clone(), control_rx));

        Self {
            subscribed,
            broadcast_tx,
            control_tx,
        }
    }

    pub async fn subscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        self.send(Command::Subscribe(channels.iter().map(PubSubChannel::name).collect()))
            .await
    }

    pub async fn unsubscribe(&self, channels: &[PubSubChannel]) -> SubscriberResult<()> {
        self.send(Command::Unsubscribe(channels.iter().map(PubSubChannel::name).collect()))
            .await
    }

    /// New receiver on the fan-out channel
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.broadcast_tx.subscribe()
    }

    pub async fn subscribed_channels(&self) -> Vec<String> {
        self.subscribed.read().await.iter().cloned().collect()
    }

    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> SubscriberResult<()> {
        self.control_tx
            .send(command)
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

async fn listen(
    config: SubscriberConfig,
    subscribed: Arc<RwLock<HashSet<String>>>,
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    mut control_rx: mpsc::Receiver<Command>,
) {
    let delay = Duration::from_millis(config.reconnect_delay_ms);

    loop {
        match run_session(&config, &subscribed, &broadcast_tx, &mut control_rx).await {
            Ok(SessionEnd::Shutdown) => {
                tracing::info!("Subscriber shutting down");
                break;
            }
            Ok(SessionEnd::Reconnect) => {
                tracing::warn!("Pub/Sub stream ended, reconnecting");
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Subscriber error, reconnecting");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn run_session(
    config: &SubscriberConfig,
    subscribed: &RwLock<HashSet<String>>,
    broadcast_tx: &broadcast::Sender<ReceivedMessage>,
    control_rx: &mut mpsc::Receiver<Command>,
) -> SubscriberResult<SessionEnd> {
    let client = Client::open(config.redis_url.as_str())?;
    let mut pubsub = client.get_async_pubsub().await?;

    for channel in subscribed.read().await.iter() {
        pubsub.subscribe(channel).await?;
    }

    tracing::info!("Subscriber connected to Redis");

    loop {
        // The message stream borrows the connection; it is rebuilt after each command
        let command = {
            let mut stream = pubsub.on_message();
            loop {
                tokio::select! {
                    msg = stream.next() => {
                        let Some(msg) = msg else {
                            return Ok(SessionEnd::Reconnect);
                        };
                        let payload: String = msg.get_payload().unwrap_or_default();
                        let received = ReceivedMessage::from_redis(msg.get_channel_name(), payload);
                        tracing::trace!(channel = %received.channel, "Received Pub/Sub message");
                        // No receivers is fine
                        let _ = broadcast_tx.send(received);
                    }
                    cmd = control_rx.recv() => break cmd,
                }
            }
        };

        match command {
            Some(Command::Subscribe(channels)) => {
                for channel in channels {
                    match pubsub.subscribe(&channel).await {
                        Ok(()) => {
                            tracing::debug!(channel = %channel, "Subscribed to channel");
                            subscribed.write().await.insert(channel);
                        }
                        Err(e) => tracing::error!(channel = %channel, error = %e, "Failed to subscribe"),
                    }
                }
            }
            Some(Command::Unsubscribe(channels)) => {
                for channel in channels {
                    match pubsub.unsubscribe(&channel).await {
                        Ok(()) => {
                            tracing::debug!(channel = %channel, "Unsubscribed from channel");
                            subscribed.write().await.remove(&channel);
                        }
                        Err(e) => tracing::error!(channel = %channel, error = %e, "Failed to unsubscribe"),
                    }
                }
            }
            Some(Command::Shutdown) | None => return Ok(SessionEnd::Shutdown),
        }
    }
}

/// Builder for [`Subscriber`]
#[derive(Debug, Default)]
pub struct SubscriberBuilder {
    config: SubscriberConfig,
    initial_channels: Vec<PubSubChannel>,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn subscribe(mut self, channel: PubSubChannel) -> Self {
        self.initial_channels.push(channel);
        self
    }

    /// Spawn the subscriber and queue the initial subscriptions
    pub async fn build(self) -> SubscriberResult<Subscriber> {
        let subscriber = Subscriber::spawn(self.config);

        if !self.initial_channels.is_empty() {
            subscriber.subscribe(&self.initial_channels).await?;
        }

        Ok(subscriber)
    }
}

//! Gateway state

use crate::broadcast::EventDispatcher;
use crate::connection::ConnectionManager;
use market_common::AppConfig;
use market_service::ServiceContext;
use std::sync::Arc;
use std::time::Duration;

/// Heartbeat timing announced in HELLO and enforced per connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub interval: Duration,
    /// Silence after which the session is closed with 4009
    pub timeout: Duration,
}

impl HeartbeatConfig {
    #[must_use]
    pub fn interval_ms(&self) -> u64 {
        u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(45),
            timeout: Duration::from_secs(90),
        }
    }
}

/// Shared dependencies of the gateway server
#[derive(Clone)]
pub struct GatewayState {
    service_context: Arc<ServiceContext>,
    connection_manager: Arc<ConnectionManager>,
    event_dispatcher: Arc<EventDispatcher>,
    config: Arc<AppConfig>,
    heartbeat: HeartbeatConfig,
}

impl GatewayState {
    pub fn new(
        service_context: ServiceContext,
        connection_manager: Arc<ConnectionManager>,
        event_dispatcher: Arc<EventDispatcher>,
        config: AppConfig,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            connection_manager,
            event_dispatcher,
            config: Arc::new(config),
            heartbeat: HeartbeatConfig::default(),
        }
    }

    #[must_use]
    pub fn with_heartbeat(mut self, heartbeat: HeartbeatConfig) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    pub fn event_dispatcher(&self) -> &EventDispatcher {
        &self.event_dispatcher
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn heartbeat(&self) -> HeartbeatConfig {
        self.heartbeat
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("heartbeat", &self.heartbeat)
            .finish_non_exhaustive()
    }
}

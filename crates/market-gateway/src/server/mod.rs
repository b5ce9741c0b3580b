//! Gateway server setup

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::{GatewayState, HeartbeatConfig};

use crate::broadcast::{EventDispatcher, EventDispatcherConfig};
use crate::connection::ConnectionManager;
use axum::extract::State;
use axum::{routing::get, Json, Router};
use market_cache::{create_shared_pool, RedisPoolConfig};
use market_common::{AppConfig, AppError, JwtService};
use market_db::create_pool;
use market_service::ServiceContextBuilder;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
    pub users: usize,
    pub conversations: usize,
}

pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

async fn health_check(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let manager = state.connection_manager();
    Json(HealthResponse {
        status: "healthy",
        connections: manager.connection_count(),
        users: manager.user_count(),
        conversations: manager.conversation_count(),
    })
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
///
/// Migrations are left to the API server.
pub async fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let db_config = market_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let redis_pool = create_shared_pool(RedisPoolConfig::from(&config.redis))
        .map_err(|e| AppError::Cache(e.to_string()))?;

    let service_context = ServiceContextBuilder::new()
        .postgres(pool)
        .redis_pool(redis_pool)
        .jwt_service(Arc::new(JwtService::from_config(&config.jwt)))
        .storage(config.storage.clone())
        .messaging(config.messaging)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let connection_manager = ConnectionManager::new_shared();

    let dispatcher_config = EventDispatcherConfig {
        redis_url: config.redis.url.clone(),
        ..Default::default()
    };
    let event_dispatcher = EventDispatcher::new(dispatcher_config, connection_manager.clone())
        .await
        .map_err(|e| AppError::Cache(format!("Failed to create event dispatcher: {e}")))?;
    let event_dispatcher = Arc::new(event_dispatcher);
    event_dispatcher.clone().start();

    Ok(GatewayState::new(
        service_context,
        connection_manager,
        event_dispatcher,
        config,
    ))
}

/// Serve until ctrl-c, then stop the dispatcher
pub async fn run_server(state: GatewayState, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    let app = create_app(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    state.event_dispatcher().stop().await;
    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    let state = create_gateway_state(config).await?;
    run_server(state, addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

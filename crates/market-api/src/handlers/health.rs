//! Liveness and readiness checks

use axum::{extract::State, http::StatusCode, Json};
use market_service::dto::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// 503 until both PostgreSQL and Redis answer
///
/// GET /health/ready
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let ctx = state.service_context();
    let (db_healthy, redis_healthy) = tokio::join!(
        market_db::ping(ctx.pool()),
        async { ctx.redis_pool().health_check().await.is_ok() },
    );

    let status = if db_healthy && redis_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(ReadinessResponse::ready(db_healthy, redis_healthy)))
}

//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::auth::AppState;

/// Basic health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: String,
}

/// Basic health check
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Liveness check (is the process running)
///
/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Readiness check (can the store be reached)
///
/// GET /health/ready
pub async fn readiness(State(state): State<Arc<AppState>>) -> Result<StatusCode, StatusCode> {
    state.store.health_check().await.map_err(|e| {
        warn!("Readiness check failed: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(StatusCode::OK)
}

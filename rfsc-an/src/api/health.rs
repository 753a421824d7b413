//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    /// Sessions currently held in memory
    pub sessions: usize,
    /// Sessions held before the oldest is evicted
    pub session_capacity: usize,
    /// Upload time of the oldest live session
    pub oldest_session_at: Option<DateTime<Utc>>,
    /// Seconds since the service started
    pub uptime_seconds: i64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "rfsc-an".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.sessions.len().await,
        session_capacity: state.sessions.capacity(),
        oldest_session_at: state.sessions.oldest_created_at().await,
        uptime_seconds: (Utc::now() - state.startup_time).num_seconds(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

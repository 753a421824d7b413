//! rfsc-an library - RF spectrum analysis service
//!
//! Thin HTTP layer over `rfsc-common`: uploads become sessions, and each
//! characterization request names the session and instant it analyzes.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use rfsc_common::config::TomlConfig;
use rfsc_common::FeatureExtractor;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod session;

pub use crate::error::{ApiError, ApiResult};
pub use crate::session::{SessionStore, SpectrumSession};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Parsed exports keyed by session id
    pub sessions: SessionStore,
    /// Extractor configured with the service's peak constraints
    pub extractor: FeatureExtractor,
    /// Largest accepted upload body in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create application state
    pub fn new(
        sessions: SessionStore,
        extractor: FeatureExtractor,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            sessions,
            extractor,
            max_upload_bytes,
            startup_time: Utc::now(),
        }
    }

    /// Create application state from loaded configuration
    pub fn from_config(config: &TomlConfig) -> rfsc_common::Result<Self> {
        Ok(Self::new(
            SessionStore::new(config.max_sessions),
            config.feature_extractor()?,
            config.max_upload_bytes,
        ))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::upload_routes())
        .merge(api::analysis_routes())
        .merge(api::view_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

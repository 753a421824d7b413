//! Export upload
//!
//! POST /upload takes the raw export bytes as the request body, parses them
//! and opens a session for the result.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Optional query parameters for an upload
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Original file name, kept for display
    pub name: Option<String>,
}

/// Upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Number of time instants (valid slice indices are 0..n-1)
    pub n: usize,
    /// Number of frequency bins
    pub bins: usize,
}

/// POST /upload
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("empty upload body".to_string()));
    }

    let file = rfsc_common::ingest_bytes(&body)?;
    let n = file.spectrogram.instant_count();
    let bins = file.spectrogram.bins();

    let session = state.sessions.insert(file, query.name).await;
    info!(
        session_id = %session.id,
        name = session.source_name.as_deref().unwrap_or("-"),
        size = body.len(),
        instants = n,
        bins,
        "Spectrum export uploaded"
    );

    Ok(Json(UploadResponse {
        session_id: session.id,
        created_at: session.created_at,
        n,
        bins,
    }))
}

/// DELETE /session/:session_id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.sessions.remove(session_id).await {
        info!(%session_id, "Session removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::SessionNotFound(session_id))
    }
}

/// Build upload and session lifecycle routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/session/:session_id", delete(delete_session))
}

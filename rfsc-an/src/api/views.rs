//! Read-only views of a session's parsed export
//!
//! The spectrogram view carries what an image renderer needs: frequency
//! extent, `[instants, bins]` shape and the amplitude grid. No image is
//! produced here.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use rfsc_common::ingest::{InstantSpectrum, Metadata};
use rfsc_common::RenderExtent;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    session::SpectrumSession,
    AppState,
};

/// Spectrogram render data
#[derive(Debug, Serialize)]
pub struct SpectrogramView {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub extent: RenderExtent,
    /// Amplitudes as `[instant][bin]`, null where a cell is not numeric
    pub amplitudes: Vec<Vec<Option<f64>>>,
}

async fn find_session(state: &AppState, id: Uuid) -> ApiResult<Arc<SpectrumSession>> {
    state
        .sessions
        .get(id)
        .await
        .ok_or(ApiError::SessionNotFound(id))
}

/// GET /spectrogram/:session_id
pub async fn get_spectrogram(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SpectrogramView>> {
    let session = find_session(&state, session_id).await?;
    let matrix = &session.file.spectrogram;

    Ok(Json(SpectrogramView {
        session_id,
        extent: matrix.render_extent(),
        amplitudes: matrix.amplitude_grid(),
    }))
}

/// GET /instant/:session_id
pub async fn get_instant_spectrum(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<InstantSpectrum>> {
    let session = find_session(&state, session_id).await?;
    Ok(Json(session.file.instant_spectrum.clone()))
}

/// GET /metadata/:session_id
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<Metadata>> {
    let session = find_session(&state, session_id).await?;
    Ok(Json(session.file.metadata.clone()))
}

/// Build view routes
pub fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/spectrogram/:session_id", get(get_spectrogram))
        .route("/instant/:session_id", get(get_instant_spectrum))
        .route("/metadata/:session_id", get(get_metadata))
}

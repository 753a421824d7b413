//! Per-instant characterization
//!
//! POST /update_table slices the session's spectrogram at the requested
//! instant and returns the eight characterization metrics.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use rfsc_common::CharacterizationResult;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Instant index as sent by clients
///
/// Slider widgets post it as a string, and some serializers emit integral
/// floats such as `1.0`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexParam {
    Number(i64),
    Float(f64),
    Text(String),
}

impl IndexParam {
    pub fn resolve(&self) -> ApiResult<i64> {
        match self {
            IndexParam::Number(i) => Ok(*i),
            IndexParam::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(*f as i64),
            IndexParam::Float(f) => Err(ApiError::BadRequest(format!(
                "index {} is not an integer",
                f
            ))),
            IndexParam::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("index '{}' is not an integer", s))),
        }
    }
}

/// Characterization request
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub session_id: Uuid,
    pub index: IndexParam,
}

/// POST /update_table
pub async fn update_table(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> ApiResult<Json<CharacterizationResult>> {
    let Json(request) = payload?;
    let index = request.index.resolve()?;
    let session = state
        .sessions
        .get(request.session_id)
        .await
        .ok_or(ApiError::SessionNotFound(request.session_id))?;

    let slice = session.file.spectrogram.slice(index)?;
    let result = state.extractor.characterize(&slice)?;

    tracing::debug!(session_id = %session.id, index, "Characterized instant");
    Ok(Json(result))
}

/// Build characterization routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new().route("/update_table", post(update_table))
}

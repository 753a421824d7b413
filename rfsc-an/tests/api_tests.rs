//! Integration tests for rfsc-an API endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - Upload → session → per-instant characterization
//! - Range, parse, request-body and unknown-session errors
//! - Spectrogram, instant spectrum and metadata views
//! - Session isolation between uploads

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use rfsc_an::{build_router, AppState, SessionStore};
use rfsc_common::FeatureExtractor;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

const EXPORT: &str = "Device;RSA-306B\n\
Center Frequency;2400,5;MHz\n\
\n\
Frequency [Hz];Magnitude [dBm]\n\
100;-80,5\n\
200;-20\n\
\n\
Spectrogram\n\
Time [s];0;1\n\
Unit;dBm;dBm\n\
1;0,1;5\n\
2;0,2;6\n\
3;0,9;7\n\
5;0,4;8\n";

/// Export whose single instant has a strict interior axis maximum
const PEAK_EXPORT: &str = "K;V\n\
\n\
Frequency [Hz];Magnitude [dBm]\n\
1;2\n\
\n\
a\n\
b\n\
c\n\
1;10\n\
4;0,25\n\
2;30\n\
2;40\n";

/// Test helper: Create app with small session capacity
fn setup_app() -> axum::Router {
    let state = AppState::new(SessionStore::new(8), FeatureExtractor::default(), 1024 * 1024);
    build_router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn upload_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload?name=scan.csv")
        .header("content-type", "text/csv")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn analysis_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/update_table")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: Upload an export and return its session id
async fn upload(app: &axum::Router, export: &str) -> String {
    let response = app.clone().oneshot(upload_request(export)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    body["session_id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "rfsc-an");
    assert!(body["version"].is_string());
    assert_eq!(body["sessions"], 0);
    assert_eq!(body["session_capacity"], 8);
    assert!(body["oldest_session_at"].is_null());
}

#[tokio::test]
async fn test_health_reports_oldest_session() {
    let app = setup_app();
    let response = app.clone().oneshot(upload_request(EXPORT)).await.unwrap();
    let uploaded = extract_json(response.into_body()).await;
    upload(&app, PEAK_EXPORT).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["sessions"], 2);
    assert_eq!(body["oldest_session_at"], uploaded["created_at"]);
}

// =============================================================================
// Upload and characterization
// =============================================================================

#[tokio::test]
async fn test_upload_reports_instant_count() {
    let app = setup_app();
    let response = app.oneshot(upload_request(EXPORT)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["n"], 2);
    assert_eq!(body["bins"], 4);
    assert!(body["session_id"].is_string());
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn test_characterize_instant() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    let response = app
        .oneshot(analysis_request(json!({ "session_id": session_id, "index": 0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["noise_level"], 1.0);
    assert_eq!(body["amplitude"], 5.0);
    assert_eq!(body["snr"], 4.0);
    assert_eq!(body["central_frequency"], 0.4);
    assert_eq!(body["modulation"], "PPM");
    assert_eq!(body["spectral_peaks"], "");
    let crest = body["crest_factor"].as_f64().unwrap();
    assert!((crest - 1.465).abs() < 1e-9);
}

#[tokio::test]
async fn test_index_sent_as_string() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    let response = app
        .oneshot(analysis_request(json!({ "session_id": session_id, "index": "1" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["central_frequency"], 8.0);
    assert_eq!(body["bandwidth"], 3.0);
}

#[tokio::test]
async fn test_index_sent_as_integral_float() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    let response = app
        .oneshot(analysis_request(json!({ "session_id": session_id, "index": 1.0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["central_frequency"], 8.0);
}

#[tokio::test]
async fn test_spectral_peaks_reported() {
    let app = setup_app();
    let session_id = upload(&app, PEAK_EXPORT).await;

    let response = app
        .oneshot(analysis_request(json!({ "session_id": session_id, "index": 0 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["spectral_peaks"], "0.25");
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_index_out_of_range() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    for index in [2, -1] {
        let response = app
            .clone()
            .oneshot(analysis_request(json!({ "session_id": session_id, "index": index })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "RANGE_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("between 0 and 1"), "{message}");
    }
}

#[tokio::test]
async fn test_unknown_session() {
    let app = setup_app();
    let response = app
        .oneshot(analysis_request(json!({
            "session_id": "00000000-0000-0000-0000-000000000000",
            "index": 0
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_request_body_uses_error_envelope() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    for body in [json!({ "session_id": session_id }), json!({ "index": 0 })] {
        let response = app.clone().oneshot(analysis_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = extract_json(response.into_body()).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert!(body["error"]["message"].is_string());
    }

    let response = app
        .oneshot(analysis_request(json!({ "session_id": session_id, "index": 0.5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_malformed_upload() {
    let app = setup_app();
    let response = app
        .oneshot(upload_request("only one section"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "PARSE_ERROR");
}

#[tokio::test]
async fn test_non_utf8_upload() {
    let app = setup_app();
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .body(Body::from(vec![0x66u8, 0xff, 0xfe]))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "DECODE_ERROR");
}

// =============================================================================
// Views and session lifecycle
// =============================================================================

#[tokio::test]
async fn test_spectrogram_view() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    let response = app
        .oneshot(get(&format!("/spectrogram/{session_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["frequency_min"], 1.0);
    assert_eq!(body["frequency_max"], 5.0);
    assert_eq!(body["instants"], 2);
    assert_eq!(body["bins"], 4);
    assert_eq!(body["amplitudes"][1], json!([5.0, 6.0, 7.0, 8.0]));
}

#[tokio::test]
async fn test_metadata_and_instant_views() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    let response = app
        .clone()
        .oneshot(get(&format!("/metadata/{session_id}")))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["Device"], "RSA-306B");
    assert_eq!(body["Center Frequency"]["value"], "2400.5");
    assert_eq!(body["Center Frequency"]["unit"], "MHz");

    let response = app
        .oneshot(get(&format!("/instant/{session_id}")))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["rows"][0]["frequency_hz"], 100.0);
    assert_eq!(body["rows"][0]["magnitude_dbm"], -80.5);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = setup_app();
    let first = upload(&app, EXPORT).await;
    let second = upload(&app, PEAK_EXPORT).await;
    assert_ne!(first, second);

    // A later upload does not replace the first session's matrix
    let response = app
        .oneshot(analysis_request(json!({ "session_id": first, "index": 1 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["central_frequency"], 8.0);
}

#[tokio::test]
async fn test_delete_session() {
    let app = setup_app();
    let session_id = upload(&app, EXPORT).await;

    let delete = |id: &str| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/session/{id}"))
            .body(Body::empty())
            .unwrap()
    };

    let response = app.clone().oneshot(delete(&session_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete(&session_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get(&format!("/spectrogram/{session_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

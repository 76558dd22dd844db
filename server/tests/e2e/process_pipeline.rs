//! End-to-end tests for the complete process pipeline
//! Tests: Text input -> remote synthesis -> speed change -> re-encoded clip -> clear

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{assert_duration_close, post_json, send, wav_tone};
use crate::e2e_test_helpers::*;

#[tokio::test]
async fn test_complete_process_pipeline() {
    let mut remote = mockito::Server::new_async().await;
    let mock = remote
        .mock("POST", synthesis_path().as_str())
        .match_header("xi-api-key", TEST_API_KEY)
        .match_header("accept", "audio/mpeg")
        .match_body(mockito::Matcher::PartialJson(json!({ "text": "Hello world" })))
        .with_status(200)
        .with_body(wav_tone(44100, 1, 1.0))
        .expect(1)
        .create_async()
        .await;

    let app = create_e2e_app(&remote.url());

    // Step 1: process at normal speed
    let (status, body) = post_json(
        &app.router,
        "/process",
        json!({ "text": "Hello world", "speed": 1.0 }),
    )
    .await;
    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_duration_close(body["duration_ms"].as_u64().unwrap(), 1000);
    assert_eq!(app.file_count(), 1);

    // Step 2: fetch the playable clip
    let url = body["audio_url"].as_str().unwrap();
    let (status, wav) = send(&app.router, "GET", url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&wav[..4], b"RIFF");

    // Step 3: clear it
    let (status, _) = send(&app.router, "POST", "/clear").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.file_count(), 0);
    assert!(app.clips.is_empty());
}

#[tokio::test]
async fn test_unauthorized_synthesis_produces_no_clip() {
    let mut remote = mockito::Server::new_async().await;
    let mock = remote
        .mock("POST", synthesis_path().as_str())
        .with_status(401)
        .with_body(r#"{"detail":{"status":"invalid_api_key","message":"Invalid API key"}}"#)
        .expect(1)
        .create_async()
        .await;

    let app = create_e2e_app(&remote.url());
    let (status, body) =
        post_json(&app.router, "/process", json!({ "text": "Hello world" })).await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("invalid_api_key"), "error: {error}");
    assert_eq!(app.file_count(), 0);
    assert!(app.clips.is_empty());
}

#[tokio::test]
async fn test_empty_text_never_reaches_remote() {
    let mut remote = mockito::Server::new_async().await;
    let mock = remote
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let app = create_e2e_app(&remote.url());
    let (status, body) = post_json(&app.router, "/process", json!({ "text": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["level"], "warning");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_service_is_synthesis_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let app = create_e2e_app(&format!("http://127.0.0.1:{port}"));
    let (status, body) =
        post_json(&app.router, "/process", json!({ "text": "Hello world" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to synthesize text"));
    assert_eq!(app.file_count(), 0);
}

//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use grapevine_api::build_router;
use grapevine_api::state::{AppState, Timeouts};
use grapevine_blob_store::memory_blob_store::InMemoryBlobStore;
use grapevine_core::clock::Clock;
use grapevine_core::rng::DeterministicRng;
use grapevine_core::whisper::Whisper;
use grapevine_test_support::{FixedClock, MockRng, RecordingWhisperSender, StaticRhymeLookup};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// Fixed timestamp used across all integration tests.
pub fn fixed_now() -> chrono::DateTime<chrono::Utc> {
    chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap()
}

/// The app under test plus handles on its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub blobs: Arc<InMemoryBlobStore>,
    pub sender: Arc<RecordingWhisperSender>,
}

/// Build the full app router with an in-memory store, a recording sender, a
/// small rhyme dictionary and a deterministic Clock/RNG. `MockRng` always
/// picks the first candidate and the first occurrence.
pub fn build_test_app() -> TestApp {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let blobs = Arc::new(InMemoryBlobStore::new());
    let sender = Arc::new(RecordingWhisperSender::new());
    let rhymes = Arc::new(StaticRhymeLookup::new([
        ("Because", "applause"),
        ("applause", "pause"),
    ]));

    let app_state = AppState::new(
        clock,
        rng,
        blobs.clone(),
        rhymes,
        sender.clone(),
        Timeouts::default(),
    );

    TestApp {
        router: build_router(app_state),
        blobs,
        sender,
    }
}

/// The two-player chain used by most scenarios.
pub fn two_player_chain() -> Value {
    serde_json::json!([
        { "id": 0, "url": "http://a.example/" },
        { "id": 1, "url": "http://b.example/" }
    ])
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// POST a whisper and return the response.
pub async fn post_whisper(app: &TestApp, whisper: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("GrapevineAction", "whisper")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(whisper).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request with the given action header and return the response.
pub async fn get_action(app: &TestApp, uri: &str, action: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("GrapevineAction", action)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a plain GET request and return the response.
pub async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Waits for the detached delivery tasks to hand `count` whispers to the
/// recording sender.
pub async fn wait_for_sent(app: &TestApp, count: usize) -> Vec<(String, Whisper)> {
    for _ in 0..200 {
        let sent = app.sender.sent();
        if sent.len() >= count {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "expected {count} deliveries, saw {}",
        app.sender.sent().len()
    );
}

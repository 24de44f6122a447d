use super::*;
use crate::jobs::test_helpers::{
    FILE_URL, Script, ScriptedProvider, create_test_tracker, test_config, wait_for_terminal,
};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;

mod system;

/// Router plus the tracker behind it
fn test_app(provider: Arc<ScriptedProvider>) -> (Router, Arc<JobTracker>) {
    let tracker = Arc::new(create_test_tracker(provider));
    let config = tracker.get_config();
    (create_router(tracker.clone(), config), tracker)
}

async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_api_server_spawns() {
    let tracker = Arc::new(create_test_tracker(ScriptedProvider::new(Script::Succeed(
        None,
    ))));

    let mut config = test_config();
    config.server.api.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let tracker = tracker.clone();
        let config = config.clone();
        async move { start_api_server(tracker, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server exited early");

    api_handle.abort();
}

#[tokio::test]
async fn test_cors_enabled() {
    let (app, _tracker) = test_app(ScriptedProvider::new(Script::Succeed(None)));

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_restricted_origins() {
    let tracker = Arc::new(create_test_tracker(ScriptedProvider::new(Script::Succeed(
        None,
    ))));
    let mut config = test_config();
    config.server.api.cors_origins = vec!["https://vibedownloader.me".to_string()];
    let app = create_router(tracker, Arc::new(config));

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key("access-control-allow-origin"));

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "https://vibedownloader.me")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "https://vibedownloader.me"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let tracker = Arc::new(create_test_tracker(ScriptedProvider::new(Script::Succeed(
        None,
    ))));
    let mut config = test_config();
    config.server.api.cors_enabled = false;
    let app = create_router(tracker, Arc::new(config));

    let request = Request::builder()
        .uri("/api/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_spawn_api_server_method() {
    let tracker = Arc::new(create_test_tracker(ScriptedProvider::new(Script::Succeed(
        None,
    ))));

    let api_handle = tracker.spawn_api_server();
    tokio::time::sleep(Duration::from_millis(50)).await;

    api_handle.abort();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _tracker) = test_app(ScriptedProvider::new(Script::Succeed(None)));

    let response = get(app, "/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

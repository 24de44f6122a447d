use super::*;
use futures::StreamExt;

#[tokio::test]
async fn health_reports_version_and_provider() {
    let (app, _tracker) = test_app(ScriptedProvider::new(Script::Succeed(None)));

    let response = get(app, "/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["provider"], "scripted");
    assert_eq!(body["provider_configured"], true);
}

#[tokio::test]
async fn openapi_json_is_served() {
    let (app, _tracker) = test_app(ScriptedProvider::new(Script::Succeed(None)));

    let response = get(app, "/api/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
    assert!(body["paths"]["/api/download"].is_object());
}

#[tokio::test]
async fn swagger_ui_follows_config() {
    let tracker = Arc::new(create_test_tracker(ScriptedProvider::new(Script::Succeed(
        None,
    ))));

    let app = create_router(tracker.clone(), tracker.get_config());
    let response = get(app, "/swagger-ui/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut config = test_config();
    config.server.api.swagger_ui = false;
    let app = create_router(tracker, Arc::new(config));
    let response = get(app, "/swagger-ui/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn events_stream_job_transitions() {
    let (app, tracker) = test_app(ScriptedProvider::new(Script::Succeed(None)));

    let response = get(app, "/api/events").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");

    let job = tracker.submit("dQw4w9WgXcQ", "18").unwrap();
    wait_for_terminal(&tracker, &job.id.to_string()).await;

    let mut body = response.into_body().into_data_stream();
    let mut text = String::new();
    while !text.contains("event: ready") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), body.next())
            .await
            .expect("timed out waiting for SSE data")
            .unwrap()
            .unwrap();
        text.push_str(std::str::from_utf8(&chunk).unwrap());
    }

    assert!(text.contains("event: created"));
    assert!(text.contains(&job.id.to_string()));
}

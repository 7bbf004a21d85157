use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use config::Config;
use errors::UpstreamError;
use inference::{MockCompletionService, MockEmotionClassifier};
use metrics_exporter_prometheus::PrometheusBuilder;
use mindnote_server::routes::create_router;
use mindnote_server::state::AppState;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use testing::{
    COMPLETION_PATH, chat_completion_body, classification_body, expect_no_classification,
    expect_no_completion, mount_classification, mount_completion, openai_error_body, test_config,
};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(classifier: Arc<MockEmotionClassifier>, completion: Arc<MockCompletionService>) -> Router {
    let state = AppState::with_adapters(Config::default(), classifier, completion);
    create_router(Arc::new(state))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_analyze_returns_single_label() {
    let classifier = Arc::new(MockEmotionClassifier::new());
    let router = app(classifier.clone(), Arc::new(MockCompletionService::new()));

    let mut labels = Vec::new();
    for _ in 0..2 {
        let response = router
            .clone()
            .oneshot(post_json("/analyze", r#"{"text": "I am thrilled about this project"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let score = body["emotion"]["score"].as_f64().unwrap();
        assert!(score > 0.5 && score <= 1.0);
        labels.push(body["emotion"]["label"].as_str().unwrap().to_string());
    }

    assert_eq!(labels[0], labels[1]);
    assert_eq!(classifier.call_count(), 2);
}

#[tokio::test]
async fn test_analyze_whitespace_is_rejected_without_external_call() {
    let classifier = Arc::new(MockEmotionClassifier::new());
    let router = app(classifier.clone(), Arc::new(MockCompletionService::new()));

    let response = router
        .oneshot(post_json("/analyze", r#"{"text": "   "}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Text cannot be empty", "code": "EMPTY_TEXT" })
    );
    assert_eq!(classifier.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_malformed_body() {
    let classifier = Arc::new(MockEmotionClassifier::new());
    let router = app(classifier.clone(), Arc::new(MockCompletionService::new()));

    for body in [r#"{"txt": "hello"}"#, "not json", r#"{"text": 42}"#] {
        let response = router.clone().oneshot(post_json("/analyze", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["code"], "MALFORMED_BODY");
    }
    assert_eq!(classifier.call_count(), 0);
}

#[tokio::test]
async fn test_analyze_upstream_failure() {
    let classifier = Arc::new(MockEmotionClassifier::failing(UpstreamError::Unavailable {
        service: "classifier".to_string(),
        status: Some(503),
        reason: "model loading".to_string(),
    }));
    let router = app(classifier, Arc::new(MockCompletionService::new()));

    let response = router
        .oneshot(post_json("/analyze", r#"{"text": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Upstream service failed", "code": "UPSTREAM_ERROR" })
    );
}

#[tokio::test]
async fn test_suggest_task_returns_suggested_task() {
    let completion = Arc::new(MockCompletionService::with_response("Finish the report first"));
    let router = app(Arc::new(MockEmotionClassifier::new()), completion.clone());

    let response = router
        .oneshot(post_json(
            "/suggest-task",
            r#"{"thoughts": ["I should exercise more"], "tasks": ["finish report"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "suggestedTask": "Finish the report first" })
    );
    assert_eq!(completion.call_count().await, 1);
}

#[tokio::test]
async fn test_suggest_task_missing_lists_default_to_empty() {
    let completion = Arc::new(MockCompletionService::new());
    let router = app(Arc::new(MockEmotionClassifier::new()), completion.clone());

    let response = router.oneshot(post_json("/suggest-task", "{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(completion.prompts().await[0].text().contains("- "));
}

#[tokio::test]
async fn test_insight_summary_is_bare_string() {
    let completion = Arc::new(MockCompletionService::with_response(
        "You keep planning rest but never schedule it.",
    ));
    let router = app(Arc::new(MockEmotionClassifier::new()), completion);

    let response = router
        .oneshot(post_json("/insight-summary", r#"{"thoughts": [], "tasks": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!("You keep planning rest but never schedule it.")
    );
}

#[tokio::test]
async fn test_insight_summary_upstream_failure() {
    let completion = Arc::new(MockCompletionService::failing(UpstreamError::Transport {
        service: "completion".to_string(),
        reason: "connection refused".to_string(),
    }));
    let router = app(Arc::new(MockEmotionClassifier::new()), completion);

    let response = router
        .oneshot(post_json("/insight-summary", r#"{"thoughts": [], "tasks": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Upstream service failed", "code": "UPSTREAM_ERROR" })
    );
}

#[tokio::test]
async fn test_suggest_task_upstream_failure() {
    let completion = Arc::new(MockCompletionService::failing(UpstreamError::Unavailable {
        service: "completion".to_string(),
        status: None,
        reason: "bad gateway".to_string(),
    }));
    let router = app(Arc::new(MockEmotionClassifier::new()), completion);

    let response = router
        .oneshot(post_json("/suggest-task", r#"{"thoughts": ["tired"], "tasks": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Upstream service failed", "code": "UPSTREAM_ERROR" })
    );
}

#[tokio::test]
async fn test_upstream_timeout_has_its_own_code() {
    let classifier = Arc::new(MockEmotionClassifier::failing(UpstreamError::Timeout {
        service: "classifier".to_string(),
        timeout_ms: 30_000,
    }));
    let router = app(classifier, Arc::new(MockCompletionService::new()));

    let response = router
        .oneshot(post_json("/analyze", r#"{"text": "hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Upstream service failed", "code": "UPSTREAM_TIMEOUT" })
    );
}

#[tokio::test]
async fn test_health_ignores_upstreams() {
    let classifier = Arc::new(MockEmotionClassifier::failing(UpstreamError::EmptyResult {
        service: "classifier".to_string(),
    }));
    let completion = Arc::new(MockCompletionService::failing(UpstreamError::EmptyResult {
        service: "completion".to_string(),
    }));
    let router = app(classifier.clone(), completion.clone());

    let response = router.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "status": "healthy" }));
    assert_eq!(classifier.call_count(), 0);
    assert_eq!(completion.call_count().await, 0);
}

#[tokio::test]
async fn test_metrics_disabled_is_not_found() {
    let router = app(
        Arc::new(MockEmotionClassifier::new()),
        Arc::new(MockCompletionService::new()),
    );

    let response = router.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_enabled_renders_prometheus_text() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    metrics::with_local_recorder(&recorder, || {
        metrics::counter!("mindnote_requests_total", "operation" => "analyze").increment(1);
    });

    let state = AppState::with_adapters(
        Config::default(),
        Arc::new(MockEmotionClassifier::new()),
        Arc::new(MockCompletionService::new()),
    )
    .with_metrics(handle);
    let router = create_router(Arc::new(state));

    let response = router.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("mindnote_requests_total"));
    assert!(text.contains(r#"operation="analyze""#));
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let router = app(
        Arc::new(MockEmotionClassifier::new()),
        Arc::new(MockCompletionService::new()),
    );

    let request = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

async fn live_router(server: &MockServer) -> Router {
    router_for(test_config(&server.uri(), &server.uri())).await
}

async fn router_for(config: Config) -> Router {
    let state = AppState::new(config).await.unwrap();
    create_router(Arc::new(state))
}

#[tokio::test]
async fn test_end_to_end_analyze_against_mock_model() {
    let server = MockServer::start().await;
    mount_classification(&server, 200, classification_body("joy", 0.93)).await;
    expect_no_completion(&server).await;

    let response = live_router(&server)
        .await
        .oneshot(post_json("/analyze", r#"{"text": "I am thrilled about this project"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "emotion": { "label": "joy", "score": 0.93 } })
    );
}

#[tokio::test]
async fn test_end_to_end_suggest_task_against_mock_completion() {
    let server = MockServer::start().await;
    mount_completion(&server, 200, chat_completion_body("Go for a 20 minute run")).await;
    expect_no_classification(&server).await;

    let response = live_router(&server)
        .await
        .oneshot(post_json(
            "/suggest-task",
            r#"{"thoughts": ["I should exercise more"], "tasks": ["finish report"]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "suggestedTask": "Go for a 20 minute run" })
    );
}

#[tokio::test]
async fn test_end_to_end_completion_rejection_is_opaque() {
    let server = MockServer::start().await;
    mount_completion(&server, 401, openai_error_body("Incorrect API key provided: sk-***")).await;

    let response = live_router(&server)
        .await
        .oneshot(post_json("/insight-summary", r#"{"thoughts": [], "tasks": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "UPSTREAM_ERROR");
    assert!(!body.to_string().contains("sk-"));
}

#[tokio::test]
async fn test_end_to_end_completion_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETION_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(3)
        .mount(&server)
        .await;

    let response = live_router(&server)
        .await
        .oneshot(post_json("/suggest-task", r#"{"thoughts": [], "tasks": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Upstream service failed", "code": "UPSTREAM_ERROR" })
    );
}

#[tokio::test]
async fn test_end_to_end_slow_completion_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETION_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_completion_body("too late"))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), &server.uri());
    config.resilience.max_retries = 0;
    config.resilience.call_timeout_ms = 50;

    let response = router_for(config)
        .await
        .oneshot(post_json("/insight-summary", r#"{"thoughts": [], "tasks": []}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_TIMEOUT");
}

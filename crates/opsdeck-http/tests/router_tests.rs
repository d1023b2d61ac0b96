//! Route-level tests driving the router with `oneshot`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use opsdeck_http::runtime::{HttpRuntime, HttpRuntimeConfigBuilder};
use opsdeck_observability::BoundedTraceStore;
use opsdeck_ops::ServiceRegistry;
use opsdeck_testplan::{RunnerConfig, TestPlanRunner};
use opsdeck_tools::{OpsContext, OpsDispatcher};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn create_runtime() -> HttpRuntime {
    let trace = Arc::new(BoundedTraceStore::default());
    let runner = TestPlanRunner::new(RunnerConfig::default().with_target_override("http://127.0.0.1:9"))
        .unwrap()
        .with_trace_store(Arc::clone(&trace));
    let context = OpsContext::new(Arc::new(ServiceRegistry::seeded()), Arc::new(runner), trace);
    HttpRuntime::new(OpsDispatcher::new(context).unwrap())
}

fn create_test_app() -> (Router, Arc<BoundedTraceStore>) {
    let runtime = create_runtime();
    let trace = Arc::clone(runtime.trace());
    (runtime.router(), trace)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_summary() {
    let (app, trace) = create_test_app();
    let (status, _, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["services"], 5);
    assert_eq!(json["actions"], 11);
    assert_eq!(json["resources"], 8);
    assert_eq!(json["traceCapacity"], 128);
    // The request entry is recorded before the handler runs.
    assert_eq!(json["traceEntries"], 1);
    assert!(json["timestamp"].is_string());

    let entries = trace.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "GET /health");
    assert_eq!(entries[0].details, None);
    assert_eq!(entries[1].message, "Status 200");
    assert_eq!(entries[1].details.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_list_actions_and_resources() {
    let (app, _) = create_test_app();
    let (status, _, body) = send(app.clone(), get("/actions")).await;
    assert_eq!(status, StatusCode::OK);
    let actions: Vec<Value> = serde_json::from_slice(&body).unwrap();
    assert_eq!(actions.len(), 11);
    assert_eq!(actions[0]["name"], "ops.service.deploy");

    let (status, _, body) = send(app, get("/resources")).await;
    assert_eq!(status, StatusCode::OK);
    let resources: Vec<Value> = serde_json::from_slice(&body).unwrap();
    let templates: Vec<_> = resources
        .iter()
        .map(|r| r["uriTemplate"].as_str().unwrap().to_string())
        .collect();
    assert!(templates.contains(&"ops/service/{id}".to_string()));
    assert!(templates.contains(&"trace/logs".to_string()));
}

#[tokio::test]
async fn test_invoke_action_records_full_exchange() {
    let (app, trace) = create_test_app();
    let (status, _, body) = send(
        app,
        post("/actions/ops.service.restart", r#"{"serviceId":"web"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["status"], "ok");
    assert_eq!(outcome["output"]["service"]["id"], "web");

    let messages: Vec<_> = trace.entries().into_iter().map(|e| e.message).collect();
    assert_eq!(
        messages,
        vec![
            "POST /actions/ops.service.restart",
            "call: ops.service.restart",
            "result: ops.service.restart",
            "Status 200",
        ]
    );
    assert_eq!(
        trace.entries()[0].details.as_deref(),
        Some(r#"{"serviceId":"web"}"#)
    );
}

#[tokio::test]
async fn test_invoke_action_failures_are_ok_responses() {
    let (app, trace) = create_test_app();

    let (status, _, body) = send(app.clone(), post("/actions/ops.nuke", "")).await;
    assert_eq!(status, StatusCode::OK);
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["status"], "error");
    assert_eq!(outcome["reason"]["type"], "not_found");

    let (status, _, body) = send(app.clone(), post("/actions/trace.echo", "{broken")).await;
    assert_eq!(status, StatusCode::OK);
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["reason"]["type"], "invalid_input");

    let (_, _, body) = send(app, post("/actions/trace.echo", "[1,2]")).await;
    let outcome: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(outcome["reason"]["type"], "invalid_input");

    // Rejected bodies never reach the dispatcher.
    let calls = trace
        .entries()
        .into_iter()
        .filter(|e| e.message == "call: trace.echo")
        .count();
    assert_eq!(calls, 0);
}

#[tokio::test]
async fn test_read_resource_found_and_missing() {
    let (app, trace) = create_test_app();

    let (status, _, body) = send(app.clone(), get("/resources/ops/service/web")).await;
    assert_eq!(status, StatusCode::OK);
    let content: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(content["found"], true);
    assert_eq!(content["mimeType"], "text/markdown");
    assert_eq!(content["uri"], "ops/service/web");

    let (status, _, body) = send(app, get("/resources/nope/nothing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let content: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(content["found"], false);
    assert!(content["text"].as_str().unwrap().contains("ops/overview"));

    assert!(
        trace
            .entries()
            .iter()
            .any(|e| e.message == "read: ops/service/web")
    );
}

#[tokio::test]
async fn test_trace_views() {
    let (app, _) = create_test_app();
    send(app.clone(), get("/health")).await;

    let (status, content_type, body) = send(app.clone(), get("/trace/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/plain"));
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("OPSDECK COMMUNICATION TRACE"));
    assert!(text.contains("GET /health"));
    assert!(text.contains("GET /trace/logs"));

    let (status, content_type, body) = send(app, get("/trace/logs/markdown")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/markdown"));
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("# Communication Trace"));
    assert!(text.contains("| → IN |"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404_and_traced() {
    let (app, trace) = create_test_app();
    let (status, _, body) = send(app, get("/nope?x=1")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"], "not found");
    assert_eq!(json["status"], 404);

    let entries = trace.entries();
    assert_eq!(entries[0].message, "GET /nope?x=1");
    assert_eq!(entries[1].message, "Status 404");
}

#[tokio::test]
async fn test_large_body_preview_is_truncated() {
    let (app, trace) = create_test_app();
    let message = "x".repeat(2000);
    let body = serde_json::json!({ "message": message }).to_string();
    let (status, _, _) = send(app, post("/actions/trace.echo", &body)).await;
    assert_eq!(status, StatusCode::OK);

    let preview = trace.entries()[0].details.clone().unwrap();
    assert!(preview.ends_with("...(truncated)"));
}

#[tokio::test]
async fn test_body_limit_rejects_oversized_requests() {
    let config = HttpRuntimeConfigBuilder::new()
        .max_body_size(16)
        .build()
        .unwrap();
    let app = create_runtime().router_with_config(&config);

    let body = serde_json::json!({ "message": "x".repeat(100) }).to_string();
    let (status, _, _) = send(app, post("/actions/trace.echo", &body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_cors_enabled_by_default() {
    let (app, _) = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );

    let config = HttpRuntimeConfigBuilder::new()
        .enable_cors(false)
        .build()
        .unwrap();
    let app = create_runtime().router_with_config(&config);
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

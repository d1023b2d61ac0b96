//! End-to-end plan runs against a mocked HTTP target.

use opsdeck_core::{CancellationHandle, CancellationSignal};
use opsdeck_observability::BoundedTraceStore;
use opsdeck_testplan::{PlanStatus, RunnerConfig, StepStatus, TestPlanRunner};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner_for(target: &str) -> TestPlanRunner {
    TestPlanRunner::new(RunnerConfig::default().with_target_override(target))
        .expect("client should build")
}

fn step_names(result: &opsdeck_testplan::PlanResult) -> Vec<&str> {
    result.steps.iter().map(|s| s.name.as_str()).collect()
}

#[tokio::test]
async fn unknown_plan_does_no_io() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = runner_for(&server.uri())
        .run("bing-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::NotFound);
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.steps[0].name, "validate-plan");
    assert_eq!(result.steps[0].status, StepStatus::Failed);
    assert_eq!(result.plan_name, "bing-news");
}

#[tokio::test]
async fn plan_names_match_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let runner = runner_for(&server.uri());
    for name in [" Google-News ", "GOOGLE-NEWS", "google-news "] {
        let result = runner.run(name, &CancellationSignal::never()).await;
        assert_eq!(result.status, PlanStatus::NotFound);
        assert_eq!(result.plan_name, name);
        assert_eq!(result.steps[0].details, format!("Unknown plan: {}", name));
    }
}

#[tokio::test]
async fn reachable_target_with_marker_passes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "opsdeck-testplan/1.0"))
        .and(header("accept", "text/html,application/xhtml+xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><title>Google News</title></html>"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let trace = Arc::new(BoundedTraceStore::default());
    let runner = runner_for(&server.uri()).with_trace_store(Arc::clone(&trace));
    let result = runner.run("google-news", &CancellationSignal::never()).await;

    assert_eq!(result.status, PlanStatus::Passed, "{:?}", result.steps);
    assert_eq!(
        step_names(&result),
        vec!["resolve-target", "http-get", "status-check", "content-fetch", "content-check"]
    );
    assert!(result.steps.iter().all(|s| s.status == StepStatus::Success));
    assert_eq!(result.target.as_deref(), Some(format!("{}/", server.uri()).as_str()));
    assert!(result.started_at <= result.completed_at);

    // start + five steps + finish
    assert_eq!(trace.len(), 7);
    assert!(trace.entries().iter().all(|e| e.category == "PLAN"));
}

#[tokio::test]
async fn server_error_fails_http_get_and_stops() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = runner_for(&server.uri())
        .run("google-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::Failed);
    assert_eq!(step_names(&result), vec!["resolve-target", "http-get"]);
    let last = result.steps.last().unwrap();
    assert_eq!(last.status, StepStatus::Failed);
    assert!(last.details.starts_with("HTTP 503:"), "{}", last.details);
}

#[tokio::test]
async fn client_error_fails_status_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("News not here"))
        .mount(&server)
        .await;

    let result = runner_for(&server.uri())
        .run("google-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::Failed);
    assert_eq!(step_names(&result), vec!["resolve-target", "http-get", "status-check"]);
    assert_eq!(result.steps[1].status, StepStatus::Success);
    assert_eq!(result.steps[2].details, "Unexpected status 404.");
}

#[tokio::test]
async fn missing_marker_fails_content_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>weather only</html>"))
        .mount(&server)
        .await;

    let result = runner_for(&server.uri())
        .run("google-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::Failed);
    assert_eq!(result.steps.len(), 5);
    assert_eq!(result.failed_step().unwrap().name, "content-check");
}

#[tokio::test]
async fn large_body_is_truncated() {
    let server = MockServer::start().await;
    let body = format!("News {}", "x".repeat(20_000));
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = runner_for(&server.uri())
        .run("google-news", &CancellationSignal::never())
        .await;

    assert!(result.passed());
    let fetch = &result.steps[3];
    assert_eq!(fetch.name, "content-fetch");
    assert!(fetch.details.ends_with("...(truncated)"));
    assert!(fetch.details.chars().count() <= 400 + "...(truncated)".len());
}

#[tokio::test]
async fn invalid_target_fails_first_step() {
    let result = runner_for("not a url")
        .run("google-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::Failed);
    assert_eq!(step_names(&result), vec!["resolve-target"]);
    assert!(result.target.is_none());

    let ftp = runner_for("ftp://files.example.com")
        .run("google-news", &CancellationSignal::never())
        .await;
    assert!(ftp.steps[0].details.contains("http/https"));
}

#[tokio::test]
async fn connection_refused_is_a_failed_step() {
    // Bind and drop a listener to find a port nothing is listening on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = runner_for(&format!("http://127.0.0.1:{}", port))
        .run("google-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::Failed);
    assert_eq!(step_names(&result), vec!["resolve-target", "http-get"]);
}

#[tokio::test]
async fn slow_target_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = RunnerConfig::default()
        .with_target_override(server.uri())
        .with_request_timeout(Duration::from_millis(200));
    let result = TestPlanRunner::new(config)
        .unwrap()
        .run("google-news", &CancellationSignal::never())
        .await;

    assert_eq!(result.status, PlanStatus::Failed);
    let last = result.steps.last().unwrap();
    assert_eq!(last.name, "http-get");
    assert!(last.details.starts_with("timed out:"), "{}", last.details);
}

#[tokio::test]
async fn cancellation_fails_in_flight_step() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let (handle, signal) = CancellationHandle::new();
    let runner = runner_for(&server.uri());
    let run = tokio::spawn(async move { runner.run("google-news", &signal).await });

    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), run)
        .await
        .expect("run should stop promptly")
        .unwrap();

    assert_eq!(result.status, PlanStatus::Failed);
    assert_eq!(step_names(&result), vec!["resolve-target", "http-get"]);
    assert!(result.steps[1].details.starts_with("cancelled:"));
}

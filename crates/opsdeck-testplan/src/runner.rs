//! The plan runner.

use crate::config::{ACCEPT_HTML, RunnerConfig, USER_AGENT};
use crate::plan::{PlanInfo, PlanResult, PlanStatus};
use crate::step::{Completed, StepError, StepRecorder};
use chrono::Utc;
use opsdeck_core::text::truncate;
use opsdeck_core::CancellationSignal;
use opsdeck_observability::trace::category;
use opsdeck_observability::{BoundedTraceStore, TraceDirection};
use reqwest::header::{ACCEPT, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Response, StatusCode, Url};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Name of the reachability plan shipped with the runner.
pub const GOOGLE_NEWS_PLAN: &str = "google-news";

const GOOGLE_NEWS_STEPS: [&str; 5] = [
    "resolve-target",
    "http-get",
    "status-check",
    "content-fetch",
    "content-check",
];

/// Markers `content-check` looks for, case-insensitively.
const CONTENT_MARKERS: [&str; 2] = ["Google News", "News"];

const MAX_REDIRECTS: usize = 10;

/// Startup failures. Running a plan never fails.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Executes named diagnostic plans.
///
/// Cheap to clone; clones share the HTTP connection pool and trace store.
#[derive(Debug, Clone)]
pub struct TestPlanRunner {
    client: Client,
    config: RunnerConfig,
    trace: Option<Arc<BoundedTraceStore>>,
}

impl TestPlanRunner {
    /// Build a runner with its own HTTP client.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build a runner around an injected client.
    pub fn with_client(client: Client, config: RunnerConfig) -> Self {
        Self {
            client,
            config,
            trace: None,
        }
    }

    /// Record plan progress in a shared trace store.
    pub fn with_trace_store(mut self, trace: Arc<BoundedTraceStore>) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn list_plans(&self) -> Vec<PlanInfo> {
        vec![PlanInfo {
            name: GOOGLE_NEWS_PLAN.to_string(),
            title: "Check Google News reachability".to_string(),
            description: "GET the target, follow redirects, check status and content.".to_string(),
            default_target: self.config.default_target.clone(),
            target_environment_variable: self.config.target_env_var.clone(),
            steps: GOOGLE_NEWS_STEPS.iter().map(|s| s.to_string()).collect(),
        }]
    }

    /// Metadata for one plan, matched by exact name.
    pub fn plan(&self, name: &str) -> Option<PlanInfo> {
        self.list_plans().into_iter().find(|p| p.name == name)
    }

    /// Run a plan to completion.
    ///
    /// Unknown plans yield [`PlanStatus::NotFound`] without any I/O. A
    /// triggered `cancel` fails the in-flight step and ends the run early.
    pub async fn run(&self, plan_name: &str, cancel: &CancellationSignal) -> PlanResult {
        match plan_name {
            GOOGLE_NEWS_PLAN => self.run_google_news(cancel).await,
            _ => {
                warn!(plan = plan_name, "Unknown plan requested");
                PlanResult::not_found(plan_name)
            }
        }
    }

    fn trace_plan(&self, message: String, details: Option<&str>) {
        if let Some(trace) = &self.trace {
            trace.add(TraceDirection::Internal, category::PLAN, message, details);
        }
    }

    async fn run_google_news(&self, cancel: &CancellationSignal) -> PlanResult {
        let started_at = Utc::now();
        let target = self.config.resolve_target();
        info!(plan = GOOGLE_NEWS_PLAN, target = %target, "Plan started");
        self.trace_plan(format!("{} started", GOOGLE_NEWS_PLAN), Some(&target));

        let mut recorder = StepRecorder::new(GOOGLE_NEWS_PLAN, cancel, self.config.max_details_chars)
            .with_trace(self.trace.as_deref());
        let mut resolved = None;
        let completed = self
            .google_news_chain(&mut recorder, &target, &mut resolved)
            .await
            .is_some();

        let steps = recorder.into_steps();
        let status = if completed && steps.iter().all(|s| s.is_success()) {
            PlanStatus::Passed
        } else {
            PlanStatus::Failed
        };
        let summary = match status {
            PlanStatus::Passed => "Plan passed: target reachable and content found.",
            _ => "Plan failed: at least one step failed.",
        };

        info!(plan = GOOGLE_NEWS_PLAN, %status, steps = steps.len(), "Plan finished");
        self.trace_plan(format!("{}: {}", GOOGLE_NEWS_PLAN, status), None);

        PlanResult {
            plan_name: GOOGLE_NEWS_PLAN.to_string(),
            status,
            started_at,
            completed_at: Utc::now(),
            steps,
            target: resolved.map(|url: Url| url.to_string()),
            summary: summary.to_string(),
        }
    }

    /// The five steps in order; `None` as soon as one fails.
    async fn google_news_chain(
        &self,
        recorder: &mut StepRecorder<'_>,
        target: &str,
        resolved: &mut Option<Url>,
    ) -> Option<()> {
        let url = recorder
            .run("resolve-target", async { resolve_target(target) })
            .await?;
        *resolved = Some(url.clone());

        let response = recorder.run("http-get", self.http_get(url)).await?;

        let status = response.status();
        recorder
            .run("status-check", async move { check_status(status) })
            .await?;

        let body = recorder
            .run("content-fetch", self.fetch_body(response))
            .await?;

        recorder
            .run("content-check", async { check_content(&body) })
            .await
    }

    async fn http_get(&self, url: Url) -> Result<Completed<Response>, StepError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_HTML)
            .header(USER_AGENT_HEADER, USER_AGENT)
            .timeout(self.config.request_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(StepError::Http {
                status: status.as_u16(),
                message: format!("remote error {}", status.as_u16()),
            });
        }

        let details = format!("Status {}", describe_status(status));
        Ok(Completed::new(response, details))
    }

    async fn fetch_body(&self, response: Response) -> Result<Completed<String>, StepError> {
        let text = response.text().await?;
        let body = truncate(&text, self.config.max_body_chars);
        Ok(Completed {
            details: body.clone(),
            value: body,
        })
    }
}

fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn resolve_target(target: &str) -> Result<Completed<Url>, StepError> {
    let url = Url::parse(target)
        .map_err(|e| StepError::InvalidTarget(format!("Invalid URL '{}': {}", target, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(StepError::InvalidTarget(format!(
            "Only http/https targets are allowed, got '{}'.",
            url.scheme()
        )));
    }
    let details = format!("Target={}", url);
    Ok(Completed::new(url, details))
}

fn check_status(status: StatusCode) -> Result<Completed<()>, StepError> {
    let code = status.as_u16();
    if (200..400).contains(&code) {
        Ok(Completed::new((), format!("Status ok ({}).", code)))
    } else {
        Err(StepError::Assertion(format!("Unexpected status {}.", code)))
    }
}

fn check_content(body: &str) -> Result<Completed<()>, StepError> {
    let haystack = body.to_lowercase();
    if CONTENT_MARKERS
        .iter()
        .any(|marker| haystack.contains(&marker.to_lowercase()))
    {
        Ok(Completed::new((), "Content mentions News/Google News."))
    } else {
        Err(StepError::Assertion(
            "No mention of News/Google News found.".to_string(),
        ))
    }
}

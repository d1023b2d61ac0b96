//! Timed step execution with failure classification.

use crate::plan::{StepResult, StepStatus};
use opsdeck_core::CancellationSignal;
use opsdeck_core::text::truncate;
use opsdeck_observability::trace::category;
use opsdeck_observability::{BoundedTraceStore, TraceDirection};
use std::future::Future;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Why a step failed. The `Display` form becomes the step's details.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("{0}")]
    InvalidTarget(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("{}", render_transport(.status, .message))]
    Transport { status: Option<u16>, message: String },

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("{0}")]
    Assertion(String),
}

fn render_transport(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => message.to_string(),
    }
}

impl From<reqwest::Error> for StepError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StepError::Timeout(err.to_string())
        } else {
            StepError::Transport {
                status: err.status().map(|s| s.as_u16()),
                message: err.to_string(),
            }
        }
    }
}

/// A successful step's value plus the text recorded for it.
#[derive(Debug)]
pub struct Completed<T> {
    pub value: T,
    pub details: String,
}

impl<T> Completed<T> {
    pub fn new(value: T, details: impl Into<String>) -> Self {
        Self {
            value,
            details: details.into(),
        }
    }
}

/// Runs steps one at a time and collects their results.
pub struct StepRecorder<'a> {
    plan: &'a str,
    cancel: &'a CancellationSignal,
    trace: Option<&'a BoundedTraceStore>,
    max_details_chars: usize,
    steps: Vec<StepResult>,
}

impl<'a> StepRecorder<'a> {
    pub fn new(plan: &'a str, cancel: &'a CancellationSignal, max_details_chars: usize) -> Self {
        Self {
            plan,
            cancel,
            trace: None,
            max_details_chars,
            steps: Vec::new(),
        }
    }

    pub fn with_trace(mut self, trace: Option<&'a BoundedTraceStore>) -> Self {
        self.trace = trace;
        self
    }

    /// Run one step, racing it against cancellation.
    ///
    /// Returns the step's value on success. On failure the step is recorded
    /// as failed and `None` is returned so callers can stop with `?`.
    pub async fn run<T, F>(&mut self, name: &str, step: F) -> Option<T>
    where
        F: Future<Output = Result<Completed<T>, StepError>>,
    {
        let cancel = self.cancel;
        let started = Instant::now();
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StepError::Cancelled(format!(
                "step '{}' abandoned by caller",
                name
            ))),
            result = step => result,
        };
        let duration_millis = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let (status, details, value) = match outcome {
            Ok(Completed { value, details }) => (StepStatus::Success, details, Some(value)),
            Err(err) => (StepStatus::Failed, err.to_string(), None),
        };
        let details = truncate(&details, self.max_details_chars);

        debug!(plan = self.plan, step = name, ?status, duration_millis, "Step finished");
        if let Some(trace) = self.trace {
            let verdict = match status {
                StepStatus::Success => "success",
                StepStatus::Failed => "failed",
            };
            trace.add(
                TraceDirection::Internal,
                category::PLAN,
                format!("{} / {}: {}", self.plan, name, verdict),
                Some(&details),
            );
        }

        self.steps.push(StepResult {
            name: name.to_string(),
            status,
            details,
            duration_millis,
        });
        value
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<StepResult> {
        self.steps
    }
}

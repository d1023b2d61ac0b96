//! Plan metadata and results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static description of a runnable plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub name: String,
    pub title: String,
    pub description: String,
    pub default_target: String,
    pub target_environment_variable: String,
    /// Step names in execution order.
    pub steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlanStatus {
    Passed,
    Failed,
    NotFound,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Passed => "passed",
            PlanStatus::Failed => "failed",
            PlanStatus::NotFound => "not-found",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

/// Outcome of one attempted step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    pub details: String,
    pub duration_millis: u64,
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        self.status == StepStatus::Success
    }
}

/// Outcome of a plan run.
///
/// `steps` holds only attempted steps; anything after the first failure is
/// absent rather than marked skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub plan_name: String,
    pub status: PlanStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub steps: Vec<StepResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub summary: String,
}

impl PlanResult {
    /// Result for a plan name no runner knows. Performs no I/O.
    pub fn not_found(plan_name: &str) -> Self {
        let now = Utc::now();
        Self {
            plan_name: plan_name.to_string(),
            status: PlanStatus::NotFound,
            started_at: now,
            completed_at: now,
            steps: vec![StepResult {
                name: "validate-plan".to_string(),
                status: StepStatus::Failed,
                details: format!("Unknown plan: {}", plan_name),
                duration_millis: 0,
            }],
            target: None,
            summary: "Plan not found.".to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == PlanStatus::Passed
    }

    /// The step that ended the run, if any failed.
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| !s.is_success())
    }
}

//! Diagnostic plan actions.

use super::object_schema;
use async_trait::async_trait;
use opsdeck_core::{Action, ActionArgs, ActionOutcome, CancellationSignal};
use opsdeck_testplan::TestPlanRunner;
use serde_json::Value;
use std::sync::Arc;

pub struct ListPlansAction {
    runner: Arc<TestPlanRunner>,
}

impl ListPlansAction {
    pub fn new(runner: Arc<TestPlanRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Action for ListPlansAction {
    fn name(&self) -> &str {
        "tests.list"
    }

    fn description(&self) -> &str {
        "List the diagnostic plans this server can run."
    }

    async fn invoke(&self, _args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        ActionOutcome::from_serializable(&self.runner.list_plans())
    }
}

/// Runs a plan and returns its [`opsdeck_testplan::PlanResult`].
///
/// A failed or unknown plan is still a successful invocation; the verdict
/// lives in the result's `status`.
pub struct RunPlanAction {
    runner: Arc<TestPlanRunner>,
}

impl RunPlanAction {
    pub fn new(runner: Arc<TestPlanRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl Action for RunPlanAction {
    fn name(&self) -> &str {
        "tests.run"
    }

    fn description(&self) -> &str {
        "Run a named diagnostic plan."
    }

    fn input_schema(&self) -> Option<Value> {
        Some(object_schema(
            &[("plan", "string", "Plan name, e.g. google-news")],
            &["plan"],
        ))
    }

    async fn invoke(&self, args: &ActionArgs, cancel: &CancellationSignal) -> ActionOutcome {
        let result = self.runner.run(args.str_or_empty("plan"), cancel).await;
        ActionOutcome::from_serializable(&result)
    }
}

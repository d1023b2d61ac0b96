//! Trace store actions.

use super::object_schema;
use async_trait::async_trait;
use chrono::Utc;
use opsdeck_core::{Action, ActionArgs, ActionOutcome, CancellationSignal};
use opsdeck_observability::BoundedTraceStore;
use serde_json::{Value, json};
use std::sync::Arc;

/// Echoes `message` back; handy for checking a client can reach the server.
pub struct TraceEchoAction;

#[async_trait]
impl Action for TraceEchoAction {
    fn name(&self) -> &str {
        "trace.echo"
    }

    fn description(&self) -> &str {
        "Echo a message back. The call shows up in the trace log."
    }

    fn input_schema(&self) -> Option<Value> {
        Some(object_schema(
            &[("message", "string", "Message to return")],
            &["message"],
        ))
    }

    async fn invoke(&self, args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        ActionOutcome::success(json!({
            "echo": args.get("message").cloned().unwrap_or(Value::Null),
            "info": "Visible in /trace/logs or the trace/logs resource.",
        }))
    }
}

pub struct TracePingAction;

#[async_trait]
impl Action for TracePingAction {
    fn name(&self) -> &str {
        "trace.ping"
    }

    fn description(&self) -> &str {
        "Short ping to test the connection."
    }

    async fn invoke(&self, _args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        ActionOutcome::success(json!({ "pong": Utc::now() }))
    }
}

pub struct TraceStatsAction {
    trace: Arc<BoundedTraceStore>,
}

impl TraceStatsAction {
    pub fn new(trace: Arc<BoundedTraceStore>) -> Self {
        Self { trace }
    }
}

#[async_trait]
impl Action for TraceStatsAction {
    fn name(&self) -> &str {
        "trace.stats"
    }

    fn description(&self) -> &str {
        "Statistics for the current trace recording."
    }

    async fn invoke(&self, _args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        ActionOutcome::from_serializable(&self.trace.stats())
    }
}

/// Marks a reset point in the trace. The store itself is append-only, so
/// earlier entries age out through eviction.
pub struct TraceClearAction {
    trace: Arc<BoundedTraceStore>,
}

impl TraceClearAction {
    pub fn new(trace: Arc<BoundedTraceStore>) -> Self {
        Self { trace }
    }
}

#[async_trait]
impl Action for TraceClearAction {
    fn name(&self) -> &str {
        "trace.clear"
    }

    fn description(&self) -> &str {
        "Mark a reset point in the trace log."
    }

    async fn invoke(&self, _args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        let marker = self.trace.add_system("Trace view was reset");
        ActionOutcome::success(json!({
            "status": "cleared",
            "message": "Trace log marked. New entries keep being recorded.",
            "markerSequence": marker.sequence,
        }))
    }
}

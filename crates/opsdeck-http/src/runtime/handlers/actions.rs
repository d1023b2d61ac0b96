//! Action discovery and invocation.

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Json,
};
use opsdeck_core::{
    ActionArgs, ActionCall, ActionDescriptor, ActionOutcome, CancellationSignal, FailureReason,
};
use serde_json::Value;
use tracing::debug;

use crate::runtime::HttpRuntime;

/// GET /actions - descriptors sorted by name
pub async fn list_actions(State(runtime): State<HttpRuntime>) -> Json<Vec<ActionDescriptor>> {
    Json(runtime.dispatcher().list_actions())
}

/// POST /actions/{name} - invoke an action
///
/// The body is an optional JSON object of arguments. The outcome is always
/// returned with status 200; failures are reported inside it. A dropped
/// connection drops the invocation future, which abandons any outgoing
/// request it was waiting on.
pub async fn invoke_action(
    State(runtime): State<HttpRuntime>,
    Path(name): Path<String>,
    body: Bytes,
) -> Json<ActionOutcome> {
    let args = match parse_arguments(&body) {
        Ok(args) => args,
        Err(reason) => {
            debug!(action = %name, reason = %reason, "Rejected action arguments");
            return Json(ActionOutcome::failed(reason));
        }
    };

    let call = ActionCall::new(name, args);
    Json(
        runtime
            .dispatcher()
            .invoke(&call, &CancellationSignal::never())
            .await,
    )
}

fn parse_arguments(body: &[u8]) -> Result<ActionArgs, FailureReason> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ActionArgs::new());
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        FailureReason::invalid_input(format!("request body is not valid JSON: {}", e))
    })?;
    ActionArgs::from_value(value)
}

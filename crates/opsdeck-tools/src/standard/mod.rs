//! Standard actions.
//!
//! | Name | Component |
//! |------|-----------|
//! | `ops.*` | [`opsdeck_ops::ServiceRegistry`] |
//! | `tests.*` | [`opsdeck_testplan::TestPlanRunner`] |
//! | `trace.*` | [`opsdeck_observability::BoundedTraceStore`] |

pub mod ops;
pub mod testplan;
pub mod trace;

use crate::context::OpsContext;
use crate::registry::InMemoryActionRegistry;
use serde_json::{Value, json};
use std::sync::Arc;

pub use ops::{
    DeployServiceAction, ListServicesAction, MaintenanceAction, RestartServiceAction,
    TimelineNoteAction,
};
pub use testplan::{ListPlansAction, RunPlanAction};
pub use trace::{TraceClearAction, TraceEchoAction, TracePingAction, TraceStatsAction};

/// Registry with every standard action bound to `context`.
pub fn standard_actions(context: &OpsContext) -> InMemoryActionRegistry {
    let registry = &context.registry;
    let trace = &context.trace;

    InMemoryActionRegistry::new()
        .with_action(Arc::new(ListServicesAction::new(Arc::clone(registry))))
        .with_action(Arc::new(RestartServiceAction::new(Arc::clone(registry))))
        .with_action(Arc::new(DeployServiceAction::new(Arc::clone(registry))))
        .with_action(Arc::new(MaintenanceAction::new(Arc::clone(registry))))
        .with_action(Arc::new(TimelineNoteAction::new(Arc::clone(registry))))
        .with_action(Arc::new(ListPlansAction::new(Arc::clone(&context.runner))))
        .with_action(Arc::new(RunPlanAction::new(Arc::clone(&context.runner))))
        .with_action(Arc::new(TraceEchoAction))
        .with_action(Arc::new(TracePingAction))
        .with_action(Arc::new(TraceStatsAction::new(Arc::clone(trace))))
        .with_action(Arc::new(TraceClearAction::new(Arc::clone(trace))))
}

/// JSON schema for an object of string properties.
///
/// `properties` pairs a name with its description; `required` lists the
/// names callers must supply.
pub(crate) fn object_schema(properties: &[(&str, &str, &str)], required: &[&str]) -> Value {
    let props: serde_json::Map<String, Value> = properties
        .iter()
        .map(|(name, kind, description)| {
            (
                name.to_string(),
                json!({ "type": kind, "description": description }),
            )
        })
        .collect();

    json!({
        "type": "object",
        "properties": props,
        "required": required,
    })
}

//! The entry point outer surfaces call into.

use crate::context::OpsContext;
use crate::registry::{ActionRegistry, InMemoryActionRegistry};
use crate::resources::ResourceCatalog;
use crate::standard::standard_actions;
use chrono::{DateTime, Utc};
use opsdeck_core::{
    ActionCall, ActionDescriptor, ActionOutcome, CancellationSignal, CoreResult, ResourceContent,
    ResourceDescriptor,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Snapshot reported by health endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub services: usize,
    pub timeline_events: usize,
    pub trace_entries: usize,
    pub trace_capacity: usize,
    pub actions: usize,
    pub resources: usize,
}

/// Routes action calls and resource reads, recording each in the trace
/// store and the process log.
#[derive(Clone)]
pub struct OpsDispatcher {
    context: OpsContext,
    actions: InMemoryActionRegistry,
    resources: ResourceCatalog,
}

impl OpsDispatcher {
    /// Dispatcher with the standard actions and resources.
    pub fn new(context: OpsContext) -> CoreResult<Self> {
        let actions = standard_actions(&context);
        let resources = ResourceCatalog::standard(&context)?;
        Ok(Self::with_parts(context, actions, resources))
    }

    pub fn with_parts(
        context: OpsContext,
        actions: InMemoryActionRegistry,
        resources: ResourceCatalog,
    ) -> Self {
        Self {
            context,
            actions,
            resources,
        }
    }

    pub fn context(&self) -> &OpsContext {
        &self.context
    }

    /// Invoke an action. Unknown names come back as a not-found failure.
    pub async fn invoke(&self, call: &ActionCall, cancel: &CancellationSignal) -> ActionOutcome {
        let trace = &self.context.trace;
        let arguments = serde_json::to_string(&call.arguments).ok();
        trace.add_action_call(&call.name, arguments.as_deref());
        debug!(action = %call.name, arguments = ?arguments, "Invoking action");

        let outcome = self.actions.dispatch(call, cancel).await;

        let rendered = serde_json::to_string(&outcome).ok();
        trace.add_action_result(&call.name, rendered.as_deref());
        match outcome.failure_reason() {
            None => info!(action = %call.name, "Action succeeded"),
            Some(reason) => info!(action = %call.name, reason = %reason, "Action failed"),
        }
        outcome
    }

    /// Read a resource. Unknown URIs come back with `found = false`.
    pub fn read(&self, uri: &str) -> ResourceContent {
        self.context.trace.add_resource_read(uri);
        let content = self.resources.read(uri);
        debug!(uri = %content.uri, found = content.found, "Resource read");
        content
    }

    pub fn list_actions(&self) -> Vec<ActionDescriptor> {
        self.actions.descriptors()
    }

    pub fn list_resources(&self) -> Vec<ResourceDescriptor> {
        self.resources.descriptors()
    }

    pub fn health(&self) -> HealthSummary {
        HealthSummary {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            services: self.context.registry.len(),
            timeline_events: self.context.registry.event_count(),
            trace_entries: self.context.trace.len(),
            trace_capacity: self.context.trace.capacity(),
            actions: self.actions.len(),
            resources: self.resources.len(),
        }
    }
}

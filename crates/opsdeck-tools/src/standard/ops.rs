//! Service registry actions.

use super::object_schema;
use async_trait::async_trait;
use opsdeck_core::{Action, ActionArgs, ActionOutcome, CancellationSignal, FailureReason};
use opsdeck_ops::{OpsActionResult, ServiceNotFound, ServiceRegistry, ServiceStatus};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

fn mutation_outcome(result: Result<OpsActionResult, ServiceNotFound>) -> ActionOutcome {
    match result {
        Ok(result) => ActionOutcome::from_serializable(&result),
        Err(err) => ActionOutcome::failed(FailureReason::not_found(format!("service '{}'", err.id))),
    }
}

/// Row returned by `ops.services.list`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceSummary<'a> {
    id: &'a str,
    name: &'a str,
    status: ServiceStatus,
    version: &'a str,
    in_maintenance: bool,
    instances: u32,
    latency_ms: f64,
    errors_per_hour: u32,
}

pub struct ListServicesAction {
    registry: Arc<ServiceRegistry>,
}

impl ListServicesAction {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for ListServicesAction {
    fn name(&self) -> &str {
        "ops.services.list"
    }

    fn description(&self) -> &str {
        "List all services with status, version, latency and error rate."
    }

    async fn invoke(&self, _args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        let services = self.registry.list();
        let rows: Vec<ServiceSummary<'_>> = services
            .iter()
            .map(|s| ServiceSummary {
                id: &s.id,
                name: &s.name,
                status: s.status,
                version: &s.version,
                in_maintenance: s.in_maintenance,
                instances: s.instances,
                latency_ms: s.latency_ms,
                errors_per_hour: s.errors_last_hour,
            })
            .collect();
        ActionOutcome::from_serializable(&rows)
    }
}

pub struct RestartServiceAction {
    registry: Arc<ServiceRegistry>,
}

impl RestartServiceAction {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for RestartServiceAction {
    fn name(&self) -> &str {
        "ops.service.restart"
    }

    fn description(&self) -> &str {
        "Restart a service and record it on the timeline."
    }

    fn input_schema(&self) -> Option<Value> {
        Some(object_schema(
            &[("serviceId", "string", "Service id, e.g. web or worker")],
            &["serviceId"],
        ))
    }

    async fn invoke(&self, args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        mutation_outcome(self.registry.restart(args.str_or_empty("serviceId")))
    }
}

pub struct DeployServiceAction {
    registry: Arc<ServiceRegistry>,
}

impl DeployServiceAction {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for DeployServiceAction {
    fn name(&self) -> &str {
        "ops.service.deploy"
    }

    fn description(&self) -> &str {
        "Mark a deployment with a version and an optional note."
    }

    fn input_schema(&self) -> Option<Value> {
        Some(object_schema(
            &[
                ("serviceId", "string", "Service id, e.g. nuget"),
                ("version", "string", "Target version, e.g. 1.4.3-pre"),
                ("note", "string", "Optional note (change, ticket, expectation)"),
            ],
            &["serviceId", "version"],
        ))
    }

    async fn invoke(&self, args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        mutation_outcome(self.registry.deploy(
            args.str_or_empty("serviceId"),
            args.str_or_empty("version"),
            args.str("note"),
        ))
    }
}

pub struct MaintenanceAction {
    registry: Arc<ServiceRegistry>,
}

impl MaintenanceAction {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for MaintenanceAction {
    fn name(&self) -> &str {
        "ops.service.maintenance"
    }

    fn description(&self) -> &str {
        "Enable or disable maintenance mode for a service."
    }

    fn input_schema(&self) -> Option<Value> {
        Some(object_schema(
            &[
                ("serviceId", "string", "Service id, e.g. build"),
                ("enabled", "boolean", "true enables maintenance, false ends it"),
            ],
            &["serviceId", "enabled"],
        ))
    }

    async fn invoke(&self, args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        let Some(enabled) = args.bool("enabled") else {
            return ActionOutcome::failed(FailureReason::invalid_input(
                "'enabled' must be true or false",
            ));
        };
        mutation_outcome(
            self.registry
                .toggle_maintenance(args.str_or_empty("serviceId"), enabled),
        )
    }
}

pub struct TimelineNoteAction {
    registry: Arc<ServiceRegistry>,
}

impl TimelineNoteAction {
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl Action for TimelineNoteAction {
    fn name(&self) -> &str {
        "ops.timeline.note"
    }

    fn description(&self) -> &str {
        "Append a free-form note to the timeline."
    }

    fn input_schema(&self) -> Option<Value> {
        Some(object_schema(
            &[
                ("note", "string", "Note text shown on the timeline"),
                ("actor", "string", "Optional actor (name, role)"),
            ],
            &["note"],
        ))
    }

    async fn invoke(&self, args: &ActionArgs, _cancel: &CancellationSignal) -> ActionOutcome {
        let result = self
            .registry
            .record_note(args.str_or_empty("note"), args.str("actor"));
        ActionOutcome::from_serializable(&result)
    }
}

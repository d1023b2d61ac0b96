//! Registry views.

use opsdeck_core::{CoreResult, Resource, ResourceParams, UriTemplate};
use opsdeck_ops::{DEFAULT_LATEST_EVENTS, ServiceRegistry};
use std::sync::Arc;
use tracing::debug;

pub struct OpsOverviewResource {
    registry: Arc<ServiceRegistry>,
    template: UriTemplate,
}

impl OpsOverviewResource {
    pub fn new(registry: Arc<ServiceRegistry>) -> CoreResult<Self> {
        Ok(Self {
            registry,
            template: UriTemplate::parse("ops/overview")?,
        })
    }
}

impl Resource for OpsOverviewResource {
    fn name(&self) -> &str {
        "ops.overview"
    }

    fn title(&self) -> &str {
        "Ops Overview"
    }

    fn description(&self) -> &str {
        "Short summary of every service and where to start."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, _params: &ResourceParams) -> String {
        self.registry.overview_report()
    }
}

pub struct ServiceDetailResource {
    registry: Arc<ServiceRegistry>,
    template: UriTemplate,
}

impl ServiceDetailResource {
    pub fn new(registry: Arc<ServiceRegistry>) -> CoreResult<Self> {
        Ok(Self {
            registry,
            template: UriTemplate::parse("ops/service/{id}")?,
        })
    }
}

impl Resource for ServiceDetailResource {
    fn name(&self) -> &str {
        "ops.service.detail"
    }

    fn title(&self) -> &str {
        "Service Detail"
    }

    fn description(&self) -> &str {
        "Detail view of one service (status, version, error rate)."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, params: &ResourceParams) -> String {
        let id = params.get_or_empty("id");
        debug!(service_id = id, "Service detail read");
        self.registry.service_report(id)
    }
}

pub struct TimelineResource {
    registry: Arc<ServiceRegistry>,
    template: UriTemplate,
}

impl TimelineResource {
    pub fn new(registry: Arc<ServiceRegistry>) -> CoreResult<Self> {
        Ok(Self {
            registry,
            template: UriTemplate::parse("ops/timeline")?,
        })
    }
}

impl Resource for TimelineResource {
    fn name(&self) -> &str {
        "ops.timeline"
    }

    fn title(&self) -> &str {
        "Timeline"
    }

    fn description(&self) -> &str {
        "Most recent audit events, newest first."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, _params: &ResourceParams) -> String {
        self.registry.timeline_report(DEFAULT_LATEST_EVENTS)
    }
}

pub struct RunbookResource {
    registry: Arc<ServiceRegistry>,
    template: UriTemplate,
}

impl RunbookResource {
    pub fn new(registry: Arc<ServiceRegistry>) -> CoreResult<Self> {
        Ok(Self {
            registry,
            template: UriTemplate::parse("ops/runbook/{topic}")?,
        })
    }
}

impl Resource for RunbookResource {
    fn name(&self) -> &str {
        "ops.runbook"
    }

    fn title(&self) -> &str {
        "Runbook"
    }

    fn description(&self) -> &str {
        "Manual checklist in markdown."
    }

    fn template(&self) -> &UriTemplate {
        &self.template
    }

    fn read(&self, params: &ResourceParams) -> String {
        self.registry.runbook(params.get_or_empty("topic"))
    }
}

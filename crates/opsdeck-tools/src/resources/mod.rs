//! Read-only resources and the catalog that routes URIs to them.

pub mod ops;
pub mod testplan;
pub mod trace;

use crate::context::OpsContext;
use opsdeck_core::{CoreResult, Resource, ResourceContent, ResourceDescriptor};
use std::sync::Arc;

pub use ops::{OpsOverviewResource, RunbookResource, ServiceDetailResource, TimelineResource};
pub use testplan::{PlanCatalogResource, PlanDetailResource};
pub use trace::{TraceLogsMarkdownResource, TraceLogsResource};

/// Ordered set of resources. The first template matching a URI wins.
#[derive(Clone, Default)]
pub struct ResourceCatalog {
    resources: Vec<Arc<dyn Resource>>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every standard resource bound to `context`.
    pub fn standard(context: &OpsContext) -> CoreResult<Self> {
        let registry = &context.registry;
        Ok(Self::new()
            .with_resource(Arc::new(OpsOverviewResource::new(Arc::clone(registry))?))
            .with_resource(Arc::new(ServiceDetailResource::new(Arc::clone(registry))?))
            .with_resource(Arc::new(TimelineResource::new(Arc::clone(registry))?))
            .with_resource(Arc::new(RunbookResource::new(Arc::clone(registry))?))
            .with_resource(Arc::new(TraceLogsResource::new(Arc::clone(&context.trace))?))
            .with_resource(Arc::new(TraceLogsMarkdownResource::new(Arc::clone(&context.trace))?))
            .with_resource(Arc::new(PlanCatalogResource::new(Arc::clone(&context.runner))?))
            .with_resource(Arc::new(PlanDetailResource::new(Arc::clone(&context.runner))?)))
    }

    pub fn with_resource(mut self, resource: Arc<dyn Resource>) -> Self {
        self.resources.push(resource);
        self
    }

    /// Read `uri`, or return a not-found payload listing known templates.
    pub fn read(&self, uri: &str) -> ResourceContent {
        let uri = uri.trim().trim_matches('/');
        for resource in &self.resources {
            if let Some(params) = resource.template().matches(uri) {
                return ResourceContent {
                    uri: uri.to_string(),
                    mime_type: resource.mime_type().to_string(),
                    text: resource.read(&params),
                    found: true,
                };
            }
        }
        ResourceContent::not_found(uri, &self.templates())
    }

    pub fn templates(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|r| r.template().to_string())
            .collect()
    }

    pub fn descriptors(&self) -> Vec<ResourceDescriptor> {
        self.resources.iter().map(|r| r.descriptor()).collect()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

//! Shared component handles.

use opsdeck_observability::BoundedTraceStore;
use opsdeck_ops::ServiceRegistry;
use opsdeck_testplan::TestPlanRunner;
use std::sync::Arc;

/// The long-lived components actions and resources operate on.
///
/// Created once at startup; cloning only clones the `Arc`s.
#[derive(Debug, Clone)]
pub struct OpsContext {
    pub registry: Arc<ServiceRegistry>,
    pub runner: Arc<TestPlanRunner>,
    pub trace: Arc<BoundedTraceStore>,
}

impl OpsContext {
    pub fn new(
        registry: Arc<ServiceRegistry>,
        runner: Arc<TestPlanRunner>,
        trace: Arc<BoundedTraceStore>,
    ) -> Self {
        Self {
            registry,
            runner,
            trace,
        }
    }
}

//! Component wiring shared by the commands.

use crate::error::CliError;
use opsdeck_core::{CancellationHandle, CancellationSignal};
use opsdeck_http::HttpRuntimeConfig;
use opsdeck_observability::BoundedTraceStore;
use opsdeck_ops::ServiceRegistry;
use opsdeck_testplan::{RunnerConfig, TestPlanRunner};
use opsdeck_tools::{OpsContext, OpsDispatcher};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the seeded registry, the plan runner and the dispatcher over a
/// trace store sized from `config`.
pub fn build_dispatcher(
    config: &HttpRuntimeConfig,
    runner_config: RunnerConfig,
) -> Result<OpsDispatcher, CliError> {
    let trace = Arc::new(BoundedTraceStore::new(config.trace_capacity));
    let runner = TestPlanRunner::new(runner_config)?.with_trace_store(Arc::clone(&trace));
    let registry = ServiceRegistry::seeded();
    info!(
        services = registry.len(),
        trace_capacity = config.trace_capacity,
        "Components initialized"
    );

    let context = OpsContext::new(Arc::new(registry), Arc::new(runner), trace);
    Ok(OpsDispatcher::new(context)?)
}

/// A signal triggered by the first Ctrl+C.
pub fn cancel_on_ctrl_c() -> CancellationSignal {
    let (handle, signal) = CancellationHandle::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Received Ctrl+C, cancelling");
            handle.cancel();
        }
    });
    signal
}

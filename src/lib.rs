//! # opsdeck
//!
//! Operations toolkit built around three long-lived components:
//!
//! - **[ServiceRegistry]**: seeded service state with restart, deploy,
//!   maintenance and note operations, plus a bounded timeline
//! - **[TestPlanRunner]**: named step pipelines that check a remote target
//!   over HTTP and report per-step results
//! - **[BoundedTraceStore]**: fixed-capacity, sequence-numbered record of
//!   what the process has seen
//!
//! The [`OpsDispatcher`] exposes all three as named actions and URI-addressed
//! resources, and [`HttpRuntime`] serves the dispatcher over HTTP.
//!
//! ## Quick Start
//!
//! ```rust
//! use opsdeck_workspace::{
//!     ActionArgs, ActionCall, BoundedTraceStore, CancellationSignal, OpsContext, OpsDispatcher,
//!     RunnerConfig, ServiceRegistry, TestPlanRunner,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let trace = Arc::new(BoundedTraceStore::default());
//! let runner = TestPlanRunner::new(RunnerConfig::default())?.with_trace_store(Arc::clone(&trace));
//! let context = OpsContext::new(Arc::new(ServiceRegistry::seeded()), Arc::new(runner), trace);
//! let dispatcher = OpsDispatcher::new(context)?;
//!
//! let call = ActionCall::new("ops.service.restart", ActionArgs::new().with("serviceId", "web"));
//! let outcome = dispatcher.invoke(&call, &CancellationSignal::never()).await;
//! assert!(outcome.is_success());
//!
//! let overview = dispatcher.read("ops/overview");
//! assert!(overview.text.starts_with("# Ops Overview"));
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Module aliases for namespaced access
// ============================================================================

pub use opsdeck_core as core;
pub use opsdeck_http as http;
pub use opsdeck_observability as observability;
pub use opsdeck_ops as ops;
pub use opsdeck_testplan as testplan;
pub use opsdeck_tools as tools;

// ============================================================================
// Commonly used types
// ============================================================================

pub use opsdeck_core::{
    ActionArgs, ActionCall, ActionOutcome, CancellationHandle, CancellationSignal, FailureReason,
    ResourceContent,
};
pub use opsdeck_http::{HttpRuntime, HttpRuntimeConfig, HttpRuntimeConfigBuilder};
pub use opsdeck_observability::{BoundedTraceStore, TraceDirection, TraceEntry};
pub use opsdeck_ops::{OpsService, ServiceRegistry, ServiceStatus};
pub use opsdeck_testplan::{PlanResult, PlanStatus, RunnerConfig, TestPlanRunner};
pub use opsdeck_tools::{OpsContext, OpsDispatcher};

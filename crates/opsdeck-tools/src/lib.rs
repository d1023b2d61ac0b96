//! # Opsdeck Tools
//!
//! The named actions and resources opsdeck exposes, and the
//! [`OpsDispatcher`] every outer surface (CLI, HTTP, chat-tool bridges)
//! calls into.
//!
//! ## Actions
//!
//! - `ops.services.list`, `ops.service.restart`, `ops.service.deploy`,
//!   `ops.service.maintenance`, `ops.timeline.note`
//! - `tests.list`, `tests.run`
//! - `trace.echo`, `trace.ping`, `trace.stats`, `trace.clear`
//!
//! ## Resources
//!
//! - `ops/overview`, `ops/service/{id}`, `ops/timeline`, `ops/runbook/{topic}`
//! - `trace/logs`, `trace/logs/markdown`
//! - `tests/catalog`, `tests/plan/{name}`

pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod resources;
pub mod standard;

pub use context::OpsContext;
pub use dispatcher::{HealthSummary, OpsDispatcher};
pub use registry::{ActionRegistry, InMemoryActionRegistry};
pub use resources::ResourceCatalog;

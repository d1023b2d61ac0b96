//! # Opsdeck Ops
//!
//! The service registry: a small in-memory table of service records whose
//! mutations (restart, deploy, maintenance) are applied atomically and
//! audited on a bounded timeline, plus the static runbooks and markdown
//! reports operators read alongside it.
//!
//! ```rust
//! use opsdeck_ops::{ServiceRegistry, ServiceStatus};
//!
//! let registry = ServiceRegistry::seeded();
//! let result = registry.restart("web").unwrap();
//! assert_eq!(result.service.unwrap().status, ServiceStatus::Running);
//! assert!(registry.restart("ghost").is_err());
//! ```

pub mod registry;
pub mod report;
pub mod runbook;
pub mod service;

pub use registry::{DEFAULT_LATEST_EVENTS, ServiceRegistry, TIMELINE_CAPACITY};
pub use service::{OpsActionResult, OpsEvent, OpsService, ServiceNotFound, ServiceStatus};

//! Service records and mutation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Operational status of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Running,
    Degraded,
    Maintenance,
}

impl ServiceStatus {
    /// Status a service settles into after an operator action.
    pub fn settled(in_maintenance: bool) -> Self {
        if in_maintenance {
            ServiceStatus::Maintenance
        } else {
            ServiceStatus::Running
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Running => "running",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A managed service. Values handed out by the registry are snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpsService {
    pub id: String,
    pub name: String,
    pub version: String,
    pub status: ServiceStatus,
    pub in_maintenance: bool,
    pub instances: u32,
    pub latency_ms: f64,
    pub errors_last_hour: u32,
    pub last_action: DateTime<Utc>,
}

impl OpsService {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        status: ServiceStatus,
        instances: u32,
        latency_ms: f64,
        errors_last_hour: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            in_maintenance: status == ServiceStatus::Maintenance,
            status,
            instances,
            latency_ms,
            errors_last_hour,
            last_action: Utc::now(),
        }
    }
}

/// An audit record on the registry timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpsEvent {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl OpsEvent {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            text: text.into(),
        }
    }
}

/// Outcome of a successful registry mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpsActionResult {
    pub message: String,
    /// Snapshot of the service after the mutation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<OpsService>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline_event: Option<OpsEvent>,
}

/// The requested service id is blank or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Service '{id}' not found.")]
pub struct ServiceNotFound {
    pub id: String,
}

impl ServiceNotFound {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

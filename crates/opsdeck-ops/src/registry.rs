//! The service registry.
//!
//! One mutex guards both the service table and the timeline, so a mutation
//! and its audit event become visible together and concurrent mutations of
//! the same service are applied one after the other.

use crate::runbook;
use crate::service::{OpsActionResult, OpsEvent, OpsService, ServiceNotFound, ServiceStatus};
use chrono::Utc;
use opsdeck_core::{BoundedBuffer, NormalizedKey};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Number of audit events the timeline retains.
pub const TIMELINE_CAPACITY: usize = 30;

/// Events shown when a caller does not ask for a specific count.
pub const DEFAULT_LATEST_EVENTS: usize = 8;

const RESTART_ERROR_FACTOR: f64 = 0.45;
const RESTART_LATENCY_FACTOR: f64 = 0.82;
const MIN_LATENCY_MS: f64 = 18.0;

#[derive(Debug)]
struct RegistryState {
    services: HashMap<NormalizedKey, OpsService>,
    timeline: BoundedBuffer<OpsEvent>,
}

impl RegistryState {
    fn append(&mut self, text: impl Into<String>) -> OpsEvent {
        let event = OpsEvent::now(text);
        self.timeline.push(event.clone());
        event
    }
}

/// Thread-safe table of managed services with an audit timeline.
///
/// Construct once at startup and share as `Arc<ServiceRegistry>`.
#[derive(Debug)]
pub struct ServiceRegistry {
    state: Mutex<RegistryState>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ServiceRegistry {
    /// Registry holding `services` and an empty timeline.
    ///
    /// Later services replace earlier ones with the same normalized id.
    pub fn new(services: impl IntoIterator<Item = OpsService>) -> Self {
        let services = services
            .into_iter()
            .filter_map(|mut service| {
                let key = NormalizedKey::parse(&service.id)?;
                service.id = key.as_str().to_string();
                Some((key, service))
            })
            .collect();

        Self {
            state: Mutex::new(RegistryState {
                services,
                timeline: BoundedBuffer::new(TIMELINE_CAPACITY),
            }),
        }
    }

    /// The demo fleet plus three startup events.
    pub fn seeded() -> Self {
        let registry = Self::new([
            OpsService::new("web", "ASP.NET Frontend", "9.0.0-preview1", ServiceStatus::Degraded, 3, 148.0, 5),
            OpsService::new("worker", "Background Worker (Hangfire)", "1.12.0", ServiceStatus::Running, 4, 64.0, 1),
            OpsService::new("nuget", "Private NuGet Feed", "2025.11", ServiceStatus::Running, 2, 32.0, 0),
            OpsService::new("build", "Build Agent", "2.1.7", ServiceStatus::Maintenance, 1, 95.0, 0),
            OpsService::new("tests", "Integration Test Runner", "0.8.4", ServiceStatus::Degraded, 1, 220.0, 8),
        ]);

        {
            let mut state = registry.lock();
            state.append("opsdeck started (manual operations, no model in the loop).");
            state.append("Status report: frontend degraded, integration tests flaky, build agent in maintenance.");
            state.append(format!("Runbooks loaded: {}.", runbook::TOPICS.join(", ")));
        }
        registry
    }

    // Every mutation completes its writes before releasing the guard, so a
    // poisoned lock never exposes a half-applied change.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `mutate` to the service under the registry lock.
    ///
    /// `mutate` returns `(message, event text)`; the event is appended in the
    /// same critical section.
    fn mutate<F>(&self, id: &str, mutate: F) -> Result<OpsActionResult, ServiceNotFound>
    where
        F: FnOnce(&mut OpsService) -> (String, String),
    {
        let key = NormalizedKey::parse(id).ok_or_else(|| ServiceNotFound::new(id))?;

        let mut state = self.lock();
        let service = state
            .services
            .get_mut(&key)
            .ok_or_else(|| ServiceNotFound::new(id))?;

        let (message, event_text) = mutate(service);
        service.last_action = Utc::now();
        let snapshot = service.clone();
        let event = state.append(event_text);

        Ok(OpsActionResult {
            message,
            service: Some(snapshot),
            timeline_event: Some(event),
        })
    }

    /// All services, sorted case-insensitively by display name.
    pub fn list(&self) -> Vec<OpsService> {
        let mut services: Vec<OpsService> = self.lock().services.values().cloned().collect();
        services.sort_by_cached_key(|s| s.name.to_lowercase());
        services
    }

    pub fn get(&self, id: &str) -> Option<OpsService> {
        let key = NormalizedKey::parse(id)?;
        self.lock().services.get(&key).cloned()
    }

    /// Restart a service: clears degraded status and sheds error load.
    pub fn restart(&self, id: &str) -> Result<OpsActionResult, ServiceNotFound> {
        let result = self.mutate(id, |service| {
            service.status = ServiceStatus::settled(service.in_maintenance);
            service.errors_last_hour =
                (f64::from(service.errors_last_hour) * RESTART_ERROR_FACTOR).round() as u32;
            let latency = (service.latency_ms * RESTART_LATENCY_FACTOR * 10.0).round_ties_even() / 10.0;
            service.latency_ms = latency.max(MIN_LATENCY_MS);

            (
                format!(
                    "Restart of {} complete. Error load reduced, status back to {}.",
                    service.name, service.status
                ),
                format!("Restart confirmed for {}.", service.name),
            )
        });

        if let Ok(OpsActionResult {
            service: Some(service),
            ..
        }) = &result
        {
            info!(
                service_id = %service.id,
                errors = service.errors_last_hour,
                latency_ms = service.latency_ms,
                "Service restarted"
            );
        }
        result
    }

    /// Mark a deployment of `version`. A blank version is rejected the same
    /// way as an unknown service.
    pub fn deploy(
        &self,
        id: &str,
        version: &str,
        note: Option<&str>,
    ) -> Result<OpsActionResult, ServiceNotFound> {
        let version = version.trim();
        if version.is_empty() {
            return Err(ServiceNotFound::new(id));
        }
        let note = note.map(str::trim).filter(|n| !n.is_empty());

        let result = self.mutate(id, |service| {
            let previous = std::mem::replace(&mut service.version, version.to_string());
            service.status = ServiceStatus::settled(service.in_maintenance);
            service.errors_last_hour = service.errors_last_hour.saturating_sub(1);

            let mut message = format!(
                "Deployment {} for {} marked (previously {}).",
                service.version, service.name, previous
            );
            if let Some(note) = note {
                message.push_str(&format!(" Note: {}", note));
            }
            (message.clone(), message)
        });

        if result.is_ok() {
            info!(service_id = %id.trim(), version = %version, "Deployment marked");
        }
        result
    }

    pub fn toggle_maintenance(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<OpsActionResult, ServiceNotFound> {
        let result = self.mutate(id, |service| {
            service.in_maintenance = enabled;
            service.status = ServiceStatus::settled(enabled);
            (
                format!(
                    "Maintenance mode for {} is now {}.",
                    service.name,
                    if enabled { "on" } else { "off" }
                ),
                format!("Maintenance flag for {} set to {}.", service.name, enabled),
            )
        });

        if result.is_ok() {
            info!(service_id = %id.trim(), enabled, "Maintenance toggled");
        }
        result
    }

    /// Append a free-form note to the timeline. Always succeeds.
    pub fn record_note(&self, text: &str, actor: Option<&str>) -> OpsActionResult {
        let text = match text.trim() {
            "" => "(empty note)",
            trimmed => trimmed,
        };
        let text = match actor.map(str::trim).filter(|a| !a.is_empty()) {
            Some(actor) => format!("{}: {}", actor, text),
            None => text.to_string(),
        };

        let event = self.lock().append(text);
        debug!(note = %event.text, "Timeline note recorded");
        OpsActionResult {
            message: "Timeline updated.".to_string(),
            service: None,
            timeline_event: Some(event),
        }
    }

    /// Up to `n` timeline events, newest first.
    pub fn latest_events(&self, n: usize) -> Vec<OpsEvent> {
        self.lock().timeline.latest(n)
    }

    /// Runbook text for a topic, or a descriptive message if unknown.
    pub fn runbook(&self, topic: &str) -> String {
        runbook::render(topic)
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.lock().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().services.is_empty()
    }

    /// Number of events currently on the timeline.
    pub fn event_count(&self) -> usize {
        self.lock().timeline.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_registry() {
        let registry = ServiceRegistry::seeded();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.event_count(), 3);

        let names: Vec<_> = registry.list().into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "ASP.NET Frontend",
                "Background Worker (Hangfire)",
                "Build Agent",
                "Integration Test Runner",
                "Private NuGet Feed",
            ]
        );

        let build = registry.get("BUILD").unwrap();
        assert!(build.in_maintenance);
        assert_eq!(build.status, ServiceStatus::Maintenance);
    }

    #[test]
    fn test_restart_applies_constants() {
        let registry = ServiceRegistry::seeded();
        let result = registry.restart("web").unwrap();
        let web = result.service.unwrap();
        assert_eq!(web.status, ServiceStatus::Running);
        // round(5 * 0.45) = round(2.25) = 2
        assert_eq!(web.errors_last_hour, 2);
        // 148 * 0.82 = 121.36
        assert!((web.latency_ms - 121.4).abs() < 1e-9);
        assert_eq!(result.timeline_event.unwrap().text, "Restart confirmed for ASP.NET Frontend.");
        assert!(result.message.contains("status back to running"));
        assert_eq!(registry.event_count(), 4);
    }

    #[test]
    fn test_restart_twice_and_latency_floor() {
        let registry = ServiceRegistry::seeded();
        registry.restart("web").unwrap();
        let web = registry.restart("web").unwrap().service.unwrap();
        // round(2 * 0.45) = round(0.9) = 1
        assert_eq!(web.errors_last_hour, 1);
        assert_eq!(registry.event_count(), 5);

        for _ in 0..20 {
            registry.restart("nuget").unwrap();
        }
        let nuget = registry.get("nuget").unwrap();
        assert_eq!(nuget.latency_ms, MIN_LATENCY_MS);
        assert_eq!(nuget.errors_last_hour, 0);
    }

    #[test]
    fn test_restart_respects_maintenance() {
        let registry = ServiceRegistry::seeded();
        let build = registry.restart("build").unwrap().service.unwrap();
        assert_eq!(build.status, ServiceStatus::Maintenance);
        assert!(build.in_maintenance);
    }

    #[test]
    fn test_unknown_service_changes_nothing() {
        let registry = ServiceRegistry::seeded();
        let before = registry.list();

        assert_eq!(registry.restart("ghost").unwrap_err(), ServiceNotFound::new("ghost"));
        assert!(registry.restart("  ").is_err());
        assert!(registry.deploy("ghost", "1.0", None).is_err());
        assert!(registry.toggle_maintenance("", true).is_err());

        assert_eq!(registry.list(), before);
        assert_eq!(registry.event_count(), 3);
    }

    #[test]
    fn test_deploy() {
        let registry = ServiceRegistry::seeded();
        let result = registry
            .deploy("nuget", " 2025.11.1-hotfix ", Some(" cache fix "))
            .unwrap();
        let nuget = result.service.unwrap();
        assert_eq!(nuget.version, "2025.11.1-hotfix");
        assert_eq!(nuget.errors_last_hour, 0);
        assert_eq!(
            result.message,
            "Deployment 2025.11.1-hotfix for Private NuGet Feed marked (previously 2025.11). Note: cache fix"
        );

        let latest = &registry.latest_events(1)[0];
        assert!(latest.text.contains("2025.11.1-hotfix"));
        assert!(latest.text.contains("cache fix"));
    }

    #[test]
    fn test_deploy_blank_version_is_not_found() {
        let registry = ServiceRegistry::seeded();
        assert!(registry.deploy("web", "   ", None).is_err());
        assert_eq!(registry.get("web").unwrap().version, "9.0.0-preview1");
        assert_eq!(registry.event_count(), 3);
    }

    #[test]
    fn test_toggle_maintenance() {
        let registry = ServiceRegistry::seeded();
        let result = registry.toggle_maintenance("worker", true).unwrap();
        let worker = result.service.unwrap();
        assert!(worker.in_maintenance);
        assert_eq!(worker.status, ServiceStatus::Maintenance);
        assert_eq!(result.message, "Maintenance mode for Background Worker (Hangfire) is now on.");

        let build = registry.toggle_maintenance("build", false).unwrap().service.unwrap();
        assert!(!build.in_maintenance);
        assert_eq!(build.status, ServiceStatus::Running);
    }

    #[test]
    fn test_record_note() {
        let registry = ServiceRegistry::seeded();
        let blank = registry.record_note("  ", None);
        assert_eq!(blank.timeline_event.unwrap().text, "(empty note)");
        assert!(blank.service.is_none());

        let signed = registry.record_note(" rollback done ", Some(" alice "));
        assert_eq!(signed.timeline_event.unwrap().text, "alice: rollback done");
        assert_eq!(signed.message, "Timeline updated.");
    }

    #[test]
    fn test_timeline_is_bounded_and_newest_first() {
        let registry = ServiceRegistry::seeded();
        for i in 0..40 {
            registry.record_note(&format!("note {}", i), None);
        }
        assert_eq!(registry.event_count(), TIMELINE_CAPACITY);

        let latest = registry.latest_events(DEFAULT_LATEST_EVENTS);
        assert_eq!(latest.len(), DEFAULT_LATEST_EVENTS);
        assert_eq!(latest[0].text, "note 39");
        assert_eq!(latest[7].text, "note 32");
        assert_eq!(registry.latest_events(100).len(), TIMELINE_CAPACITY);
    }

    #[test]
    fn test_runbook_delegates() {
        let registry = ServiceRegistry::seeded();
        assert!(registry.runbook("tests-red-green").contains("Green Again"));
        assert_eq!(registry.runbook(""), "Topic missing.");
    }

    #[test]
    fn test_new_normalizes_ids() {
        let registry = ServiceRegistry::new([
            OpsService::new(" Api ", "API", "1.0", ServiceStatus::Running, 1, 10.0, 0),
            OpsService::new("   ", "Nameless", "1.0", ServiceStatus::Running, 1, 10.0, 0),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("api").unwrap().id, "api");
        assert_eq!(registry.event_count(), 0);
    }
}

//! Markdown reports over registry snapshots.

use crate::registry::ServiceRegistry;
use crate::runbook;
use crate::service::{OpsEvent, OpsService};
use std::fmt::Write;

fn maintenance_suffix(service: &OpsService) -> &'static str {
    if service.in_maintenance { " (maintenance)" } else { "" }
}

/// Fleet overview with a quick-start section.
pub fn overview(services: &[OpsService]) -> String {
    let mut out = String::new();
    out.push_str("# Ops Overview\n");
    out.push_str("Every action here is triggered deliberately by an operator or host.\n\n");
    out.push_str("## Services\n");
    for s in services {
        let _ = writeln!(out, "- **{}** (`{}`){}", s.name, s.id, maintenance_suffix(s));
        let _ = writeln!(
            out,
            "  - Status: {}, Version: {}, Instances: {}",
            s.status, s.version, s.instances
        );
        let _ = writeln!(
            out,
            "  - Latency: {:.1} ms, Errors/h: {}",
            s.latency_ms, s.errors_last_hour
        );
    }

    out.push_str("\n## Quick start\n");
    out.push_str("- Resources: `ops/overview`, `ops/service/{id}`, `ops/runbook/{topic}`, `ops/timeline`\n");
    out.push_str("- Actions: `ops.services.list`, `ops.service.restart`, `ops.service.deploy`, `ops.service.maintenance`, `ops.timeline.note`\n");
    out.push_str("\n## Runbooks\n");
    for topic in runbook::TOPICS {
        let _ = writeln!(out, "- `{}`", topic);
    }
    out
}

/// Detail view of one service, or a not-found line.
pub fn service_detail(id: &str, service: Option<&OpsService>) -> String {
    let Some(s) = service else {
        return format!("Service '{}' not found.", id);
    };

    let mut out = String::new();
    let _ = writeln!(out, "# {} (`{}`){}", s.name, s.id, maintenance_suffix(s));
    let _ = writeln!(out, "Status: {}", s.status);
    let _ = writeln!(out, "Version: {}", s.version);
    let _ = writeln!(out, "Instances: {}", s.instances);
    let _ = writeln!(out, "Latency: {:.1} ms", s.latency_ms);
    let _ = writeln!(out, "Errors last hour: {}", s.errors_last_hour);
    let _ = writeln!(
        out,
        "Last action (UTC): {}",
        s.last_action.format("%Y-%m-%d %H:%M:%SZ")
    );
    out.push_str("\nNext steps:\n");
    out.push_str("- Call `ops.service.restart` or `ops.service.deploy`\n");
    out.push_str("- Read a runbook: `ops/runbook/restart-service`\n");
    out.push_str("- Re-read this resource to confirm the result\n");
    out
}

/// Timeline listing, newest first.
pub fn timeline(events: &[OpsEvent]) -> String {
    let mut out = String::from("# Timeline\n");
    for e in events {
        let _ = writeln!(out, "- {} UTC: {}", e.timestamp.format("%H:%M:%S"), e.text);
    }
    if events.is_empty() {
        out.push_str("(no entries)\n");
    }
    out
}

impl ServiceRegistry {
    /// [`overview`] of the current fleet.
    pub fn overview_report(&self) -> String {
        overview(&self.list())
    }

    /// [`service_detail`] for `id`.
    pub fn service_report(&self, id: &str) -> String {
        service_detail(id, self.get(id).as_ref())
    }

    /// [`timeline`] of the latest `n` events.
    pub fn timeline_report(&self, n: usize) -> String {
        timeline(&self.latest_events(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DEFAULT_LATEST_EVENTS;

    #[test]
    fn test_overview_lists_every_service() {
        let registry = ServiceRegistry::seeded();
        let report = registry.overview_report();
        assert!(report.starts_with("# Ops Overview"));
        assert!(report.contains("- **Build Agent** (`build`) (maintenance)"));
        assert!(report.contains("Latency: 148.0 ms, Errors/h: 5"));
        assert!(report.contains("`fix-nullable-storm`"));
    }

    #[test]
    fn test_service_report() {
        let registry = ServiceRegistry::seeded();
        let report = registry.service_report("Tests");
        assert!(report.starts_with("# Integration Test Runner (`tests`)"));
        assert!(report.contains("Status: degraded"));
        assert!(report.contains("Errors last hour: 8"));
        assert_eq!(registry.service_report("ghost"), "Service 'ghost' not found.");
    }

    #[test]
    fn test_timeline_report() {
        let registry = ServiceRegistry::seeded();
        registry.record_note("hello", None);
        let report = registry.timeline_report(DEFAULT_LATEST_EVENTS);
        let first_item = report.lines().nth(1).unwrap();
        assert!(first_item.ends_with("UTC: hello"));
        assert_eq!(timeline(&[]), "# Timeline\n(no entries)\n");
    }
}

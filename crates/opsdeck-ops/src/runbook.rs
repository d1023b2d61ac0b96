//! Static operator runbooks.
//!
//! Runbooks are markdown checklists that reference the actions and
//! resources operators drive by hand. They never change at runtime.

use opsdeck_core::NormalizedKey;

const RESTART_SERVICE: &str = "\
# Runbook: Restart Service
Goal: restart a service cleanly.
1. Call `ops.services.list` and check the current status.
2. Optionally enable maintenance with `ops.service.maintenance`.
3. Trigger the restart with `ops.service.restart` and the serviceId.
4. Read `ops/service/{id}` and keep an eye on the timeline.
5. Disable maintenance again if you enabled it.
";

const DEPLOY_BLUE_GREEN: &str = "\
# Runbook: Deploy (Blue/Green light)
Goal: mark a small deployment using actions only.
- Read `ops/overview` for the baseline.
- Set the version with `ops.service.deploy` (e.g. 1.4.3-pre).
- Check `ops/service/{id}` to confirm the status stays stable.
- Optionally add a timeline note with `ops.timeline.note`.
";

const INCIDENT_FIRST_RESPONSE: &str = "\
# Runbook: Incident First Response
Goal: walk through a manual first response.
1. Check status via `ops/overview` and `ops/timeline`.
2. Identify affected services with `ops.services.list`.
3. Read details via `ops/service/{id}` (watch the error load).
4. Enable maintenance if needed: `ops.service.maintenance`.
5. Restart or deploy, and document it as a note.
6. Write a closing note with `ops.timeline.note`.
";

const FIX_NULLABLE_STORM: &str = "\
# Runbook: Contain a Nullable Warning Storm
Goal: manage a CS8618/CS8602 flood without alarming the team.
1. Read `ops/service/web`: is the frontend tree on fire?
2. Enable maintenance for `build` if needed (`ops.service.maintenance`).
3. Use `ops.service.restart` on `tests` to kill stale processes.
4. Record a new version with `ops.service.deploy` and the note \"nullable cleanup\".
5. Leave a timeline note: \"CS8618 postponed\".
";

const NUGET_CACHE_PANIC: &str = "\
# Runbook: NuGet Cache Panic
Goal: calm the private feed when restore fails during standup.
1. Read `ops/service/nuget` and check whether latency is climbing.
2. Mark a deployment for `nuget` (e.g. version 2025.11.1-hotfix).
3. Timeline note: \"try dotnet restore locally with --disable-parallel\".
4. Then check `ops.services.list` and disable maintenance for `build` if set.
";

const TESTS_RED_GREEN: &str = "\
# Runbook: Get the Tests Green Again
Goal: harden the integration tests.
1. Read `ops/service/tests` and note the error rate.
2. Run `ops.service.restart` for `tests` (dotnet test sometimes hangs).
3. If the frontend is flaky: `ops.service.deploy` for `web` with tag \"retry-logging\".
4. Add a timeline note with the ticket reference.
5. Read `ops/service/tests` again after two minutes.
";

/// Known topics, in listing order.
pub const TOPICS: [&str; 6] = [
    "restart-service",
    "deploy-blue-green",
    "incident-first-response",
    "fix-nullable-storm",
    "nuget-cache-panic",
    "tests-red-green",
];

/// Runbook text for an already-normalized topic.
pub fn lookup(topic: &NormalizedKey) -> Option<&'static str> {
    match topic.as_str() {
        "restart-service" => Some(RESTART_SERVICE),
        "deploy-blue-green" => Some(DEPLOY_BLUE_GREEN),
        "incident-first-response" => Some(INCIDENT_FIRST_RESPONSE),
        "fix-nullable-storm" => Some(FIX_NULLABLE_STORM),
        "nuget-cache-panic" => Some(NUGET_CACHE_PANIC),
        "tests-red-green" => Some(TESTS_RED_GREEN),
        _ => None,
    }
}

/// Runbook text for a caller-supplied topic.
///
/// Never fails: a blank topic and an unknown topic both produce a
/// descriptive message instead.
pub fn render(topic: &str) -> String {
    let Some(key) = NormalizedKey::parse(topic) else {
        return "Topic missing.".to_string();
    };
    match lookup(&key) {
        Some(text) => text.to_string(),
        None => format!(
            "No runbook for '{}'. Available: {}",
            topic,
            TOPICS.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_topic_resolves() {
        for topic in TOPICS {
            let key = NormalizedKey::parse(topic).unwrap();
            assert!(lookup(&key).unwrap().starts_with("# Runbook:"));
        }
    }

    #[test]
    fn test_render_normalizes_topic() {
        assert!(render("  Restart-Service ").contains("Restart Service"));
    }

    #[test]
    fn test_render_fallbacks() {
        assert_eq!(render("   "), "Topic missing.");
        let unknown = render("reboot-universe");
        assert!(unknown.starts_with("No runbook for 'reboot-universe'."));
        assert!(unknown.contains("nuget-cache-panic"));
    }
}

//! Runner configuration.

use std::env;
use std::time::Duration;

/// Target probed when nothing overrides it.
pub const DEFAULT_TARGET: &str = "https://news.google.com";

/// Environment variable consulted for a target override.
pub const TARGET_ENV_VAR: &str = "TESTPLAN_TARGET_URL";

/// User agent sent with every probe.
pub const USER_AGENT: &str = "opsdeck-testplan/1.0";

/// Accept header sent with every probe.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_MAX_BODY_CHARS: usize = 12_000;
pub const DEFAULT_MAX_DETAILS_CHARS: usize = 400;

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub default_target: String,
    pub target_env_var: String,
    /// Takes precedence over the environment when set.
    pub target_override: Option<String>,
    pub request_timeout: Duration,
    /// Longest body kept by `content-fetch`.
    pub max_body_chars: usize,
    /// Longest `details` text kept per step.
    pub max_details_chars: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            default_target: DEFAULT_TARGET.to_string(),
            target_env_var: TARGET_ENV_VAR.to_string(),
            target_override: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            max_details_chars: DEFAULT_MAX_DETAILS_CHARS,
        }
    }
}

impl RunnerConfig {
    pub fn with_target_override(mut self, target: impl Into<String>) -> Self {
        self.target_override = Some(target.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_body_chars(mut self, max: usize) -> Self {
        self.max_body_chars = max;
        self
    }

    /// Target for a run: explicit override, then the environment, then the
    /// default. Blank values are skipped.
    pub fn resolve_target(&self) -> String {
        let non_blank = |value: &str| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        self.target_override
            .as_deref()
            .and_then(non_blank)
            .or_else(|| {
                env::var(&self.target_env_var)
                    .ok()
                    .and_then(|v| non_blank(&v))
            })
            .unwrap_or_else(|| self.default_target.clone())
    }
}

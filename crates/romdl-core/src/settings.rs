//! Runtime settings resolved from the environment.
//!
//! Pure domain types; the binary is responsible for loading `.env` first.

use std::time::Duration;

use tracing::warn;

use crate::rate_limit::RateLimitSpec;

/// Default Progress Streamer cadence.
pub const DEFAULT_STREAM_INTERVAL_MS: u64 = 500;

/// Default hosts routed to the account-gated transfer strategy.
pub const DEFAULT_GATED_HOSTS: &[&str] = &["1fichier.com"];

pub const API_KEY_ENV: &str = "ROMDL_API_KEY";
pub const RATE_LIMIT_ENV: &str = "ROMDL_RATE_LIMIT";
pub const STREAM_INTERVAL_ENV: &str = "ROMDL_STREAM_INTERVAL_MS";
pub const GATED_HOSTS_ENV: &str = "ROMDL_GATED_HOSTS";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Shared secret; `None` disables authentication.
    pub api_key: Option<String>,
    pub rate_limit: RateLimitSpec,
    pub stream_interval: Duration,
    pub gated_hosts: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Settings {
    /// Settings with authentication and rate limiting disabled.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            api_key: None,
            rate_limit: RateLimitSpec::DISABLED,
            stream_interval: Duration::from_millis(DEFAULT_STREAM_INTERVAL_MS),
            gated_hosts: DEFAULT_GATED_HOSTS.iter().map(|h| (*h).to_string()).collect(),
        }
    }

    /// Read settings from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::with_defaults();

        settings.api_key = lookup(API_KEY_ENV)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if let Some(raw) = lookup(RATE_LIMIT_ENV) {
            settings.rate_limit = RateLimitSpec::parse(&raw);
            if !raw.trim().is_empty() && !settings.rate_limit.is_enabled() {
                warn!(value = %raw, "ignoring unparsable {RATE_LIMIT_ENV}");
            }
        }

        if let Some(raw) = lookup(STREAM_INTERVAL_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => settings.stream_interval = Duration::from_millis(ms),
                _ => warn!(value = %raw, "ignoring invalid {STREAM_INTERVAL_ENV}"),
            }
        }

        if let Some(raw) = lookup(GATED_HOSTS_ENV) {
            settings.gated_hosts = raw
                .split(',')
                .map(|h| h.trim().to_lowercase())
                .filter(|h| !h.is_empty())
                .collect();
        }

        settings
    }

    #[must_use]
    pub const fn auth_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

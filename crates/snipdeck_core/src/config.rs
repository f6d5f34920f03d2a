//! Configuration loading from environment variables.

use crate::constants::{
    API_BASE_URL_ENV, DEFAULT_API_BASE_URL, DEFAULT_TIMEOUT_SECS, SYNC_PERF_LOG_ENV,
    TIMEOUT_SECS_ENV,
};
use std::env;
use std::time::Duration;

/// Runtime configuration for store clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Store base URL; the collection lives at `{api_base_url}/snippets`.
    pub api_base_url: String,
    pub timeout: Duration,
    pub sync_perf_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sync_perf_log: false,
        }
    }
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` for a recognized value, `None` otherwise.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// # Arguments
/// - `name`: Environment variable name.
///
/// # Returns
/// `true` only for a truthy value; missing or unrecognized is `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Trim whitespace and trailing slashes from a base URL.
pub fn trim_base_url(value: &str) -> String {
    value.trim().trim_end_matches('/').to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Blank or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let api_base_url = env::var(API_BASE_URL_ENV)
            .ok()
            .map(|value| trim_base_url(&value))
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_base_url);
        let timeout = env::var(TIMEOUT_SECS_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_base_url,
            timeout,
            sync_perf_log: env_flag_enabled(SYNC_PERF_LOG_ENV),
        }
    }

    /// Replace the base URL, ignoring blank overrides.
    ///
    /// # Arguments
    /// - `base_url`: Override to apply; trimmed like environment values.
    ///
    /// # Returns
    /// The updated config.
    pub fn with_base_url(mut self, base_url: Option<&str>) -> Self {
        if let Some(base) = base_url.map(trim_base_url).filter(|v| !v.is_empty()) {
            self.api_base_url = base;
        }
        self
    }
}

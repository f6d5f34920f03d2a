//! Shared constants used across snipdeck crates.

/// Default base URL of the remote snippet store.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Path segment of the snippet collection below the base URL.
pub const SNIPPETS_COLLECTION: &str = "snippets";

/// Default transport timeout for store requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the store base URL.
pub const API_BASE_URL_ENV: &str = "SNIPDECK_API_BASE_URL";
/// Environment variable holding the transport timeout in seconds.
pub const TIMEOUT_SECS_ENV: &str = "SNIPDECK_TIMEOUT_SECS";
/// Boolean flag enabling the structured sync perf log.
pub const SYNC_PERF_LOG_ENV: &str = "SNIPDECK_SYNC_PERF_LOG";

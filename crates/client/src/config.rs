//! Environment-driven client configuration

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_DATA_DIR: &str = ".urquest-data";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_NOTIFY_TTL_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without trailing slash
    pub api_base_url: String,
    /// Where the session blob lives
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    /// Auto-dismiss hint attached to notices
    pub notify_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            notify_ttl: Duration::from_millis(DEFAULT_NOTIFY_TTL_MS),
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Durations must be positive; zero or garbage falls back to `default`
fn env_u64(name: &str, default: u64) -> u64 {
    positive_or(env_string(name).as_deref(), default)
}

fn positive_or(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|raw| raw.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}

impl ClientConfig {
    /// Read `URQUEST_*` variables, falling back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_string("URQUEST_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }
        if let Some(dir) = env_string("URQUEST_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config.request_timeout = Duration::from_secs(env_u64(
            "URQUEST_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        ));
        config.notify_ttl =
            Duration::from_millis(env_u64("URQUEST_NOTIFY_TTL_MS", DEFAULT_NOTIFY_TTL_MS));
        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

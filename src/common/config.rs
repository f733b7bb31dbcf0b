use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// What the controller does with the connection indicator when an upload fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadFailurePolicy {
    /// Any failed upload is treated as the backend being unreachable.
    #[default]
    MarkDisconnected,
    /// Upload failures leave the connection state alone.
    KeepConnection,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub create_notebook: bool,
    pub upload_failure_policy: UploadFailurePolicy,
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            create_notebook: true,
            upload_failure_policy: UploadFailurePolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let disconnect = lookup("DISCONNECT_ON_UPLOAD_FAILURE")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);
        Self {
            api_url: lookup("API_URL")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_url),
            request_timeout: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            create_notebook: lookup("CREATE_NOTEBOOK")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.create_notebook),
            upload_failure_policy: if disconnect {
                UploadFailurePolicy::MarkDisconnected
            } else {
                UploadFailurePolicy::KeepConnection
            },
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

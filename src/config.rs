//! Client configuration.
//!
//! Built from defaults, optionally overridden by `HAI_*` environment variables
//! or the builder methods.
//!
//! # Example
//!
//! ```ignore
//! use hai::config::ClientConfig;
//!
//! let config = ClientConfig::from_env().with_poll_interval(Duration::from_secs(1));
//! ```

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::adapters::{FileTokenStore, ReqwestHttpClient};
use crate::backend::DEFAULT_BASE_URL;
use crate::chat::{PollPolicy, DEFAULT_ANSWER_TIMEOUT, DEFAULT_POLL_INTERVAL};

pub const ENV_API_URL: &str = "HAI_API_URL";
pub const ENV_POLL_INTERVAL_SECS: &str = "HAI_POLL_INTERVAL_SECS";
pub const ENV_ANSWER_TIMEOUT_SECS: &str = "HAI_ANSWER_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "HAI_REQUEST_TIMEOUT_SECS";
pub const ENV_TOKEN_PATH: &str = "HAI_TOKEN_PATH";

/// Default per-request HTTP timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL (default: http://localhost:8000)
    pub api_url: String,
    /// Delay between answer polls (default: 2s)
    pub poll_interval: Duration,
    /// Time allowed for an answer after submission (default: 120s)
    pub answer_timeout: Duration,
    /// HTTP request timeout (default: 30s)
    pub request_timeout: Duration,
    /// Session file location; `None` means `~/.hai/.session.json`
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            answer_timeout: DEFAULT_ANSWER_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            token_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_answer_timeout(mut self, timeout: Duration) -> Self {
        self.answer_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = Some(path.into());
        self
    }

    /// Read overrides from the `HAI_*` environment variables.
    ///
    /// Unset or empty variables keep the default. Values that do not parse
    /// are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_url: get(ENV_API_URL)
                .map(|url| url.trim().to_string())
                .unwrap_or(defaults.api_url),
            poll_interval: parse_secs(ENV_POLL_INTERVAL_SECS, get(ENV_POLL_INTERVAL_SECS))
                .unwrap_or(defaults.poll_interval),
            answer_timeout: parse_secs(ENV_ANSWER_TIMEOUT_SECS, get(ENV_ANSWER_TIMEOUT_SECS))
                .unwrap_or(defaults.answer_timeout),
            request_timeout: parse_secs(ENV_REQUEST_TIMEOUT_SECS, get(ENV_REQUEST_TIMEOUT_SECS))
                .unwrap_or(defaults.request_timeout),
            token_path: get(ENV_TOKEN_PATH).map(PathBuf::from),
        }
    }

    /// Polling policy for the chat orchestrator.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: self.poll_interval,
            timeout: self.answer_timeout,
        }
    }

    /// Token store at the configured location.
    pub fn token_store(&self) -> FileTokenStore {
        match &self.token_path {
            Some(path) => FileTokenStore::with_path(path),
            None => FileTokenStore::new(),
        }
    }

    /// HTTP transport honouring the request timeout.
    pub fn http_client(&self) -> ReqwestHttpClient {
        ReqwestHttpClient::with_timeout(self.request_timeout)
    }
}

/// Parse a positive whole number of seconds.
fn parse_secs(key: &str, value: Option<String>) -> Option<Duration> {
    let value = value?;
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
        _ => {
            warn!("Ignoring invalid {}={:?}, using default", key, value);
            None
        }
    }
}

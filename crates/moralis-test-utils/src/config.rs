//! Configuration for the harness
//!
//! Values come from the environment, optionally seeded from a `.env` file.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Default provider endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://deep-index.moralis.io/api/v2.2";

/// Process-wide budget for a single request, mirroring the step timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Harness configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Provider base URL, as configured (normalized by the scenario context)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Static API key sent as `X-API-Key`; may be empty
    #[serde(default)]
    pub api_key: String,

    /// Timeout applied to every request
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,

    /// Directory holding `<name>.json` schema documents
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines instead of human readable ones
    #[serde(default)]
    pub json_logs: bool,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            request_timeout: default_request_timeout(),
            schema_dir: default_schema_dir(),
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl HarnessConfig {
    /// Load configuration from a `.env` file (when present) and the environment
    pub fn load() -> Self {
        if let Ok(path) = dotenv::dotenv() {
            info!("Loaded environment from {}", path.display());
        }
        Self::from_env()
    }

    /// Load configuration from the process environment only
    pub fn from_env() -> Self {
        // Start with defaults
        let mut config = Self::default();

        if let Ok(base_url) = env::var("MORALIS_API_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.api_base_url = base_url.trim().to_string();
            }
        }

        if let Ok(api_key) = env::var("MORALIS_API_KEY") {
            config.api_key = api_key;
        }

        if let Ok(timeout) = env::var("MORALIS_REQUEST_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.request_timeout = Duration::from_secs(secs);
            } else {
                warn!("Invalid MORALIS_REQUEST_TIMEOUT_SECS value: {}", timeout);
            }
        }

        if let Ok(schema_dir) = env::var("MORALIS_SCHEMA_DIR") {
            config.schema_dir = PathBuf::from(schema_dir);
        }

        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Ok(format) = env::var("LOG_FORMAT") {
            config.json_logs = format.eq_ignore_ascii_case("json");
        }

        config
    }

    /// Override the schema directory
    pub fn with_schema_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.schema_dir = dir.into();
        self
    }

    /// Override the provider base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Build the HTTP client shared by every scenario
    pub fn http_client(&self) -> HarnessResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| HarnessError::Config(format!("Failed to build HTTP client: {e}")))
    }
}

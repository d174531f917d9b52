//! Per-scenario state.
//!
//! A [`ScenarioContext`] is created for every scenario and dropped when it
//! ends. Steps pass data to each other through its note store; the HTTP
//! wrapper fills its response slots; Then-steps record failures in its
//! soft-assertion collector.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::assertions::SoftAssert;
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::logging::ScenarioLogger;

/// Keys the wallet-history steps store notes under.
pub mod keys {
    /// Wallet address under test (string)
    pub const WALLET_ADDRESS: &str = "walletAddress";
    /// Chain identifier such as `eth` (string)
    pub const CHAIN: &str = "chain";
    /// Requested page size (integer)
    pub const LIMIT: &str = "limit";
    /// Lower block bound (integer)
    pub const FROM_BLOCK: &str = "fromBlock";
    /// Upper block bound (integer)
    pub const TO_BLOCK: &str = "toBlock";
    /// First transaction of a fetched page (transaction record)
    pub const FIRST_TRANSACTION: &str = "firstTransaction";
    /// Hash a tester wants to verify elsewhere (string)
    pub const TRANSACTION_HASH_FOR_VERIFICATION: &str = "transactionHashForVerification";
}

/// What was received for the last request.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl CapturedResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

/// Ensures the base URL ends with exactly one path separator.
pub fn normalize_base_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// State shared by the steps of one scenario
#[derive(Debug)]
pub struct ScenarioContext {
    pub api_base_url: String,
    pub api_key: String,
    pub last_response: Option<CapturedResponse>,
    pub last_request_description: Option<String>,
    pub response_body: Option<Value>,
    pub soft_assert: SoftAssert,
    pub logger: ScenarioLogger,
    http: reqwest::Client,
    notes: HashMap<String, Value>,
}

impl ScenarioContext {
    /// Create a fresh context from process-wide configuration
    pub fn new(config: &HarnessConfig, http: reqwest::Client) -> Self {
        let logger = ScenarioLogger::new();
        if config.api_key.is_empty() {
            logger.warn("MORALIS_API_KEY not set. Please set it in your environment variables.");
        }

        Self {
            api_base_url: normalize_base_url(&config.api_base_url),
            api_key: config.api_key.clone(),
            last_response: None,
            last_request_description: None,
            response_body: None,
            soft_assert: SoftAssert::new(),
            logger,
            http,
            notes: HashMap::new(),
        }
    }

    /// Tag the context's logger with the running scenario
    pub fn with_scenario(mut self, name: impl Into<String>) -> Self {
        self.set_scenario(name);
        self
    }

    pub fn set_scenario(&mut self, name: impl Into<String>) {
        self.logger = ScenarioLogger::for_scenario(name);
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Store a note, replacing any previous value under `key`
    pub fn set_note<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> HarnessResult<()> {
        self.notes.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Raw note value
    pub fn note(&self, key: &str) -> Option<&Value> {
        self.notes.get(key)
    }

    /// Note read back as `T`; `None` when absent, null, or of another shape
    pub fn note_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.notes
            .get(key)
            .filter(|value| !value.is_null())
            .and_then(|value| serde_json::from_value::<T>(value.clone()).ok())
    }

    pub fn has_note(&self, key: &str) -> bool {
        self.notes.get(key).is_some_and(|value| !value.is_null())
    }

    /// The last response, or a hard error when no request was made
    pub fn require_response(&self) -> HarnessResult<&CapturedResponse> {
        self.last_response
            .as_ref()
            .ok_or_else(|| HarnessError::missing("No response available. Please make a request first."))
    }

    /// The last parsed body, or a hard error when no request was made
    pub fn require_body(&self) -> HarnessResult<&Value> {
        self.response_body
            .as_ref()
            .ok_or_else(|| HarnessError::missing("No response data available. Please make a request first."))
    }
}

use thiserror::Error;

/// Error types for the harness.
///
/// Every variant is a hard error: it aborts the current step. Domain
/// validation failures never surface here, they go to [`crate::SoftAssert`].
#[derive(Debug, Error)]
pub enum HarnessError {
    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A step ran before the data it depends on was set up
    #[error("{0}")]
    MissingPrecondition(String),

    /// Schema file could not be loaded or compiled
    #[error("Schema error: {0}")]
    Schema(String),

    /// A numeric string could not be parsed
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    /// The response body does not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the crate.
pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    /// Shorthand for a missing-setup error.
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingPrecondition(message.into())
    }
}

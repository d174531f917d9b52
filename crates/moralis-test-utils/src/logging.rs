//! Structured logging using tracing.
//!
//! `init_logging` installs the process-wide subscriber once; `ScenarioLogger`
//! is the leveled logger each scenario owns, tagging every line with the
//! scenario it belongs to.

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::HarnessConfig;

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over the configured level. Calling this twice returns an
/// error from the second call.
pub fn init_logging(config: &HarnessConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_logs {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .try_init()
            .context("Failed to set global default subscriber")?;
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .context("Failed to set global default subscriber")?;
    }

    tracing::info!(
        log_format = if config.json_logs { "json" } else { "text" },
        "Logging initialized"
    );

    Ok(())
}

/// Leveled logger owned by one scenario.
#[derive(Debug, Clone, Default)]
pub struct ScenarioLogger {
    scenario: Option<String>,
}

impl ScenarioLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logger tagged with a scenario name.
    pub fn for_scenario(name: impl Into<String>) -> Self {
        Self {
            scenario: Some(name.into()),
        }
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    pub fn info(&self, message: impl AsRef<str>) {
        tracing::info!(scenario = self.scenario.as_deref().unwrap_or("-"), "{}", message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        tracing::warn!(scenario = self.scenario.as_deref().unwrap_or("-"), "{}", message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        tracing::error!(scenario = self.scenario.as_deref().unwrap_or("-"), "{}", message.as_ref());
    }
}

/// Trait to add log context to results
pub trait LogExt<T, E> {
    /// Log error with additional context before returning
    fn log_err(self, logger: &ScenarioLogger, message: &str) -> Result<T, E>;
}

impl<T, E: std::fmt::Display> LogExt<T, E> for Result<T, E> {
    fn log_err(self, logger: &ScenarioLogger, message: &str) -> Result<T, E> {
        if let Err(ref e) = self {
            logger.error(format!("{message}: {e}"));
        }
        self
    }
}

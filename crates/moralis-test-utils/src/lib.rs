//! Testing utilities for the Moralis wallet-history harness.
//!
//! This crate provides the pieces the BDD suite is assembled from: a
//! soft-assertion collector, blockchain format validators, the per-scenario
//! context, an HTTP request wrapper, wallet-history models, a JSON Schema
//! registry, configuration and logging setup.

pub mod assertions;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod schema;

/// Re-export commonly used types for convenience
pub use assertions::SoftAssert;
pub use client::{HttpRequest, RequestOptions};
pub use config::HarnessConfig;
pub use context::ScenarioContext;
pub use error::{HarnessError, HarnessResult};
pub use schema::SchemaRegistry;

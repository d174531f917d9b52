//! Assertion utilities for validating wallet-history responses.
//!
//! `soft` holds the collector that lets a scenario record every failure
//! instead of stopping at the first; `blockchain` holds the format checks
//! the step definitions feed into it.

pub mod blockchain;
mod soft;

pub use soft::*;

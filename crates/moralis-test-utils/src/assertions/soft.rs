//! Soft assertions.

use std::fmt;
use thiserror::Error;

/// Aggregated failure raised once per scenario by [`SoftAssert::throw_if_errors`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Soft assertion failures:\n{}", .0.join("\n"))]
pub struct SoftAssertionFailures(pub Vec<String>);

impl SoftAssertionFailures {
    /// The individual failure messages in the order they were recorded.
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Collects failure messages without interrupting the scenario.
///
/// The sequence is empty when a scenario starts and is drained exactly once
/// when it ends, either by [`throw_if_errors`](Self::throw_if_errors) or by
/// [`reset_errors`](Self::reset_errors).
#[derive(Debug, Default, Clone)]
pub struct SoftAssert {
    errors: Vec<String>,
}

impl SoftAssert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` when `condition` is false.
    pub fn assert_true(&mut self, condition: bool, message: impl Into<String>) {
        if !condition {
            self.errors.push(message.into());
        }
    }

    /// Records `message` when `condition` is true.
    pub fn assert_false(&mut self, condition: bool, message: impl Into<String>) {
        self.assert_true(!condition, message);
    }

    /// Records `message` with both values appended when they differ.
    pub fn assert_equals<T>(&mut self, actual: T, expected: T, message: impl fmt::Display)
    where
        T: PartialEq + fmt::Display,
    {
        if actual != expected {
            self.errors
                .push(format!("{message}. Expected: {expected}, Actual: {actual}"));
        }
    }

    /// Records `message` when `value` is `None`.
    pub fn assert_not_null<T>(&mut self, value: Option<T>, message: impl Into<String>) {
        self.assert_true(value.is_some(), message);
    }

    /// Records `message` when `value` is `Some`.
    pub fn assert_null<T>(&mut self, value: Option<T>, message: impl Into<String>) {
        self.assert_true(value.is_none(), message);
    }

    /// Records `message` unconditionally.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn reset_errors(&mut self) {
        self.errors.clear();
    }

    /// Returns a copy of the recorded messages.
    pub fn errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drains the collector into a single failure.
    ///
    /// Does nothing when no error has been recorded. The collector is empty
    /// afterwards in both cases.
    pub fn throw_if_errors(&mut self) -> Result<(), SoftAssertionFailures> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(SoftAssertionFailures(std::mem::take(&mut self.errors)))
    }
}

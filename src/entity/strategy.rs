//! Failure policy of the caller-facing facades.

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;

/// How facades report failures of the naming core.
///
/// Chosen once per SDK instance. The core always returns errors; only the
/// facades consult this policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionHandlingStrategy {
    /// Return every error to the caller.
    Throw,
    /// Log the error and answer `None`.
    #[default]
    #[serde(alias = "catch_and_log")]
    Catch,
}

impl ExceptionHandlingStrategy {
    /// Apply the policy to the outcome of a facade call about `subject`.
    pub fn handle<T>(self, subject: &str, result: Result<Option<T>>) -> Result<Option<T>> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (Self::Throw, Err(e)) => Err(e),
            (Self::Catch, Err(e)) => {
                warn!(subject, error = %e, "Suppressed naming failure");
                Ok(None)
            }
        }
    }
}

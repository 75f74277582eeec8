//! Errors surfaced by the engine.
//!
//! Below-threshold opportunities and degenerate prices are never errors, they are
//! filtered out during detection. Only malformed input and invalid configuration
//! reach the caller.

use thiserror::Error;

/// Errors that can occur when configuring the engine or parsing an input batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid input batch ({} issue(s)): {}", .issues.len(), .issues.join("; "))]
    Validation { issues: Vec<String> },

    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Build a single aggregate validation error, or `Ok` if nothing was reported.
    pub fn check_issues(issues: Vec<String>) -> Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation { issues })
        }
    }
}

//! Analysis error types.
//!
//! Every failure the engine can surface falls into one of three classes.
//! Ingestion and CLI code wraps these in `anyhow` and can downcast to
//! classify them without string matching.

use thiserror::Error;

/// Errors that can occur while configuring or running an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The request was rejected before any analysis ran (empty paper,
    /// all-blank questions, too many questions).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The lexicon/threshold configuration is missing or malformed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A question record was structurally invalid mid-analysis.
    #[error("internal processing error: {0}")]
    Internal(String),
}

impl AnalysisError {
    /// Returns `true` if this error should stop the process rather than a
    /// single request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnalysisError::Configuration(_))
    }

    /// Returns `true` if the caller can fix the input and resubmit.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }
}

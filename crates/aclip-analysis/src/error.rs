//! Analysis error types.

use thiserror::Error;

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Errors that can occur during virality scoring.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("analysis request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("analysis service returned {status}: {detail}")]
    Api { status: u16, detail: String },

    #[error("no content in analysis response")]
    NoContent,

    #[error("failed to parse analysis output: {0}")]
    ParseFailed(String),

    #[error("analysis output failed validation: {0}")]
    InvalidResponse(String),

    #[error("all analysis models failed: {0}")]
    AllModelsFailed(String),

    #[error("empty transcript, nothing to analyze")]
    EmptyTranscript,
}

impl AnalysisError {
    pub fn parse_failed(msg: impl Into<String>) -> Self {
        Self::ParseFailed(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Transient transport/service failures worth retrying within a stage.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Http(_) | AnalysisError::Api { .. } | AnalysisError::AllModelsFailed(_)
        )
    }

    /// Malformed output fails closed: the video is excluded from the rest
    /// of this run but stays retry-eligible on a later cycle.
    pub fn is_permanent_for_run(&self) -> bool {
        matches!(
            self,
            AnalysisError::ParseFailed(_)
                | AnalysisError::InvalidResponse(_)
                | AnalysisError::NoContent
                | AnalysisError::EmptyTranscript
        )
    }
}

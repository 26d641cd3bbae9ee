//! Transcript acquisition error types.

use thiserror::Error;

/// Result type for transcript operations.
pub type TranscriptResult<T> = Result<T, TranscriptError>;

/// Why the captions API could not supply a usable track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionsFailure {
    /// Video or caption track does not exist
    NotFound,
    /// Caption download is restricted for this video
    Forbidden,
    /// A track exists but carries no usable text
    Empty,
}

impl std::fmt::Display for CaptionsFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CaptionsFailure::NotFound => "not_found",
            CaptionsFailure::Forbidden => "forbidden",
            CaptionsFailure::Empty => "empty",
        };
        write!(f, "{s}")
    }
}

/// Why the stealth browsing collaborator could not return media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StealthFailure {
    /// Bot detection or access block
    Blocked,
    /// Video deleted/private/unavailable
    NotFound,
    /// Fetch timed out
    Timeout,
}

impl std::fmt::Display for StealthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StealthFailure::Blocked => "blocked",
            StealthFailure::NotFound => "not_found",
            StealthFailure::Timeout => "timeout",
        };
        write!(f, "{s}")
    }
}

/// Errors that can occur during transcript acquisition.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("captions unavailable: {0}")]
    Captions(CaptionsFailure),

    #[error("captions request failed: {0}")]
    CaptionsHttp(#[from] reqwest::Error),

    #[error("caption payload malformed: {0}")]
    CaptionsMalformed(String),

    #[error("stealth fetch failed: {0}")]
    Stealth(StealthFailure),

    #[error("speech-to-text failed: {0}")]
    SpeechToText(String),

    #[error("tier 2 exhausted after {attempts} attempts: {last_error}")]
    Tier2Exhausted { attempts: u32, last_error: String },
}

impl TranscriptError {
    pub fn captions_malformed(msg: impl Into<String>) -> Self {
        Self::CaptionsMalformed(msg.into())
    }

    pub fn speech_to_text(msg: impl Into<String>) -> Self {
        Self::SpeechToText(msg.into())
    }

    /// Transient failures that a bounded retry may recover from.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TranscriptError::Stealth(StealthFailure::Blocked)
                | TranscriptError::Stealth(StealthFailure::Timeout)
                | TranscriptError::CaptionsHttp(_)
                | TranscriptError::SpeechToText(_)
        )
    }

    /// Permanent failures: the video itself is gone or locked down, so no
    /// amount of retrying (this run or later) will produce a transcript.
    pub fn is_permanent_failure(&self) -> bool {
        matches!(self, TranscriptError::Stealth(StealthFailure::NotFound))
    }
}

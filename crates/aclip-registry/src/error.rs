//! Registry error types.

use aclip_models::{VideoId, VideoStatus};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("video not found: {0}")]
    NotFound(VideoId),

    #[error("invalid status transition for {id}: {from} -> {to}")]
    InvalidTransition {
        id: VideoId,
        from: VideoStatus,
        to: VideoStatus,
    },

    #[error("transition to analyzed requires a score: {0}")]
    MissingScore(VideoId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    pub fn not_found(id: impl Into<VideoId>) -> Self {
        Self::NotFound(id.into())
    }

    /// Infrastructure failures (storage unreachable/corrupt) are run-fatal;
    /// the per-record errors above are not.
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, RegistryError::Io(_) | RegistryError::Json(_))
    }
}

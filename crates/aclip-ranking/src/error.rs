//! Ranking error types.

use thiserror::Error;

use aclip_models::Platform;

/// Result type for ranking operations.
pub type RankingResult<T> = Result<T, RankingError>;

/// Errors that can occur during ranking and publish dispatch.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("publish to {platform} failed: {detail}")]
    Dispatch { platform: Platform, detail: String },

    #[error("publish state error: {0}")]
    State(#[from] aclip_registry::RegistryError),
}

impl RankingError {
    pub fn dispatch(platform: Platform, detail: impl Into<String>) -> Self {
        Self::Dispatch {
            platform,
            detail: detail.into(),
        }
    }
}

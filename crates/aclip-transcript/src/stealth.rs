//! Tier-2 collaborators: stealth media fetch and speech-to-text.
//!
//! The browsing collaborator owns the automation internals (realistic
//! identity, anti-detection); this crate only decides when to invoke it
//! and how to pace the attempts.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use aclip_models::{TranscriptSegment, VideoId};

use crate::error::TranscriptResult;

/// Raw media returned by the stealth browsing collaborator.
#[derive(Debug, Clone)]
pub struct MediaArtifact {
    /// Video the media belongs to
    pub video_id: VideoId,
    /// Local path of the fetched media
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
}

/// Stealth-capable automated-browsing collaborator.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait StealthBrowser: Send + Sync {
    /// Fetch the raw media for a video.
    async fn fetch_media(&self, video_id: &VideoId) -> TranscriptResult<MediaArtifact>;
}

/// Speech-to-text collaborator.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe fetched media into timestamped segments.
    async fn transcribe(&self, media: &MediaArtifact) -> TranscriptResult<Vec<TranscriptSegment>>;
}

/// Human-like pause before touching the stealth path.
///
/// Uniform within `[min, max]` so consecutive tier-2 fetches never land on
/// a fixed cadence.
pub async fn human_pace(min: Duration, max: Duration) {
    if max.is_zero() {
        return;
    }
    let span = max.saturating_sub(min).as_millis() as u64;
    let extra = if span == 0 {
        0
    } else {
        rand::rng().random_range(0..=span)
    };
    tokio::time::sleep(min + Duration::from_millis(extra)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_human_pace_zero_is_instant() {
        // Should return immediately rather than sleeping
        human_pace(Duration::ZERO, Duration::ZERO).await;
    }
}

//! External collaborator seams owned by the orchestrator.

use async_trait::async_trait;
use thiserror::Error;

use aclip_models::{ClipCandidate, VideoRecord, ViralMoment};

/// Errors reported by orchestrator-level collaborators.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("clip generation failed: {0}")]
    ClipGeneration(String),
}

impl CollaboratorError {
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    pub fn clip_generation(msg: impl Into<String>) -> Self {
        Self::ClipGeneration(msg.into())
    }
}

/// Discovery collaborator: supplies new video records.
///
/// Invoked exactly once per run, at the ingest point; this core never
/// drives crawling itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Fetch newly discovered videos.
    async fn discover(&self) -> Result<Vec<VideoRecord>, CollaboratorError>;
}

/// Clip-generation collaborator: cuts clip artifacts for selected videos.
///
/// Invoked only for videos that cleared the selection gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClipGenerator: Send + Sync {
    /// Produce scored clip candidates for a video's viral moments.
    async fn generate(
        &self,
        video: &VideoRecord,
        moments: &[ViralMoment],
    ) -> Result<Vec<ClipCandidate>, CollaboratorError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclip_models::Niche;

    #[tokio::test]
    async fn test_discovery_seam_is_mockable() {
        let mut discovery = MockDiscovery::new();
        discovery.expect_discover().returning(|| {
            Ok(vec![VideoRecord::new(
                "dQw4w9WgXcQ",
                "Test",
                Niche::Gaming,
            )])
        });

        let records = discovery.discover().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_clip_generator_error_display() {
        let mut clips = MockClipGenerator::new();
        clips
            .expect_generate()
            .returning(|_, _| Err(CollaboratorError::clip_generation("ffmpeg exited 1")));

        let video = VideoRecord::new("dQw4w9WgXcQ", "Test", Niche::Gaming);
        let err = clips.generate(&video, &[]).await.unwrap_err();
        assert!(err.to_string().contains("clip generation failed"));
    }
}

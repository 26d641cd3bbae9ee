//! Structured per-video logging.
//!
//! Consistent formatting for video lifecycle events with automatic
//! contextual information (video id, stage).

use tracing::{error, info, warn, Span};

use aclip_models::VideoId;

use crate::stage::RunStage;

/// Per-video logger with consistent formatting.
#[derive(Debug, Clone)]
pub struct VideoLogger {
    video_id: String,
    stage: RunStage,
}

impl VideoLogger {
    /// Create a logger for one video in one stage.
    pub fn new(video_id: &VideoId, stage: RunStage) -> Self {
        Self {
            video_id: video_id.to_string(),
            stage,
        }
    }

    /// Log the start of per-video work.
    pub fn log_start(&self, message: &str) {
        info!(
            video_id = %self.video_id,
            stage = %self.stage,
            "Video started: {}", message
        );
    }

    /// Log a progress update.
    pub fn log_progress(&self, message: &str) {
        info!(
            video_id = %self.video_id,
            stage = %self.stage,
            "Video progress: {}", message
        );
    }

    /// Log a warning.
    pub fn log_warning(&self, message: &str) {
        warn!(
            video_id = %self.video_id,
            stage = %self.stage,
            "Video warning: {}", message
        );
    }

    /// Log a per-video failure.
    pub fn log_failure(&self, message: &str) {
        error!(
            video_id = %self.video_id,
            stage = %self.stage,
            "Video failed: {}", message
        );
    }

    /// Log completion of per-video work.
    pub fn log_completion(&self, message: &str) {
        info!(
            video_id = %self.video_id,
            stage = %self.stage,
            "Video completed: {}", message
        );
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Create a tracing span for this video.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "video",
            video_id = %self.video_id,
            stage = %self.stage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_holds_context() {
        let logger = VideoLogger::new(&"dQw4w9WgXcQ".into(), RunStage::Analyzing);
        assert_eq!(logger.video_id(), "dQw4w9WgXcQ");
    }
}

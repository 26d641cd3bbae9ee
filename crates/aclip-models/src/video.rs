//! Video lifecycle models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::niche::Niche;
use crate::transcript::TranscriptSource;

/// Identifier of a source video (the platform-native id, e.g. an
/// 11-character YouTube id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Video lifecycle status.
///
/// Transitions are strictly forward in the order below; the registry
/// rejects anything else with `InvalidTransition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    /// Handed over by the discovery collaborator, nothing done yet
    #[default]
    Discovered,
    /// Transcript scored, virality score persisted
    Analyzed,
    /// Cleared the selection gate, clip creation in progress
    Processing,
    /// A clip from this video was published
    Published,
    /// Failed for the current run (may be retried on a later cycle)
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Discovered => "discovered",
            VideoStatus::Analyzed => "analyzed",
            VideoStatus::Processing => "processing",
            VideoStatus::Published => "published",
            VideoStatus::Failed => "failed",
        }
    }

    /// Position in the forward-only ordering.
    pub fn rank(&self) -> u8 {
        match self {
            VideoStatus::Discovered => 0,
            VideoStatus::Analyzed => 1,
            VideoStatus::Processing => 2,
            VideoStatus::Published => 3,
            VideoStatus::Failed => 4,
        }
    }

    /// Whether moving to `next` strictly advances the lifecycle.
    pub fn can_advance_to(&self, next: VideoStatus) -> bool {
        next.rank() > self.rank()
    }

    /// Terminal states take no further transitions within a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Published | VideoStatus::Failed)
    }

    /// A score is defined only from this point on.
    pub fn is_scored(&self) -> bool {
        self.rank() >= VideoStatus::Analyzed.rank()
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A discovered video tracked through the pipeline.
///
/// Created by the discovery collaborator, mutated in place by each stage,
/// never deleted by this core.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoRecord {
    /// Source video id
    pub id: VideoId,

    /// When discovery handed the video over
    pub discovered_at: DateTime<Utc>,

    /// Video title
    pub title: String,

    /// Channel name
    #[serde(default)]
    pub channel: String,

    /// Content niche
    #[serde(default)]
    pub niche: Niche,

    /// Lifecycle status
    #[serde(default)]
    pub status: VideoStatus,

    /// Aggregate virality score (0-100), set once status >= analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virality_score: Option<f64>,

    /// When analysis completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,

    /// When creation/publish processing completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,

    /// Which tier produced the transcript
    #[serde(default)]
    pub transcription_source: TranscriptSource,

    /// Failure reason for the last run, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,

    /// Whether the failure is terminal (video deleted/private); terminal
    /// records are never re-ingested
    #[serde(default)]
    pub failure_terminal: bool,

    /// Source view count at discovery time
    #[serde(default)]
    pub view_count: u64,
}

impl VideoRecord {
    /// Create a freshly discovered record.
    pub fn new(id: impl Into<VideoId>, title: impl Into<String>, niche: Niche) -> Self {
        Self {
            id: id.into(),
            discovered_at: Utc::now(),
            title: title.into(),
            channel: String::new(),
            niche,
            status: VideoStatus::Discovered,
            virality_score: None,
            analyzed_at: None,
            processed_at: None,
            transcription_source: TranscriptSource::None,
            failure: None,
            failure_terminal: false,
            view_count: 0,
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    pub fn with_view_count(mut self, views: u64) -> Self {
        self.view_count = views;
        self
    }

    /// Score is defined iff status is at least `analyzed`.
    pub fn score(&self) -> Option<f64> {
        if self.status.is_scored() {
            self.virality_score
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_is_strictly_forward() {
        use VideoStatus::*;
        assert!(Discovered.can_advance_to(Analyzed));
        assert!(Analyzed.can_advance_to(Processing));
        assert!(Processing.can_advance_to(Published));
        assert!(Discovered.can_advance_to(Failed));

        assert!(!Analyzed.can_advance_to(Analyzed));
        assert!(!Processing.can_advance_to(Discovered));
        assert!(!Published.can_advance_to(Analyzed));
    }

    #[test]
    fn test_score_hidden_before_analysis() {
        let mut record = VideoRecord::new("abc123def45", "Test", Niche::Fortnite);
        record.virality_score = Some(80.0);
        assert_eq!(record.score(), None);

        record.status = VideoStatus::Analyzed;
        assert_eq!(record.score(), Some(80.0));
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&VideoStatus::Discovered).unwrap();
        assert_eq!(json, "\"discovered\"");
    }
}

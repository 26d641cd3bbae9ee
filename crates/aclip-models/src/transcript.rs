//! Tier-tagged transcript models.
//!
//! Downstream scoring is tier-agnostic: whichever tier produced the
//! transcript, it arrives as the same normalized segment sequence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which acquisition tier produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    /// Official captions feed
    Tier1,
    /// Stealth media fetch + speech-to-text
    Tier2,
    /// Both tiers failed
    #[default]
    None,
}

impl TranscriptSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptSource::Tier1 => "tier1",
            TranscriptSource::Tier2 => "tier2",
            TranscriptSource::None => "none",
        }
    }
}

/// One timestamped line of transcript text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptSegment {
    /// Segment start, seconds from video start
    pub start: f64,
    /// Segment end, seconds from video start
    pub end: f64,
    /// Spoken text
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }
}

/// A normalized transcript for one video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    /// Acquisition tier that produced this transcript
    pub source: TranscriptSource,
    /// Timestamped segments, ordered by start time
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(source: TranscriptSource, segments: Vec<TranscriptSegment>) -> Self {
        Self { source, segments }
    }

    /// Full text with segments joined by single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// End timestamp of the last segment, 0.0 when empty.
    pub fn duration(&self) -> f64 {
        self.segments.last().map(|s| s.end).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

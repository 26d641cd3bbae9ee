//! Shared data models for the AutoClip pipeline core.
//!
//! This crate provides Serde-serializable types for:
//! - Video lifecycle records and statuses
//! - Tier-tagged transcripts
//! - Analysis output (viral moments, engagement signals)
//! - Clip candidates and publish-time metadata
//! - Publish dedup state and per-run summaries

pub mod analysis;
pub mod clip;
pub mod niche;
pub mod platform;
pub mod publish;
pub mod summary;
pub mod transcript;
pub mod utils;
pub mod video;

// Re-export common types
pub use analysis::{EngagementSignals, MomentType, ViralMoment};
pub use clip::{BrandSafety, ClipCandidate, ClipMetadata};
pub use niche::Niche;
pub use platform::Platform;
pub use publish::PublishState;
pub use summary::{PlatformDispatch, RunSummary, VideoFailure};
pub use transcript::{Transcript, TranscriptSegment, TranscriptSource};
pub use utils::{extract_video_id, VideoIdError};
pub use video::{VideoId, VideoRecord, VideoStatus};

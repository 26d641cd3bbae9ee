//! Tiered transcript acquisition.
//!
//! Tier 1 requests the official captions feed (no media transfer); tier 2
//! falls back to a stealth-capable browsing collaborator plus external
//! speech-to-text, with bounded retries and human-like pacing. Whatever
//! tier succeeds, downstream consumers receive the same normalized,
//! tier-tagged transcript.

pub mod acquire;
pub mod captions;
pub mod error;
pub mod retry;
pub mod srt;
pub mod stealth;

pub use acquire::{
    AcquisitionConfig, AcquisitionOutcome, AcquisitionState, TranscriptAcquirer,
    TranscriptProvider,
};
pub use captions::{fetch_captions_transcript, CaptionSource, CaptionTrack, HttpCaptionsClient};
pub use error::{CaptionsFailure, StealthFailure, TranscriptError, TranscriptResult};
pub use retry::{retry_async, RetryConfig, RetryResult};
pub use stealth::{MediaArtifact, SpeechToText, StealthBrowser};

#[cfg(any(test, feature = "mocks"))]
pub use acquire::MockTranscriptProvider;
#[cfg(any(test, feature = "mocks"))]
pub use captions::MockCaptionSource;
#[cfg(any(test, feature = "mocks"))]
pub use stealth::{MockSpeechToText, MockStealthBrowser};

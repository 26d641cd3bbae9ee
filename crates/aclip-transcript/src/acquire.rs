//! The tiered acquisition state machine.
//!
//! `TryTier1 -> (success -> Done(Tier1)) | (fail -> TryTier2)`
//! `TryTier2 -> (success -> Done(Tier2)) | (fail -> Done(None))`
//!
//! Tiers run strictly sequentially for a given video; tier 2 is never
//! attempted while tier 1 is in flight, bounding bandwidth and detection
//! exposure.

use std::time::Duration;

use tracing::{info, warn};

use aclip_models::{Transcript, TranscriptSource, VideoId};

use crate::captions::{fetch_captions_transcript, CaptionSource};
use crate::error::TranscriptError;
use crate::retry::{retry_async, RetryConfig, RetryResult};
use crate::stealth::{human_pace, SpeechToText, StealthBrowser};

/// State of the acquisition machine for one video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// Request the official captions feed
    TryTier1,
    /// Captions failed; stealth fetch + speech-to-text
    TryTier2,
    /// Finished, tagged with the tier that produced the transcript
    Done(TranscriptSource),
}

impl AcquisitionState {
    /// Transition after a tier-1 attempt.
    pub fn after_tier1(self, success: bool) -> Self {
        debug_assert_eq!(self, AcquisitionState::TryTier1);
        if success {
            AcquisitionState::Done(TranscriptSource::Tier1)
        } else {
            AcquisitionState::TryTier2
        }
    }

    /// Transition after a tier-2 attempt.
    pub fn after_tier2(self, success: bool) -> Self {
        debug_assert_eq!(self, AcquisitionState::TryTier2);
        if success {
            AcquisitionState::Done(TranscriptSource::Tier2)
        } else {
            AcquisitionState::Done(TranscriptSource::None)
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, AcquisitionState::Done(_))
    }
}

/// Outcome of running the machine to completion.
#[derive(Debug)]
pub enum AcquisitionOutcome {
    /// A tier produced a normalized transcript
    Acquired(Transcript),
    /// Both tiers failed; the video is failed for this run only
    Unavailable {
        reason: String,
        /// Terminal causes (deleted/private) are never retried later
        terminal: bool,
    },
}

impl AcquisitionOutcome {
    pub fn source(&self) -> TranscriptSource {
        match self {
            AcquisitionOutcome::Acquired(t) => t.source,
            AcquisitionOutcome::Unavailable { .. } => TranscriptSource::None,
        }
    }
}

/// Configuration for acquisition behavior.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Bounded retries for the tier-2 fetch+transcribe attempt.
    pub tier2_max_retries: u32,
    /// Base delay for tier-2 exponential backoff.
    pub tier2_base_delay: Duration,
    /// Human-like pacing window before each stealth fetch.
    pub pacing_min: Duration,
    pub pacing_max: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            tier2_max_retries: 3,
            tier2_base_delay: Duration::from_secs(5),
            pacing_min: Duration::from_millis(500),
            pacing_max: Duration::from_millis(2000),
        }
    }
}

impl AcquisitionConfig {
    /// Fast settings for tests: no pacing, millisecond backoff.
    pub fn immediate() -> Self {
        Self {
            tier2_max_retries: 3,
            tier2_base_delay: Duration::from_millis(1),
            pacing_min: Duration::ZERO,
            pacing_max: Duration::ZERO,
        }
    }
}

/// Object-safe seam for the acquisition driver, so the orchestrator can
/// hold any implementation (or a test double) behind a pointer.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait::async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Run the tiered fallback for one video.
    async fn acquire_transcript(&self, video_id: &VideoId) -> AcquisitionOutcome;
}

#[async_trait::async_trait]
impl<C, B, S> TranscriptProvider for TranscriptAcquirer<C, B, S>
where
    C: CaptionSource,
    B: StealthBrowser,
    S: SpeechToText,
{
    async fn acquire_transcript(&self, video_id: &VideoId) -> AcquisitionOutcome {
        self.acquire(video_id).await
    }
}

/// Drives the tiered fallback for one video at a time.
pub struct TranscriptAcquirer<C, B, S> {
    captions: C,
    browser: B,
    speech_to_text: S,
    config: AcquisitionConfig,
}

impl<C, B, S> TranscriptAcquirer<C, B, S>
where
    C: CaptionSource,
    B: StealthBrowser,
    S: SpeechToText,
{
    pub fn new(captions: C, browser: B, speech_to_text: S, config: AcquisitionConfig) -> Self {
        Self {
            captions,
            browser,
            speech_to_text,
            config,
        }
    }

    /// Run the machine to completion for one video.
    ///
    /// Never aborts the batch: every failure mode collapses into
    /// [`AcquisitionOutcome::Unavailable`].
    pub async fn acquire(&self, video_id: &VideoId) -> AcquisitionOutcome {
        let mut state = AcquisitionState::TryTier1;
        let mut tier1_error = None;

        loop {
            state = match state {
                AcquisitionState::TryTier1 => {
                    match fetch_captions_transcript(&self.captions, video_id).await {
                        Ok(transcript) => {
                            return AcquisitionOutcome::Acquired(transcript);
                        }
                        Err(e) => {
                            warn!(video_id = %video_id, error = %e, "Tier 1 failed, falling back");
                            tier1_error = Some(e);
                            state.after_tier1(false)
                        }
                    }
                }
                AcquisitionState::TryTier2 => match self.try_tier2(video_id).await {
                    Ok(transcript) => {
                        return AcquisitionOutcome::Acquired(transcript);
                    }
                    Err(e) => {
                        let terminal = e.is_permanent_failure();
                        let tier1 = tier1_error
                            .take()
                            .map(|t1| format!("{t1}"))
                            .unwrap_or_default();
                        warn!(video_id = %video_id, error = %e, terminal, "Tier 2 failed");
                        return AcquisitionOutcome::Unavailable {
                            reason: format!("tier1: {tier1}; tier2: {e}"),
                            terminal,
                        };
                    }
                },
                AcquisitionState::Done(_) => unreachable!("terminal states return directly"),
            };
        }
    }

    /// One bounded-retry tier-2 pass: stealth fetch, then speech-to-text.
    async fn try_tier2(&self, video_id: &VideoId) -> Result<Transcript, TranscriptError> {
        let retry = RetryConfig::new("tier2_transcribe")
            .with_max_retries(self.config.tier2_max_retries)
            .with_base_delay(self.config.tier2_base_delay);

        let result = retry_async(
            &retry,
            || async {
                human_pace(self.config.pacing_min, self.config.pacing_max).await;
                let media = self.browser.fetch_media(video_id).await?;
                info!(
                    video_id = %video_id,
                    size_bytes = media.size_bytes,
                    "Fetched media via stealth path"
                );
                let segments = self.speech_to_text.transcribe(&media).await?;
                Ok::<_, TranscriptError>(Transcript::new(TranscriptSource::Tier2, segments))
            },
            TranscriptError::is_retryable,
        )
        .await;

        match result {
            RetryResult::Success(transcript) if transcript.is_empty() => Err(
                TranscriptError::speech_to_text("empty transcription result"),
            ),
            RetryResult::Success(transcript) => Ok(transcript),
            RetryResult::Failed { error, attempts } => {
                if error.is_permanent_failure() {
                    Err(error)
                } else {
                    Err(TranscriptError::Tier2Exhausted {
                        attempts,
                        last_error: error.to_string(),
                    })
                }
            }
        }
    }
}

//! Tier-1 transcript source: the official captions API.
//!
//! Requests caption tracks for a video and downloads the best one. This
//! path never triggers bulk media transfer and is expected to cover ~90%
//! of videos.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use aclip_models::{Transcript, TranscriptSegment, TranscriptSource, VideoId};

use crate::error::{CaptionsFailure, TranscriptError, TranscriptResult};
use crate::srt::parse_srt;

/// One caption track advertised for a video.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptionTrack {
    /// Track id used for download
    pub id: String,
    /// BCP-47 language code
    pub language: String,
    /// "standard" for manual captions, "asr" for auto-generated
    #[serde(default)]
    pub track_kind: String,
}

impl CaptionTrack {
    pub fn is_manual(&self) -> bool {
        self.track_kind != "asr"
    }

    pub fn is_english(&self) -> bool {
        self.language == "en" || self.language.starts_with("en-")
    }
}

/// Captions/metadata API collaborator.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// List available caption tracks for a video.
    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>>;

    /// Download one track as an SRT payload.
    async fn download_track(&self, video_id: &VideoId, track_id: &str) -> TranscriptResult<String>;
}

/// Pick the best track: English manual > English auto > first available.
pub fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.is_english() && t.is_manual())
        .or_else(|| tracks.iter().find(|t| t.is_english()))
        .or_else(|| tracks.first())
}

/// Fetch and normalize a tier-1 transcript.
///
/// Any captions failure (`NotFound`/`Forbidden`/`Empty`, malformed payload,
/// transport error) is a tier-1 failure; the caller falls through to
/// tier 2.
pub async fn fetch_captions_transcript<C: CaptionSource + ?Sized>(
    source: &C,
    video_id: &VideoId,
) -> TranscriptResult<Transcript> {
    let tracks = source.list_tracks(video_id).await?;

    let track =
        select_track(&tracks).ok_or(TranscriptError::Captions(CaptionsFailure::NotFound))?;
    debug!(
        video_id = %video_id,
        track_id = %track.id,
        language = %track.language,
        "Selected caption track"
    );

    let payload = source.download_track(video_id, &track.id).await?;
    if payload.trim().is_empty() {
        return Err(TranscriptError::Captions(CaptionsFailure::Empty));
    }

    let segments: Vec<TranscriptSegment> = parse_srt(&payload)?;
    info!(video_id = %video_id, segments = segments.len(), "Fetched tier-1 transcript");
    Ok(Transcript::new(TranscriptSource::Tier1, segments))
}

/// HTTP implementation of [`CaptionSource`].
pub struct HttpCaptionsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TrackListResponse {
    #[serde(default)]
    items: Vec<CaptionTrack>,
}

impl HttpCaptionsClient {
    /// Create a client against the given captions API base URL.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn map_status(status: StatusCode) -> Option<TranscriptError> {
        match status {
            StatusCode::NOT_FOUND => Some(TranscriptError::Captions(CaptionsFailure::NotFound)),
            StatusCode::FORBIDDEN => Some(TranscriptError::Captions(CaptionsFailure::Forbidden)),
            _ => None,
        }
    }
}

#[async_trait]
impl CaptionSource for HttpCaptionsClient {
    async fn list_tracks(&self, video_id: &VideoId) -> TranscriptResult<Vec<CaptionTrack>> {
        let url = format!(
            "{}/captions?videoId={}&key={}",
            self.base_url, video_id, self.api_key
        );
        let response = self.client.get(&url).send().await?;

        if let Some(err) = Self::map_status(response.status()) {
            return Err(err);
        }
        let response = response.error_for_status()?;

        let list: TrackListResponse = response.json().await?;
        if list.items.is_empty() {
            return Err(TranscriptError::Captions(CaptionsFailure::NotFound));
        }
        Ok(list.items)
    }

    async fn download_track(&self, _video_id: &VideoId, track_id: &str) -> TranscriptResult<String> {
        let url = format!(
            "{}/captions/{}?tfmt=srt&key={}",
            self.base_url, track_id, self.api_key
        );
        let response = self.client.get(&url).send().await?;

        if let Some(err) = Self::map_status(response.status()) {
            return Err(err);
        }
        let response = response.error_for_status()?;

        Ok(response.text().await?)
    }
}

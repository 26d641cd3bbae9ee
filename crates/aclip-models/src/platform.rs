//! Target publishing platforms.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A short-form platform a clip can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    YoutubeShorts,
    Tiktok,
    InstagramReels,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YoutubeShorts => "youtube_shorts",
            Platform::Tiktok => "tiktok",
            Platform::InstagramReels => "instagram_reels",
        }
    }

    /// Maximum clip duration the platform accepts, in seconds.
    pub fn max_clip_secs(&self) -> f64 {
        match self {
            Platform::YoutubeShorts => 60.0,
            Platform::Tiktok => 60.0,
            Platform::InstagramReels => 90.0,
        }
    }

    /// Title length cap used for generated metadata.
    pub fn title_max_chars(&self) -> usize {
        match self {
            Platform::YoutubeShorts => 100,
            Platform::Tiktok => 150,
            Platform::InstagramReels => 125,
        }
    }

    pub fn all() -> &'static [Platform] {
        &[
            Platform::YoutubeShorts,
            Platform::Tiktok,
            Platform::InstagramReels,
        ]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_caps() {
        assert_eq!(Platform::YoutubeShorts.max_clip_secs(), 60.0);
        assert_eq!(Platform::InstagramReels.max_clip_secs(), 90.0);
    }
}

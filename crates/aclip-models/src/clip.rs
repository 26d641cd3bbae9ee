//! Clip candidate models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analysis::{EngagementSignals, MomentType};
use crate::niche::Niche;
use crate::platform::Platform;
use crate::video::VideoId;

/// Brand-safety flags detected on a candidate.
///
/// Each flagged issue reduces the safety score multiplicatively; copyright
/// additionally disqualifies the candidate outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct BrandSafety {
    #[serde(default)]
    pub profanity: bool,
    #[serde(default)]
    pub violence: bool,
    #[serde(default)]
    pub controversy: bool,
    #[serde(default)]
    pub copyright: bool,
    #[serde(default)]
    pub explicit: bool,
}

impl BrandSafety {
    pub fn clean() -> Self {
        Self::default()
    }

    /// Names of the flags that are set.
    pub fn flagged(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.profanity {
            flags.push("profanity");
        }
        if self.violence {
            flags.push("violence");
        }
        if self.controversy {
            flags.push("controversy");
        }
        if self.copyright {
            flags.push("copyright");
        }
        if self.explicit {
            flags.push("explicit");
        }
        flags
    }

    pub fn any(&self) -> bool {
        !self.flagged().is_empty()
    }
}

/// A cut clip competing for the single publish slot of a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct ClipCandidate {
    /// Video the clip was cut from
    pub source_video_id: VideoId,

    /// Discovery time of the source video (publish-time tie-break)
    pub source_discovered_at: DateTime<Utc>,

    /// Clip start, seconds from video start
    pub start_time: f64,

    /// Clip end, seconds from video start
    pub end_time: f64,

    /// Category of the underlying moment
    pub moment_type: MomentType,

    /// Hook quote from the underlying moment
    #[serde(default)]
    pub quote: String,

    /// Virality score of the underlying moment (0-100)
    #[validate(range(min = 0.0, max = 100.0))]
    pub virality_score: f64,

    /// Weighted engagement quality (0-100)
    #[validate(range(min = 0.0, max = 100.0))]
    pub engagement_quality: f64,

    /// Raw engagement sub-signals
    #[serde(default)]
    pub engagement: EngagementSignals,

    /// Detected brand-safety flags
    #[serde(default)]
    pub brand_safety: BrandSafety,

    /// Brand-safety score after penalties (0-100)
    #[validate(range(min = 0.0, max = 100.0))]
    pub safety_score: f64,

    /// Composite earning-potential ranking score
    #[validate(range(min = 0.0))]
    pub earning_potential: f64,

    /// Source niche
    #[serde(default)]
    pub niche: Niche,

    /// Platform the clip was cut for
    pub platform: Platform,

    /// Disqualified candidates are never selectable
    #[serde(default)]
    pub disqualified: bool,

    /// Why the candidate was disqualified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disqualify_reason: Option<String>,
}

impl ClipCandidate {
    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }

    /// Mark the candidate unselectable.
    pub fn disqualify(&mut self, reason: impl Into<String>) {
        self.disqualified = true;
        self.disqualify_reason = Some(reason.into());
    }
}

/// Generated publish metadata for one platform.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClipMetadata {
    /// Target platform
    pub platform: Platform,
    /// Title, capped at the platform limit
    pub title: String,
    /// Post description
    pub description: String,
    /// Hashtags including the leading '#'
    pub hashtags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_safety_flag_names() {
        let safety = BrandSafety {
            profanity: true,
            copyright: true,
            ..BrandSafety::clean()
        };
        assert_eq!(safety.flagged(), vec!["profanity", "copyright"]);
        assert!(safety.any());
        assert!(!BrandSafety::clean().any());
    }

    #[test]
    fn test_disqualify_records_reason() {
        let mut clip = ClipCandidate {
            source_video_id: "vid00000001".into(),
            source_discovered_at: Utc::now(),
            start_time: 10.0,
            end_time: 40.0,
            moment_type: MomentType::Exciting,
            quote: "wow".to_string(),
            virality_score: 90.0,
            engagement_quality: 80.0,
            engagement: EngagementSignals::default(),
            brand_safety: BrandSafety::clean(),
            safety_score: 100.0,
            earning_potential: 50.0,
            niche: Niche::Fortnite,
            platform: Platform::Tiktok,
            disqualified: false,
            disqualify_reason: None,
        };
        clip.disqualify("copyright");
        assert!(clip.disqualified);
        assert_eq!(clip.disqualify_reason.as_deref(), Some("copyright"));
        assert_eq!(clip.duration(), 30.0);

        assert!(clip.validate().is_ok());
        clip.virality_score = 150.0;
        assert!(clip.validate().is_err());
    }
}

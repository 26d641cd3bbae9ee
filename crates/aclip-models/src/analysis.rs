//! Analysis output models (viral moments).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clip::BrandSafety;

/// Category assigned to a viral moment by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MomentType {
    Exciting,
    Funny,
    Shocking,
    Emotional,
    Epic,
    #[serde(other)]
    Other,
}

impl MomentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MomentType::Exciting => "exciting",
            MomentType::Funny => "funny",
            MomentType::Shocking => "shocking",
            MomentType::Emotional => "emotional",
            MomentType::Epic => "epic",
            MomentType::Other => "other",
        }
    }
}

/// Engagement sub-signals reported per moment, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementSignals {
    /// Energy/excitement level of the moment
    #[serde(default = "neutral_signal")]
    pub excitement: f64,
    /// Strength of the emotional build-up and payoff
    #[serde(default = "neutral_signal")]
    pub emotional_arc: f64,
    /// How hard the opening seconds hook a viewer
    #[serde(default = "neutral_signal")]
    pub hook_strength: f64,
}

fn neutral_signal() -> f64 {
    50.0
}

impl Default for EngagementSignals {
    fn default() -> Self {
        Self {
            excitement: 50.0,
            emotional_arc: 50.0,
            hook_strength: 50.0,
        }
    }
}

/// A clip-worthy moment identified in a transcript.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViralMoment {
    /// Moment start, seconds from video start
    pub start_time: f64,

    /// Moment end, seconds from video start
    pub end_time: f64,

    /// Moment category
    #[serde(rename = "type")]
    pub moment_type: MomentType,

    /// Virality score for this moment (0-100)
    pub virality_score: f64,

    /// Verbatim quote from the transcript, used as the hook
    #[serde(default)]
    pub quote: String,

    /// Why the service considers this moment viral
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Engagement sub-signals
    #[serde(default)]
    pub engagement: EngagementSignals,

    /// Brand-safety flags detected for this moment
    #[serde(default)]
    pub brand_safety: BrandSafety,
}

impl ViralMoment {
    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moment_type_tolerates_unknown_labels() {
        let m: MomentType = serde_json::from_str("\"clutch\"").unwrap();
        assert_eq!(m, MomentType::Other);
    }

    #[test]
    fn test_engagement_defaults_to_neutral() {
        let e: EngagementSignals = serde_json::from_str("{}").unwrap();
        assert_eq!(e.excitement, 50.0);
        assert_eq!(e.emotional_arc, 50.0);
        assert_eq!(e.hook_strength, 50.0);
    }
}

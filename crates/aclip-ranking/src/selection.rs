//! Candidate construction and publish-time selection.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use aclip_models::{ClipCandidate, Platform, PublishState, VideoId, ViralMoment};

use crate::economics::{
    earning_potential, engagement_quality, revenue_rate, safety_score, EngagementWeights,
    SafetyPenalties,
};

/// Named gates and knobs for candidate eligibility.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Candidates must score strictly above this virality to qualify.
    pub virality_gate: f64,
    /// Candidates must score strictly above this safety score to qualify.
    pub safety_gate: f64,
    /// Brand-safety penalty percentages.
    pub penalties: SafetyPenalties,
    /// Engagement sub-signal weights.
    pub engagement_weights: EngagementWeights,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            virality_gate: 70.0,
            safety_gate: 70.0,
            penalties: SafetyPenalties::default(),
            engagement_weights: EngagementWeights::default(),
        }
    }
}

impl RankingConfig {
    /// Env-var overrides for the gates.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            virality_gate: std::env::var("RANKING_VIRALITY_GATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.virality_gate),
            safety_gate: std::env::var("RANKING_SAFETY_GATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.safety_gate),
            ..defaults
        }
    }
}

/// Build a scored candidate from a viral moment for one platform.
///
/// Copyright flags and over-cap durations disqualify outright; everything
/// else just feeds the scores.
pub fn build_candidate(
    source_video_id: VideoId,
    source_discovered_at: DateTime<Utc>,
    niche: aclip_models::Niche,
    moment: &ViralMoment,
    platform: Platform,
    config: &RankingConfig,
) -> ClipCandidate {
    let quality = engagement_quality(&moment.engagement, &config.engagement_weights);
    let safety = safety_score(&moment.brand_safety, &config.penalties);
    let earning = earning_potential(
        moment.virality_score,
        quality,
        revenue_rate(niche),
        safety,
    );

    let mut candidate = ClipCandidate {
        source_video_id,
        source_discovered_at,
        start_time: moment.start_time,
        end_time: moment.end_time,
        moment_type: moment.moment_type,
        quote: moment.quote.clone(),
        virality_score: moment.virality_score,
        engagement_quality: quality,
        engagement: moment.engagement,
        brand_safety: moment.brand_safety,
        safety_score: safety,
        earning_potential: earning,
        niche,
        platform,
        disqualified: false,
        disqualify_reason: None,
    };

    if moment.brand_safety.copyright {
        candidate.disqualify("copyright flag");
    } else if candidate.duration() > platform.max_clip_secs() {
        candidate.disqualify(format!(
            "duration {:.1}s exceeds {} cap of {:.0}s",
            candidate.duration(),
            platform,
            platform.max_clip_secs()
        ));
    }

    candidate
}

/// Whether a candidate passes the score, safety, and dedup gates.
pub fn is_eligible(
    candidate: &ClipCandidate,
    publish_state: &PublishState,
    config: &RankingConfig,
) -> bool {
    if candidate.disqualified {
        return false;
    }
    if candidate.virality_score <= config.virality_gate {
        return false;
    }
    if candidate.safety_score <= config.safety_gate {
        return false;
    }
    if publish_state.contains(&candidate.source_video_id) {
        return false;
    }
    true
}

/// Pick the single best candidate to publish.
///
/// Among eligible candidates, selects the maximum by earning potential;
/// ties break by higher virality score, then earlier discovery time.
/// Returns `None` when nothing qualifies: an explicit no-op, not an
/// error.
pub fn select_best<'a>(
    candidates: &'a [ClipCandidate],
    publish_state: &PublishState,
    config: &RankingConfig,
) -> Option<&'a ClipCandidate> {
    let eligible: Vec<&ClipCandidate> = candidates
        .iter()
        .filter(|c| is_eligible(c, publish_state, config))
        .collect();

    debug!(
        total = candidates.len(),
        eligible = eligible.len(),
        "Filtered publish candidates"
    );

    let best = eligible.into_iter().max_by(|a, b| {
        a.earning_potential
            .partial_cmp(&b.earning_potential)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                a.virality_score
                    .partial_cmp(&b.virality_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            // max_by keeps the later of equal elements, so reverse the
            // discovery comparison to prefer the earlier one
            .then_with(|| b.source_discovered_at.cmp(&a.source_discovered_at))
    });

    if let Some(clip) = best {
        info!(
            video_id = %clip.source_video_id,
            earning_potential = clip.earning_potential,
            virality = clip.virality_score,
            "Selected clip for publishing"
        );
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclip_models::{BrandSafety, EngagementSignals, MomentType, Niche};
    use chrono::Duration;

    fn moment(score: f64, safety: BrandSafety) -> ViralMoment {
        ViralMoment {
            start_time: 10.0,
            end_time: 40.0,
            moment_type: MomentType::Exciting,
            virality_score: score,
            quote: "unbelievable".to_string(),
            reason: None,
            engagement: EngagementSignals {
                excitement: 80.0,
                emotional_arc: 80.0,
                hook_strength: 80.0,
            },
            brand_safety: safety,
        }
    }

    fn candidate(id: &str, score: f64, safety: BrandSafety, offset_secs: i64) -> ClipCandidate {
        build_candidate(
            id.into(),
            Utc::now() + Duration::seconds(offset_secs),
            Niche::Fortnite,
            &moment(score, safety),
            Platform::YoutubeShorts,
            &RankingConfig::default(),
        )
    }

    #[test]
    fn test_copyright_disqualifies_even_top_virality() {
        let copyright = BrandSafety {
            copyright: true,
            ..BrandSafety::clean()
        };
        let candidates = vec![
            candidate("vid00000001", 99.0, copyright, 0),
            candidate("vid00000002", 75.0, BrandSafety::clean(), 0),
        ];

        let best = select_best(
            &candidates,
            &PublishState::default(),
            &RankingConfig::default(),
        )
        .unwrap();
        assert_eq!(best.source_video_id.as_str(), "vid00000002");
    }

    #[test]
    fn test_virality_gate_is_strict() {
        let candidates = vec![candidate("vid00000001", 70.0, BrandSafety::clean(), 0)];
        assert!(select_best(
            &candidates,
            &PublishState::default(),
            &RankingConfig::default()
        )
        .is_none());
    }

    #[test]
    fn test_safety_gate_excludes_penalized_clips() {
        // profanity + violence: safety 56, below the 70 gate
        let unsafe_flags = BrandSafety {
            profanity: true,
            violence: true,
            ..BrandSafety::clean()
        };
        let candidates = vec![candidate("vid00000001", 95.0, unsafe_flags, 0)];
        assert!(select_best(
            &candidates,
            &PublishState::default(),
            &RankingConfig::default()
        )
        .is_none());
    }

    #[test]
    fn test_already_published_source_yields_noop() {
        let candidates = vec![candidate("vid00000001", 90.0, BrandSafety::clean(), 0)];
        let mut state = PublishState::default();
        state.record("vid00000001".into());

        assert!(select_best(&candidates, &state, &RankingConfig::default()).is_none());
    }

    #[test]
    fn test_selects_max_earning_potential() {
        // Same engagement/safety, Fortnite rate; higher virality wins on earning
        let candidates = vec![
            candidate("vid00000001", 80.0, BrandSafety::clean(), 0),
            candidate("vid00000002", 92.0, BrandSafety::clean(), 0),
            candidate("vid00000003", 85.0, BrandSafety::clean(), 0),
        ];
        let best = select_best(
            &candidates,
            &PublishState::default(),
            &RankingConfig::default(),
        )
        .unwrap();
        assert_eq!(best.source_video_id.as_str(), "vid00000002");
    }

    #[test]
    fn test_tie_breaks_by_earlier_discovery() {
        let a = candidate("vid00000001", 85.0, BrandSafety::clean(), 100);
        let b = candidate("vid00000002", 85.0, BrandSafety::clean(), 10);
        let candidates = vec![a, b];
        let best = select_best(
            &candidates,
            &PublishState::default(),
            &RankingConfig::default(),
        )
        .unwrap();
        assert_eq!(best.source_video_id.as_str(), "vid00000002");
    }

    #[test]
    fn test_overlong_clip_disqualified_for_platform() {
        let mut long_moment = moment(90.0, BrandSafety::clean());
        long_moment.end_time = long_moment.start_time + 75.0;
        let clip = build_candidate(
            "vid00000001".into(),
            Utc::now(),
            Niche::Gaming,
            &long_moment,
            Platform::YoutubeShorts,
            &RankingConfig::default(),
        );
        assert!(clip.disqualified);

        // The same moment fits reels
        let reels = build_candidate(
            "vid00000001".into(),
            Utc::now(),
            Niche::Gaming,
            &long_moment,
            Platform::InstagramReels,
            &RankingConfig::default(),
        );
        assert!(!reels.disqualified);
    }
}

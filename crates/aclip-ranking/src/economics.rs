//! Earning-potential economics.
//!
//! Per-niche revenue assumptions, the convex view curve, engagement
//! weighting, and multiplicative brand-safety penalties. All thresholds
//! and percentages live in named config structs, never inline at call
//! sites.

use aclip_models::{BrandSafety, EngagementSignals, Niche};

/// Average revenue per 1000 views (USD) by niche.
pub fn revenue_rate(niche: Niche) -> f64 {
    match niche {
        Niche::Fortnite => 11.5,
        Niche::Horror => 6.0,
        Niche::Roblox => 3.0,
        Niche::Minecraft => 5.0,
        Niche::CallOfDuty => 9.5,
        Niche::Valorant => 8.5,
        Niche::Gaming => 5.5,
    }
}

/// Baseline viral view count by niche.
pub fn base_views(niche: Niche) -> u64 {
    match niche {
        Niche::Fortnite => 150_000,
        Niche::Horror => 100_000,
        Niche::Roblox => 80_000,
        Niche::Minecraft => 120_000,
        Niche::CallOfDuty => 140_000,
        Niche::Valorant => 110_000,
        Niche::Gaming => 90_000,
    }
}

/// Multiplicative brand-safety penalties, expressed as score reductions.
///
/// `0.30` means a flagged issue keeps 70% of the remaining score. Copyright
/// additionally disqualifies outright regardless of the surviving score.
#[derive(Debug, Clone)]
pub struct SafetyPenalties {
    pub profanity: f64,
    pub violence: f64,
    pub controversy: f64,
    pub copyright: f64,
    pub explicit: f64,
}

impl Default for SafetyPenalties {
    fn default() -> Self {
        Self {
            profanity: 0.30,
            violence: 0.20,
            controversy: 0.25,
            copyright: 0.35,
            explicit: 0.40,
        }
    }
}

/// Weights for the engagement sub-signals.
#[derive(Debug, Clone)]
pub struct EngagementWeights {
    pub excitement: f64,
    pub emotional_arc: f64,
    pub hook_strength: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            excitement: 0.40,
            emotional_arc: 0.35,
            hook_strength: 0.25,
        }
    }
}

/// Bounds on the expected-view estimate.
const MIN_EXPECTED_VIEWS: u64 = 1_000;
const MAX_EXPECTED_VIEWS: u64 = 1_000_000;

/// Expected views for a clip: convex in virality, so higher virality
/// disproportionately increases reach. Score 100 maps to 3x the niche
/// baseline.
pub fn expected_views(virality_score: f64, niche: Niche) -> u64 {
    let multiplier = (virality_score.clamp(0.0, 100.0) / 100.0).powf(1.2) * 3.0;
    let views = (base_views(niche) as f64 * multiplier) as u64;
    views.clamp(MIN_EXPECTED_VIEWS, MAX_EXPECTED_VIEWS)
}

/// Weighted engagement quality, 0-100.
pub fn engagement_quality(signals: &EngagementSignals, weights: &EngagementWeights) -> f64 {
    let score = signals.excitement * weights.excitement
        + signals.emotional_arc * weights.emotional_arc
        + signals.hook_strength * weights.hook_strength;
    score.clamp(0.0, 100.0)
}

/// Brand-safety score: starts at 100, reduced multiplicatively per flagged
/// issue.
pub fn safety_score(flags: &BrandSafety, penalties: &SafetyPenalties) -> f64 {
    let mut score = 100.0;
    if flags.profanity {
        score *= 1.0 - penalties.profanity;
    }
    if flags.violence {
        score *= 1.0 - penalties.violence;
    }
    if flags.controversy {
        score *= 1.0 - penalties.controversy;
    }
    if flags.copyright {
        score *= 1.0 - penalties.copyright;
    }
    if flags.explicit {
        score *= 1.0 - penalties.explicit;
    }
    score.clamp(0.0, 100.0)
}

/// Composite earning-potential ranking score.
pub fn earning_potential(
    virality_score: f64,
    engagement_quality: f64,
    revenue_rate: f64,
    safety_score: f64,
) -> f64 {
    let base = (virality_score / 100.0) * (engagement_quality / 100.0) * (revenue_rate / 10.0) * 100.0;
    (base * (safety_score / 100.0)).max(0.0)
}

/// Revenue estimate in USD for reporting.
pub fn estimated_revenue(expected_views: u64, revenue_rate: f64, safety_score: f64) -> f64 {
    let base = (expected_views as f64 / 1000.0) * revenue_rate;
    let revenue = base * (safety_score / 100.0);
    (revenue * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_views_monotone_and_convex() {
        let niche = Niche::Fortnite;
        let v50 = expected_views(50.0, niche);
        let v75 = expected_views(75.0, niche);
        let v100 = expected_views(100.0, niche);
        assert!(v50 < v75 && v75 < v100);
        // Convexity: the second half of the scale gains more than the first
        assert!(v100 - v75 > v75 - v50);
        assert_eq!(v100, 450_000);
    }

    #[test]
    fn test_expected_views_bounded() {
        assert_eq!(expected_views(0.0, Niche::Gaming), 1_000);
        assert!(expected_views(100.0, Niche::Fortnite) <= 1_000_000);
    }

    #[test]
    fn test_engagement_quality_weighted() {
        let signals = EngagementSignals {
            excitement: 90.0,
            emotional_arc: 88.0,
            hook_strength: 92.0,
        };
        let q = engagement_quality(&signals, &EngagementWeights::default());
        assert!((q - 89.8).abs() < 1e-9);
    }

    #[test]
    fn test_safety_penalties_compound_multiplicatively() {
        let penalties = SafetyPenalties::default();
        assert_eq!(safety_score(&BrandSafety::clean(), &penalties), 100.0);

        let profanity_only = BrandSafety {
            profanity: true,
            ..BrandSafety::clean()
        };
        assert!((safety_score(&profanity_only, &penalties) - 70.0).abs() < 1e-9);

        let profanity_and_violence = BrandSafety {
            profanity: true,
            violence: true,
            ..BrandSafety::clean()
        };
        // 100 * 0.7 * 0.8
        assert!((safety_score(&profanity_and_violence, &penalties) - 56.0).abs() < 1e-9);
    }

    #[test]
    fn test_earning_potential_formula() {
        // (85/100) * (89.8/100) * (11.5/10) * 100 = 87.78...
        let ep = earning_potential(85.0, 89.8, 11.5, 100.0);
        assert!((ep - 87.7795).abs() < 1e-3);

        // Safety scales the result down
        let penalized = earning_potential(85.0, 89.8, 11.5, 56.0);
        assert!((penalized - ep * 0.56).abs() < 1e-9);
    }

    #[test]
    fn test_estimated_revenue_rounds_to_cents() {
        let revenue = estimated_revenue(150_000, 11.5, 100.0);
        assert_eq!(revenue, 1725.0);
        let penalized = estimated_revenue(150_000, 11.5, 56.0);
        assert_eq!(penalized, 966.0);
    }
}

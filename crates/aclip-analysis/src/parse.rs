//! Defensive parsing of the analysis service output.
//!
//! The service returns free-form text that usually, but not always,
//! contains the requested JSON. This boundary tolerates markdown fences
//! and surrounding prose, then validates structure strictly and fails
//! closed on anything else.

use serde::Deserialize;
use tracing::warn;

use aclip_models::{BrandSafety, EngagementSignals, MomentType, Transcript, ViralMoment};

use crate::error::{AnalysisError, AnalysisResult};

/// Raw moment as deserialized from service output; every field the
/// validator needs to check is optional here.
#[derive(Debug, Deserialize)]
struct RawMoment {
    start_time: Option<f64>,
    end_time: Option<f64>,
    #[serde(rename = "type")]
    moment_type: Option<MomentType>,
    virality_score: Option<f64>,
    #[serde(default)]
    quote: String,
    reason: Option<String>,
    #[serde(default)]
    engagement: EngagementSignals,
    #[serde(default)]
    brand_safety: BrandSafety,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    moments: Vec<RawMoment>,
}

/// Validated analysis output for one video.
#[derive(Debug, Clone)]
pub struct ScoredAnalysis {
    /// Moments that survived validation
    pub moments: Vec<ViralMoment>,
    /// Mean of the moment scores, 0.0 when no moments survived
    pub aggregate_score: f64,
}

/// Bounds applied during moment validation.
#[derive(Debug, Clone, Copy)]
pub struct MomentBounds {
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
}

impl Default for MomentBounds {
    fn default() -> Self {
        Self {
            min_duration_secs: 15.0,
            max_duration_secs: 60.0,
        }
    }
}

/// Strip a leading/trailing markdown code fence, then cut the text down to
/// the outermost JSON object so surrounding prose does not break parsing.
fn extract_json(text: &str) -> AnalysisResult<&str> {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text = text.trim();

    let start = text
        .find('{')
        .ok_or_else(|| AnalysisError::parse_failed("no JSON object in response"))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| AnalysisError::parse_failed("unterminated JSON object in response"))?;
    if end < start {
        return Err(AnalysisError::parse_failed("malformed JSON object bounds"));
    }

    Ok(&text[start..=end])
}

/// Parse and validate the raw service output against the transcript.
///
/// Invalid moments are dropped with a warning; an output with no valid
/// JSON at all is an error (fails closed, the video is excluded from this
/// run).
pub fn parse_analysis(
    raw: &str,
    transcript: &Transcript,
    bounds: MomentBounds,
) -> AnalysisResult<ScoredAnalysis> {
    let json = extract_json(raw)?;
    let parsed: RawAnalysis =
        serde_json::from_str(json).map_err(|e| AnalysisError::parse_failed(e.to_string()))?;

    let max_time = transcript.duration();
    let mut moments = Vec::new();

    for raw_moment in parsed.moments {
        let (Some(start), Some(end), Some(moment_type), Some(score)) = (
            raw_moment.start_time,
            raw_moment.end_time,
            raw_moment.moment_type,
            raw_moment.virality_score,
        ) else {
            warn!("Dropping moment with missing required fields");
            continue;
        };

        let duration = end - start;
        if duration < bounds.min_duration_secs || duration > bounds.max_duration_secs {
            warn!(duration, "Dropping moment with out-of-bounds duration");
            continue;
        }

        if start < 0.0 || end > max_time {
            warn!(start, end, max_time, "Dropping moment outside transcript range");
            continue;
        }

        moments.push(ViralMoment {
            start_time: start,
            end_time: end,
            moment_type,
            virality_score: score.clamp(0.0, 100.0),
            quote: raw_moment.quote,
            reason: raw_moment.reason,
            engagement: clamp_signals(raw_moment.engagement),
            brand_safety: raw_moment.brand_safety,
        });
    }

    let aggregate_score = if moments.is_empty() {
        0.0
    } else {
        moments.iter().map(|m| m.virality_score).sum::<f64>() / moments.len() as f64
    };

    Ok(ScoredAnalysis {
        moments,
        aggregate_score,
    })
}

fn clamp_signals(signals: EngagementSignals) -> EngagementSignals {
    EngagementSignals {
        excitement: signals.excitement.clamp(0.0, 100.0),
        emotional_arc: signals.emotional_arc.clamp(0.0, 100.0),
        hook_strength: signals.hook_strength.clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aclip_models::{TranscriptSegment, TranscriptSource};

    fn transcript() -> Transcript {
        Transcript::new(
            TranscriptSource::Tier1,
            vec![TranscriptSegment::new(0.0, 300.0, "long video")],
        )
    }

    fn moment_json(start: f64, end: f64, score: f64) -> String {
        format!(
            r#"{{"start_time": {start}, "end_time": {end}, "type": "exciting", "virality_score": {score}, "quote": "wow"}}"#
        )
    }

    #[test]
    fn test_parses_clean_json() {
        let raw = format!(
            r#"{{"overall_virality": 80, "moments": [{}, {}]}}"#,
            moment_json(10.0, 40.0, 80.0),
            moment_json(100.0, 130.0, 90.0)
        );
        let analysis = parse_analysis(&raw, &transcript(), MomentBounds::default()).unwrap();
        assert_eq!(analysis.moments.len(), 2);
        assert_eq!(analysis.aggregate_score, 85.0);
    }

    #[test]
    fn test_tolerates_markdown_fences_and_prose() {
        let raw = format!(
            "Sure! Here is the analysis you asked for:\n```json\n{{\"moments\": [{}]}}\n```\nLet me know if you need more.",
            moment_json(10.0, 40.0, 70.0)
        );
        let analysis = parse_analysis(&raw, &transcript(), MomentBounds::default()).unwrap();
        assert_eq!(analysis.moments.len(), 1);
        assert_eq!(analysis.aggregate_score, 70.0);
    }

    #[test]
    fn test_garbage_fails_closed() {
        let err = parse_analysis("total nonsense", &transcript(), MomentBounds::default())
            .unwrap_err();
        assert!(err.is_permanent_for_run());
    }

    #[test]
    fn test_invalid_moments_dropped() {
        let raw = format!(
            r#"{{"moments": [
                {},
                {{"start_time": 10.0, "end_time": 15.0, "type": "funny", "virality_score": 90}},
                {{"start_time": 280.0, "end_time": 320.0, "type": "funny", "virality_score": 90}},
                {{"end_time": 40.0, "type": "funny", "virality_score": 90}}
            ]}}"#,
            moment_json(10.0, 40.0, 60.0)
        );
        // Too short (5s), beyond transcript end, and missing start_time all drop
        let analysis = parse_analysis(&raw, &transcript(), MomentBounds::default()).unwrap();
        assert_eq!(analysis.moments.len(), 1);
        assert_eq!(analysis.aggregate_score, 60.0);
    }

    #[test]
    fn test_no_moments_scores_zero() {
        let analysis =
            parse_analysis(r#"{"moments": []}"#, &transcript(), MomentBounds::default()).unwrap();
        assert!(analysis.moments.is_empty());
        assert_eq!(analysis.aggregate_score, 0.0);
    }

    #[test]
    fn test_scores_clamped() {
        let raw = format!(r#"{{"moments": [{}]}}"#, moment_json(10.0, 40.0, 140.0));
        let analysis = parse_analysis(&raw, &transcript(), MomentBounds::default()).unwrap();
        assert_eq!(analysis.moments[0].virality_score, 100.0);
    }
}

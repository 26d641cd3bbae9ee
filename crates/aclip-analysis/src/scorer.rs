//! End-to-end transcript scoring.

use tracing::{debug, info};

use aclip_models::{Niche, Transcript};

use crate::client::TextAnalysis;
use crate::error::{AnalysisError, AnalysisResult};
use crate::parse::{parse_analysis, MomentBounds, ScoredAnalysis};
use crate::prompt::{build_analysis_prompt, DEFAULT_TRANSCRIPT_CHAR_BUDGET};

/// Configuration for the scoring step.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    /// Character budget for the transcript body inside the prompt.
    pub transcript_char_budget: usize,
    /// Moment duration bounds enforced during validation.
    pub moment_bounds: MomentBounds,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            transcript_char_budget: DEFAULT_TRANSCRIPT_CHAR_BUDGET,
            moment_bounds: MomentBounds::default(),
        }
    }
}

/// Object-safe seam for the scoring step.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait::async_trait]
pub trait TranscriptScorer: Send + Sync {
    /// Score one transcript for a niche.
    async fn score_transcript(
        &self,
        transcript: &Transcript,
        niche: Niche,
    ) -> AnalysisResult<ScoredAnalysis>;
}

#[async_trait::async_trait]
impl<A: TextAnalysis> TranscriptScorer for ViralityScorer<A> {
    async fn score_transcript(
        &self,
        transcript: &Transcript,
        niche: Niche,
    ) -> AnalysisResult<ScoredAnalysis> {
        self.score(transcript, niche).await
    }
}

/// Scores transcripts through a [`TextAnalysis`] collaborator.
pub struct ViralityScorer<A> {
    analyzer: A,
    config: ScorerConfig,
}

impl<A: TextAnalysis> ViralityScorer<A> {
    pub fn new(analyzer: A, config: ScorerConfig) -> Self {
        Self { analyzer, config }
    }

    /// Score one transcript: build the prompt, invoke the collaborator,
    /// then parse and validate defensively.
    pub async fn score(
        &self,
        transcript: &Transcript,
        niche: Niche,
    ) -> AnalysisResult<ScoredAnalysis> {
        if transcript.is_empty() {
            return Err(AnalysisError::EmptyTranscript);
        }

        let prompt = build_analysis_prompt(transcript, niche, self.config.transcript_char_budget);
        debug!(prompt_len = prompt.len(), niche = %niche, "Running virality analysis");

        let raw = self.analyzer.analyze(&prompt).await?;
        let analysis = parse_analysis(&raw, transcript, self.config.moment_bounds)?;

        info!(
            moments = analysis.moments.len(),
            aggregate = analysis.aggregate_score,
            "Analysis complete"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTextAnalysis;
    use aclip_models::{TranscriptSegment, TranscriptSource};

    fn transcript() -> Transcript {
        Transcript::new(
            TranscriptSource::Tier1,
            vec![TranscriptSegment::new(0.0, 200.0, "gameplay")],
        )
    }

    #[tokio::test]
    async fn test_scores_through_collaborator() {
        let mut analyzer = MockTextAnalysis::new();
        analyzer.expect_analyze().returning(|_| {
            Ok(r#"{"moments": [
                {"start_time": 5.0, "end_time": 35.0, "type": "epic", "virality_score": 88, "quote": "no way"}
            ]}"#
            .to_string())
        });

        let scorer = ViralityScorer::new(analyzer, ScorerConfig::default());
        let analysis = scorer.score(&transcript(), Niche::Valorant).await.unwrap();
        assert_eq!(analysis.aggregate_score, 88.0);
    }

    #[tokio::test]
    async fn test_empty_transcript_rejected() {
        let analyzer = MockTextAnalysis::new();
        let scorer = ViralityScorer::new(analyzer, ScorerConfig::default());
        let empty = Transcript::new(TranscriptSource::Tier2, vec![]);
        let err = scorer.score(&empty, Niche::Gaming).await.unwrap_err();
        assert!(err.is_permanent_for_run());
    }

    #[tokio::test]
    async fn test_parse_failure_fails_closed() {
        let mut analyzer = MockTextAnalysis::new();
        analyzer
            .expect_analyze()
            .returning(|_| Ok("I could not find any structured data, sorry!".to_string()));

        let scorer = ViralityScorer::new(analyzer, ScorerConfig::default());
        let err = scorer.score(&transcript(), Niche::Gaming).await.unwrap_err();
        assert!(err.is_permanent_for_run());
    }
}

//! Virality scoring against an external text-analysis service.
//!
//! The service's free-form output is interpreted behind a strict
//! parse/validate boundary that fails closed; a single video's malformed
//! analysis never crashes a batch.

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod scorer;

pub use client::{GeminiAnalyzer, TextAnalysis, DEFAULT_MODELS};
pub use error::{AnalysisError, AnalysisResult};
pub use parse::{parse_analysis, MomentBounds, ScoredAnalysis};
pub use prompt::build_analysis_prompt;
pub use scorer::{ScorerConfig, TranscriptScorer, ViralityScorer};

#[cfg(any(test, feature = "mocks"))]
pub use client::MockTextAnalysis;
#[cfg(any(test, feature = "mocks"))]
pub use scorer::MockTranscriptScorer;

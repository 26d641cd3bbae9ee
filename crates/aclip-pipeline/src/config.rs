//! Pipeline configuration.

use std::time::Duration;

/// Orchestrator configuration.
///
/// Every gating threshold lives here as a named, overridable field; stage
/// code never carries inline literals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum videos pulled into the analysis phase per run.
    pub max_videos_to_analyze: usize,
    /// Virality threshold (inclusive) for the selection gate.
    pub virality_threshold: f64,
    /// Maximum videos that proceed to the creation phase per run.
    pub max_videos_to_process: usize,
    /// Concurrency bound for the API-only analysis phase.
    pub analysis_concurrency: usize,
    /// Concurrency bound for the detection-sensitive creation phase.
    /// Deliberately low; parallel fetches raise detection risk.
    pub creation_concurrency: usize,
    /// Run-level deadline: stops scheduling of not-yet-started work.
    pub run_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_videos_to_analyze: 100,
            virality_threshold: 70.0,
            max_videos_to_process: 2,
            analysis_concurrency: 8,
            creation_concurrency: 1,
            run_timeout: Duration::from_secs(45 * 60),
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_videos_to_analyze: env_parse("PIPELINE_MAX_ANALYZE", defaults.max_videos_to_analyze),
            virality_threshold: env_parse("PIPELINE_VIRALITY_THRESHOLD", defaults.virality_threshold),
            max_videos_to_process: env_parse("PIPELINE_MAX_PROCESS", defaults.max_videos_to_process),
            analysis_concurrency: env_parse(
                "PIPELINE_ANALYSIS_CONCURRENCY",
                defaults.analysis_concurrency,
            )
            .max(1),
            creation_concurrency: env_parse(
                "PIPELINE_CREATION_CONCURRENCY",
                defaults.creation_concurrency,
            )
            .max(1),
            run_timeout: Duration::from_secs(env_parse(
                "PIPELINE_RUN_TIMEOUT_SECS",
                defaults.run_timeout.as_secs(),
            )),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.virality_threshold, 70.0);
        assert_eq!(config.max_videos_to_process, 2);
        assert!(config.creation_concurrency < config.analysis_concurrency);
    }
}

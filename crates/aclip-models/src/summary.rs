//! Per-run summary models.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::platform::Platform;
use crate::video::VideoId;

/// One per-video failure recorded during a run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoFailure {
    /// Video that failed
    pub video_id: VideoId,
    /// Stage the failure occurred in ("analyzing", "creating", ...)
    pub stage: String,
    /// Human-readable cause
    pub reason: String,
    /// Terminal failures are never retried on later cycles
    #[serde(default)]
    pub terminal: bool,
}

/// Outcome of dispatching the selected clip to one platform.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlatformDispatch {
    pub platform: Platform,
    pub success: bool,
    /// Platform post id on success, error detail on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Aggregated outcome of one pipeline run.
///
/// Always produced, including under partial failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: String,

    /// Run start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// Run end time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Videos ingested from discovery this run
    #[serde(default)]
    pub discovered: usize,

    /// Videos successfully analyzed (score persisted)
    #[serde(default)]
    pub analyzed: usize,

    /// Videos that cleared the selection gate
    #[serde(default)]
    pub qualified: usize,

    /// Clip candidates produced by the creation stage
    #[serde(default)]
    pub clips_generated: usize,

    /// Published clips this run (0 or 1)
    #[serde(default)]
    pub published: usize,

    /// Videos failed this run
    #[serde(default)]
    pub failed: usize,

    /// Whether the run hit its deadline before all work was scheduled
    #[serde(default)]
    pub deadline_hit: bool,

    /// Per-video failure reasons
    #[serde(default)]
    pub failures: Vec<VideoFailure>,

    /// Per-platform outcomes for the selected clip, if one was selected
    #[serde(default)]
    pub dispatches: Vec<PlatformDispatch>,
}

impl RunSummary {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    /// Record a per-video failure and bump the failed count.
    pub fn record_failure(
        &mut self,
        video_id: VideoId,
        stage: impl Into<String>,
        reason: impl Into<String>,
        terminal: bool,
    ) {
        self.failed += 1;
        self.failures.push(VideoFailure {
            video_id,
            stage: stage.into(),
            reason: reason.into(),
            terminal,
        });
    }

    /// Close the summary with the current time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_failure_counts() {
        let mut summary = RunSummary::new("run-1");
        summary.record_failure("vid00000001".into(), "analyzing", "no transcript", false);
        summary.record_failure("vid00000002".into(), "analyzing", "video deleted", true);
        assert_eq!(summary.failed, 2);
        assert!(summary.failures[1].terminal);
    }
}

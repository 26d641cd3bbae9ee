//! Publish dedup state.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::video::VideoId;

/// Source videos that already had a clip published, plus the last run time.
///
/// Singleton persisted resource with single-writer discipline: only the
/// earning-ranking stage mutates it, and only after a successful dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct PublishState {
    /// Source video ids with at least one published clip
    #[serde(default)]
    pub published: BTreeSet<VideoId>,

    /// When the last pipeline run finished
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
}

impl PublishState {
    pub fn contains(&self, id: &VideoId) -> bool {
        self.published.contains(id)
    }

    /// Record a publish. Returns false if the id was already present.
    pub fn record(&mut self, id: VideoId) -> bool {
        self.published.insert(id)
    }

    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_idempotent() {
        let mut state = PublishState::default();
        assert!(state.record("vid00000001".into()));
        assert!(!state.record("vid00000001".into()));
        assert_eq!(state.len(), 1);
        assert!(state.contains(&"vid00000001".into()));
    }
}

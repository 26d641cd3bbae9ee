//! Persisted publish dedup state.
//!
//! Single-writer discipline: only the earning-ranking stage mutates this
//! store, and only after at least one platform dispatch succeeded. The
//! read-modify-write happens under one write lock so concurrent platform
//! dispatch cannot double-record.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use aclip_models::{PublishState, VideoId};

use crate::error::RegistryResult;
use crate::store::write_atomic;

/// File-backed store for the singleton [`PublishState`].
pub struct PublishStore {
    path: PathBuf,
    state: RwLock<PublishState>,
}

impl PublishStore {
    /// Open (or create) the publish state at the given JSON file.
    pub async fn open(path: impl Into<PathBuf>) -> RegistryResult<Self> {
        let path = path.into();
        let state = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            let state: PublishState = serde_json::from_str(&raw)?;
            info!(path = %path.display(), published = state.len(), "Loaded publish state");
            state
        } else {
            debug!(path = %path.display(), "Starting empty publish state");
            PublishState::default()
        };

        Ok(Self {
            path,
            state: RwLock::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a source video already had a clip published.
    pub async fn contains(&self, id: &VideoId) -> bool {
        self.state.read().await.contains(id)
    }

    /// Snapshot of the current state.
    pub async fn snapshot(&self) -> PublishState {
        self.state.read().await.clone()
    }

    /// Record a successful publish. Returns false if the id was already
    /// present (the caller double-published somewhere).
    pub async fn record_published(&self, id: VideoId) -> RegistryResult<bool> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let inserted = next.record(id);
        self.persist(&next).await?;
        *state = next;
        Ok(inserted)
    }

    /// Stamp the end of a run.
    pub async fn set_last_run(&self, at: DateTime<Utc>) -> RegistryResult<()> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        next.last_run = Some(at);
        self.persist(&next).await?;
        *state = next;
        Ok(())
    }

    async fn persist(&self, state: &PublishState) -> RegistryResult<()> {
        let payload = serde_json::to_vec_pretty(state)?;
        write_atomic(&self.path, &payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_and_contains() {
        let dir = tempfile::tempdir().unwrap();
        let store = PublishStore::open(dir.path().join("publish.json"))
            .await
            .unwrap();

        assert!(!store.contains(&"vid00000001".into()).await);
        assert!(store.record_published("vid00000001".into()).await.unwrap());
        assert!(store.contains(&"vid00000001".into()).await);

        // Second record of the same id reports the duplicate
        assert!(!store.record_published("vid00000001".into()).await.unwrap());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("publish.json");

        {
            let store = PublishStore::open(&path).await.unwrap();
            store.record_published("vid00000001".into()).await.unwrap();
            store.set_last_run(Utc::now()).await.unwrap();
        }

        let reopened = PublishStore::open(&path).await.unwrap();
        assert!(reopened.contains(&"vid00000001".into()).await);
        assert!(reopened.snapshot().await.last_run.is_some());
    }
}

//! File-backed video registry.
//!
//! Records live in a single JSON file, rewritten atomically (write to a
//! temp file in the same directory, then rename) so a crash mid-write
//! never leaves a partial registry on disk. An in-memory map under an
//! async RwLock serves the query shapes; every mutation is persisted
//! before it becomes visible to readers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use aclip_models::{VideoId, VideoRecord, VideoStatus};

use crate::error::{RegistryError, RegistryResult};

/// Outcome of ingesting a discovered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// New record stored
    Inserted,
    /// Previously failed (non-terminal) record reset for another attempt
    Reset,
    /// Record already tracked and still in flight or finished
    AlreadyTracked,
    /// Record permanently excluded (terminal failure)
    Terminal,
}

/// Durable store of per-video lifecycle state.
pub struct VideoRegistry {
    path: PathBuf,
    records: RwLock<BTreeMap<VideoId, VideoRecord>>,
}

impl VideoRegistry {
    /// Open (or create) a registry backed by the given JSON file.
    pub async fn open(path: impl Into<PathBuf>) -> RegistryResult<Self> {
        let path = path.into();
        let records = if tokio::fs::try_exists(&path).await? {
            let raw = tokio::fs::read_to_string(&path).await?;
            let list: Vec<VideoRecord> = serde_json::from_str(&raw)?;
            let count = list.len();
            let map = list.into_iter().map(|r| (r.id.clone(), r)).collect();
            info!(path = %path.display(), count, "Loaded video registry");
            map
        } else {
            debug!(path = %path.display(), "Starting empty video registry");
            BTreeMap::new()
        };

        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ingest a record from the discovery collaborator.
    ///
    /// New ids are stored as `Discovered`. A record that failed a previous
    /// run non-terminally is reset to `Discovered` so the next cycle can
    /// retry it; terminal failures stay excluded.
    pub async fn ingest(&self, record: VideoRecord) -> RegistryResult<IngestOutcome> {
        let mut records = self.records.write().await;

        let outcome = match records.get(&record.id) {
            None => {
                records.insert(record.id.clone(), record);
                IngestOutcome::Inserted
            }
            Some(existing) if existing.failure_terminal => IngestOutcome::Terminal,
            Some(existing) if existing.status == VideoStatus::Failed => {
                let mut reset = existing.clone();
                reset.status = VideoStatus::Discovered;
                reset.virality_score = None;
                reset.analyzed_at = None;
                reset.failure = None;
                records.insert(reset.id.clone(), reset);
                IngestOutcome::Reset
            }
            Some(_) => IngestOutcome::AlreadyTracked,
        };

        if matches!(outcome, IngestOutcome::Inserted | IngestOutcome::Reset) {
            self.persist(&records).await?;
        }

        Ok(outcome)
    }

    /// Fetch a single record.
    pub async fn get(&self, id: &VideoId) -> RegistryResult<VideoRecord> {
        let records = self.records.read().await;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(id.clone()))
    }

    /// Records in the given status, ordered by discovery time, oldest first.
    pub async fn get_by_status(
        &self,
        status: VideoStatus,
        limit: usize,
    ) -> RegistryResult<Vec<VideoRecord>> {
        let records = self.records.read().await;
        let mut matching: Vec<VideoRecord> = records
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.discovered_at.cmp(&b.discovered_at));
        matching.truncate(limit);
        Ok(matching)
    }

    /// Scored records with score >= threshold, descending by score, ties
    /// broken by earlier discovery time.
    pub async fn get_top_scored(
        &self,
        limit: usize,
        threshold_inclusive: f64,
    ) -> RegistryResult<Vec<VideoRecord>> {
        let records = self.records.read().await;
        let mut scored: Vec<VideoRecord> = records
            .values()
            .filter(|r| r.score().is_some_and(|s| s >= threshold_inclusive))
            .cloned()
            .collect();
        scored.sort_by(|a, b| {
            let sa = a.score().unwrap_or(0.0);
            let sb = b.score().unwrap_or(0.0);
            sb.partial_cmp(&sa)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.discovered_at.cmp(&b.discovered_at))
        });
        scored.truncate(limit);
        Ok(scored)
    }

    /// Analyzed videos that clear the selection gate, best first.
    ///
    /// The sole boundary controlling how many videos proceed to the
    /// expensive creation stage. Never pads with sub-threshold items.
    pub async fn select_for_creation(
        &self,
        threshold: f64,
        limit: usize,
    ) -> RegistryResult<Vec<VideoRecord>> {
        let top = self.get_top_scored(usize::MAX, threshold).await?;
        Ok(top
            .into_iter()
            .filter(|r| r.status == VideoStatus::Analyzed)
            .take(limit)
            .collect())
    }

    /// Advance a record's status, optionally persisting a score.
    ///
    /// Fails with `NotFound` for unknown ids and `InvalidTransition` when
    /// `new_status` does not strictly advance the current status. The write
    /// is atomic per record: the in-memory record only changes after the
    /// new state has been persisted.
    pub async fn update_status(
        &self,
        id: &VideoId,
        new_status: VideoStatus,
        score: Option<f64>,
    ) -> RegistryResult<VideoRecord> {
        let mut records = self.records.write().await;

        let current = records
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        if !current.status.can_advance_to(new_status) {
            return Err(RegistryError::InvalidTransition {
                id: id.clone(),
                from: current.status,
                to: new_status,
            });
        }

        if new_status == VideoStatus::Analyzed && score.is_none() {
            return Err(RegistryError::MissingScore(id.clone()));
        }

        let mut updated = current.clone();
        updated.status = new_status;
        if let Some(score) = score {
            updated.virality_score = Some(score.clamp(0.0, 100.0));
        }
        match new_status {
            VideoStatus::Analyzed => updated.analyzed_at = Some(Utc::now()),
            VideoStatus::Published => updated.processed_at = Some(Utc::now()),
            _ => {}
        }

        let mut next = records.clone();
        next.insert(id.clone(), updated.clone());
        self.persist(&next).await?;
        *records = next;

        debug!(video_id = %id, status = %new_status, "Updated video status");
        Ok(updated)
    }

    /// Mark a record failed for this run, recording the cause.
    ///
    /// Terminal failures (video deleted/private) are permanently excluded
    /// from future ingest.
    pub async fn mark_failed(
        &self,
        id: &VideoId,
        reason: impl Into<String>,
        terminal: bool,
    ) -> RegistryResult<VideoRecord> {
        let reason = reason.into();
        let mut records = self.records.write().await;

        let current = records
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        if current.status == VideoStatus::Failed && !terminal {
            warn!(video_id = %id, "Video already failed this run");
            return Ok(current.clone());
        }

        let mut updated = current.clone();
        updated.status = VideoStatus::Failed;
        updated.failure = Some(reason);
        updated.failure_terminal = updated.failure_terminal || terminal;

        let mut next = records.clone();
        next.insert(id.clone(), updated.clone());
        self.persist(&next).await?;
        *records = next;

        Ok(updated)
    }

    /// Record how a transcript was obtained.
    pub async fn set_transcription_source(
        &self,
        id: &VideoId,
        source: aclip_models::TranscriptSource,
    ) -> RegistryResult<()> {
        let mut records = self.records.write().await;
        let current = records
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let mut updated = current.clone();
        updated.transcription_source = source;

        let mut next = records.clone();
        next.insert(id.clone(), updated);
        self.persist(&next).await?;
        *records = next;
        Ok(())
    }

    /// Total number of tracked records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Write the full record set to disk atomically.
    async fn persist(&self, records: &BTreeMap<VideoId, VideoRecord>) -> RegistryResult<()> {
        let list: Vec<&VideoRecord> = records.values().collect();
        let payload = serde_json::to_vec_pretty(&list)?;
        write_atomic(&self.path, &payload).await
    }
}

/// Replace-on-write: write to a temp file in the target directory, flush,
/// then rename over the destination.
pub(crate) async fn write_atomic(path: &Path, payload: &[u8]) -> RegistryResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent).await?;

    let payload = payload.to_vec();
    let path = path.to_path_buf();
    let parent = parent.to_path_buf();

    // NamedTempFile is blocking; do the write off the async runtime.
    tokio::task::spawn_blocking(move || -> RegistryResult<()> {
        use std::io::Write;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
        tmp.write_all(&payload)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| RegistryError::Io(e.error))?;
        Ok(())
    })
    .await
    .map_err(|e| RegistryError::Io(std::io::Error::other(e)))?
}

//! Publish-time single selection and multi-platform dispatch.
//!
//! At most one candidate is published per run. The selected clip is
//! dispatched to each enabled platform sequentially with a fixed delay in
//! between; per-platform failures are recorded independently and never
//! block the remaining platforms.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use aclip_models::{ClipCandidate, ClipMetadata, Platform, PlatformDispatch};
use aclip_registry::PublishStore;

use crate::error::RankingResult;
use crate::selection::{select_best, RankingConfig};
use crate::seo::generate_metadata;

/// Platform publish adapter collaborator.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Which platform this adapter publishes to.
    fn platform(&self) -> Platform;

    /// Upload the clip; returns the platform post id.
    async fn publish(
        &self,
        clip: &ClipCandidate,
        metadata: &ClipMetadata,
    ) -> RankingResult<String>;
}

/// Dispatch configuration.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Fixed delay between consecutive platform dispatches.
    pub inter_platform_delay: Duration,
    /// Eligibility gates and scoring knobs.
    pub ranking: RankingConfig,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            // The original staggers uploads by hours; runs inside tests
            // override this to zero.
            inter_platform_delay: Duration::from_secs(30 * 60),
            ranking: RankingConfig::default(),
        }
    }
}

/// Outcome of the publish stage for one run.
#[derive(Debug, Default)]
pub struct PublishOutcome {
    /// The clip that was selected, if any
    pub selected: Option<ClipCandidate>,
    /// Per-platform dispatch results
    pub dispatches: Vec<PlatformDispatch>,
}

impl PublishOutcome {
    /// At least one platform accepted the clip.
    pub fn published(&self) -> bool {
        self.dispatches.iter().any(|d| d.success)
    }
}

/// Publishes the single best eligible candidate per run.
pub struct SmartPublisher {
    adapters: Vec<Box<dyn PlatformPublisher>>,
    config: PublisherConfig,
}

impl SmartPublisher {
    pub fn new(adapters: Vec<Box<dyn PlatformPublisher>>, config: PublisherConfig) -> Self {
        Self { adapters, config }
    }

    /// Select and dispatch at most one clip.
    ///
    /// Nothing eligible is an explicit no-op. The publish state gains the
    /// source id only after at least one platform succeeded, so a fully
    /// failed dispatch leaves the clip selectable on a later run.
    pub async fn publish_best(
        &self,
        candidates: &[ClipCandidate],
        store: &PublishStore,
    ) -> RankingResult<PublishOutcome> {
        let state = store.snapshot().await;

        let Some(selected) = select_best(candidates, &state, &self.config.ranking) else {
            info!("No eligible candidates, publishing nothing");
            return Ok(PublishOutcome::default());
        };
        let selected = selected.clone();

        let mut dispatches = Vec::new();
        let last = self.adapters.len().saturating_sub(1);

        for (i, adapter) in self.adapters.iter().enumerate() {
            let platform = adapter.platform();
            let metadata = generate_metadata(&selected, platform);

            match adapter.publish(&selected, &metadata).await {
                Ok(post_id) => {
                    info!(platform = %platform, post_id = %post_id, "Published clip");
                    dispatches.push(PlatformDispatch {
                        platform,
                        success: true,
                        detail: Some(post_id),
                    });
                }
                Err(e) => {
                    warn!(platform = %platform, error = %e, "Platform dispatch failed");
                    dispatches.push(PlatformDispatch {
                        platform,
                        success: false,
                        detail: Some(e.to_string()),
                    });
                }
            }

            if i != last && !self.config.inter_platform_delay.is_zero() {
                tokio::time::sleep(self.config.inter_platform_delay).await;
            }
        }

        let outcome = PublishOutcome {
            selected: Some(selected.clone()),
            dispatches,
        };

        if outcome.published() {
            if !store
                .record_published(selected.source_video_id.clone())
                .await?
            {
                error!(
                    video_id = %selected.source_video_id,
                    "Publish state already contained the dispatched source"
                );
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::build_candidate;
    use aclip_models::{BrandSafety, EngagementSignals, MomentType, Niche, ViralMoment};
    use chrono::Utc;

    fn immediate_config() -> PublisherConfig {
        PublisherConfig {
            inter_platform_delay: Duration::ZERO,
            ranking: RankingConfig::default(),
        }
    }

    fn candidate(id: &str, score: f64) -> ClipCandidate {
        let moment = ViralMoment {
            start_time: 5.0,
            end_time: 35.0,
            moment_type: MomentType::Epic,
            virality_score: score,
            quote: "what a finish".to_string(),
            reason: None,
            engagement: EngagementSignals::default(),
            brand_safety: BrandSafety::clean(),
        };
        build_candidate(
            id.into(),
            Utc::now(),
            Niche::Fortnite,
            &moment,
            Platform::YoutubeShorts,
            &RankingConfig::default(),
        )
    }

    fn adapter(platform: Platform, succeed: bool) -> Box<dyn PlatformPublisher> {
        let mut mock = MockPlatformPublisher::new();
        mock.expect_platform().return_const(platform);
        if succeed {
            mock.expect_publish()
                .returning(move |_, _| Ok(format!("{platform}-post-1")));
        } else {
            mock.expect_publish().returning(move |_, _| {
                Err(crate::error::RankingError::dispatch(platform, "upload failed"))
            });
        }
        Box::new(mock)
    }

    async fn store() -> (tempfile::TempDir, PublishStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = PublishStore::open(dir.path().join("publish.json"))
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_publishes_single_best_and_records_state() {
        let (_dir, store) = store().await;
        let publisher = SmartPublisher::new(
            vec![
                adapter(Platform::YoutubeShorts, true),
                adapter(Platform::Tiktok, true),
            ],
            immediate_config(),
        );

        let candidates = vec![candidate("vid00000001", 80.0), candidate("vid00000002", 95.0)];
        let outcome = publisher.publish_best(&candidates, &store).await.unwrap();

        assert!(outcome.published());
        assert_eq!(outcome.dispatches.len(), 2);
        assert_eq!(
            outcome.selected.unwrap().source_video_id.as_str(),
            "vid00000002"
        );
        assert!(store.contains(&"vid00000002".into()).await);
        assert!(!store.contains(&"vid00000001".into()).await);
    }

    #[tokio::test]
    async fn test_partial_platform_failure_still_publishes() {
        let (_dir, store) = store().await;
        let publisher = SmartPublisher::new(
            vec![
                adapter(Platform::YoutubeShorts, false),
                adapter(Platform::Tiktok, true),
                adapter(Platform::InstagramReels, false),
            ],
            immediate_config(),
        );

        let candidates = vec![candidate("vid00000001", 90.0)];
        let outcome = publisher.publish_best(&candidates, &store).await.unwrap();

        assert!(outcome.published());
        assert_eq!(outcome.dispatches.iter().filter(|d| d.success).count(), 1);
        assert_eq!(outcome.dispatches.len(), 3);
        assert!(store.contains(&"vid00000001".into()).await);
    }

    #[tokio::test]
    async fn test_total_dispatch_failure_leaves_state_untouched() {
        let (_dir, store) = store().await;
        let publisher = SmartPublisher::new(
            vec![adapter(Platform::YoutubeShorts, false)],
            immediate_config(),
        );

        let candidates = vec![candidate("vid00000001", 90.0)];
        let outcome = publisher.publish_best(&candidates, &store).await.unwrap();

        assert!(!outcome.published());
        assert!(outcome.selected.is_some());
        assert!(!store.contains(&"vid00000001".into()).await);
    }

    #[tokio::test]
    async fn test_rerun_with_published_source_is_noop() {
        let (_dir, store) = store().await;
        store.record_published("vid00000001".into()).await.unwrap();

        let mut mock = MockPlatformPublisher::new();
        mock.expect_platform().return_const(Platform::YoutubeShorts);
        mock.expect_publish().times(0);
        let publisher = SmartPublisher::new(vec![Box::new(mock)], immediate_config());

        let candidates = vec![candidate("vid00000001", 95.0)];
        let outcome = publisher.publish_best(&candidates, &store).await.unwrap();

        assert!(outcome.selected.is_none());
        assert!(outcome.dispatches.is_empty());
        assert!(!outcome.published());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_noop() {
        let (_dir, store) = store().await;
        let publisher = SmartPublisher::new(vec![], immediate_config());
        let outcome = publisher.publish_best(&[], &store).await.unwrap();
        assert!(outcome.selected.is_none());
        assert!(!outcome.published());
    }
}

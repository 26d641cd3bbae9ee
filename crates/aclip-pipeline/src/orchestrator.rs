//! The run orchestrator.
//!
//! Drives `Idle -> Discovering -> Analyzing -> Selecting -> Creating ->
//! Publishing -> Cleanup` strictly in sequence. Within a phase, per-video
//! work runs under a semaphore bound; phases never overlap because
//! ranking needs complete, consistent upstream scores. An empty result at
//! any gate short-circuits straight to cleanup.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, histogram};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use aclip_analysis::{AnalysisError, TranscriptScorer};
use aclip_models::{ClipCandidate, RunSummary, VideoId, VideoRecord, VideoStatus, ViralMoment};
use aclip_ranking::SmartPublisher;
use aclip_registry::{IngestOutcome, PublishStore, RegistryError, VideoRegistry};
use aclip_transcript::{retry_async, AcquisitionOutcome, RetryConfig, TranscriptProvider};

use crate::collaborators::{ClipGenerator, Discovery};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::logging::VideoLogger;
use crate::stage::RunStage;

/// A per-video failure inside a stage; never aborts the batch.
#[derive(Debug)]
struct VideoFault {
    reason: String,
    terminal: bool,
}

/// Result of analyzing one video.
struct AnalyzeReport {
    video_id: VideoId,
    result: Result<(f64, Vec<ViralMoment>), VideoFault>,
}

/// Result of generating clips for one video.
struct CreateReport {
    video_id: VideoId,
    result: Result<Vec<ClipCandidate>, VideoFault>,
}

/// Classify a registry error: infrastructure failures are run-fatal,
/// everything else collapses into a per-video fault.
fn registry_fault(e: RegistryError) -> Result<VideoFault, PipelineError> {
    if e.is_infrastructure() {
        Err(e.into())
    } else {
        Ok(VideoFault {
            reason: e.to_string(),
            terminal: false,
        })
    }
}

/// Orchestrates one pipeline run end to end.
pub struct Pipeline {
    registry: Arc<VideoRegistry>,
    publish_store: Arc<PublishStore>,
    discovery: Arc<dyn Discovery>,
    transcripts: Arc<dyn TranscriptProvider>,
    scorer: Arc<dyn TranscriptScorer>,
    clips: Arc<dyn ClipGenerator>,
    publisher: SmartPublisher,
    config: PipelineConfig,
}

impl Pipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry: Arc<VideoRegistry>,
        publish_store: Arc<PublishStore>,
        discovery: Arc<dyn Discovery>,
        transcripts: Arc<dyn TranscriptProvider>,
        scorer: Arc<dyn TranscriptScorer>,
        clips: Arc<dyn ClipGenerator>,
        publisher: SmartPublisher,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            publish_store,
            discovery,
            transcripts,
            scorer,
            clips,
            publisher,
            config,
        }
    }

    /// Execute one full run.
    ///
    /// Always yields a summary, including under partial failure; only
    /// infrastructure failures (registry unreachable) error out.
    pub async fn run(&self) -> PipelineResult<RunSummary> {
        let run_id = Uuid::new_v4().to_string();
        let mut summary = RunSummary::new(&run_id);
        let started = Instant::now();
        let deadline = started + self.config.run_timeout;

        counter!("aclip_runs_total").increment(1);
        info!(run_id = %run_id, "Pipeline run starting");

        self.run_discovering(&mut summary).await?;

        let moments = self.run_analyzing(&mut summary, deadline).await?;

        let selected = self.run_selecting(&mut summary).await?;

        if selected.is_empty() {
            info!(run_id = %run_id, "No videos cleared the selection gate, skipping to cleanup");
        } else {
            let candidates = self
                .run_creating(&mut summary, selected, &moments, deadline)
                .await?;

            if candidates.is_empty() {
                info!(run_id = %run_id, "No clip candidates produced, skipping to cleanup");
            } else {
                self.run_publishing(&mut summary, &candidates).await?;
            }
        }

        self.run_cleanup(&mut summary).await?;

        histogram!("aclip_run_duration_seconds").record(started.elapsed().as_secs_f64());
        info!(
            run_id = %run_id,
            analyzed = summary.analyzed,
            qualified = summary.qualified,
            published = summary.published,
            failed = summary.failed,
            "Pipeline run finished"
        );

        Ok(summary)
    }

    /// Drain the discovery collaborator into the registry.
    async fn run_discovering(&self, summary: &mut RunSummary) -> PipelineResult<()> {
        info!(stage = %RunStage::Discovering, "Entering stage");

        let records = match self.discovery.discover().await {
            Ok(records) => records,
            Err(e) => {
                // Discovery is outside this core; a failed crawl just means
                // nothing new this run.
                warn!(error = %e, "Discovery collaborator failed, continuing with known videos");
                Vec::new()
            }
        };

        for record in records {
            match self.registry.ingest(record).await? {
                IngestOutcome::Inserted | IngestOutcome::Reset => summary.discovered += 1,
                IngestOutcome::AlreadyTracked | IngestOutcome::Terminal => {}
            }
        }

        counter!("aclip_videos_discovered_total").increment(summary.discovered as u64);
        info!(discovered = summary.discovered, "Discovery ingest complete");
        Ok(())
    }

    /// Transcript acquisition + scoring for every discovered video.
    async fn run_analyzing(
        &self,
        summary: &mut RunSummary,
        deadline: Instant,
    ) -> PipelineResult<HashMap<VideoId, Vec<ViralMoment>>> {
        info!(stage = %RunStage::Analyzing, "Entering stage");

        let videos = self
            .registry
            .get_by_status(VideoStatus::Discovered, self.config.max_videos_to_analyze)
            .await?;

        let total = videos.len();
        info!(total, "Analyzing discovered videos");

        let semaphore = Arc::new(Semaphore::new(self.config.analysis_concurrency));
        let mut tasks: JoinSet<PipelineResult<AnalyzeReport>> = JoinSet::new();

        for video in videos {
            if Instant::now() >= deadline {
                warn!("Run deadline reached, not scheduling remaining analysis work");
                summary.deadline_hit = true;
                break;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(PipelineError::task_join)?;
            let registry = Arc::clone(&self.registry);
            let transcripts = Arc::clone(&self.transcripts);
            let scorer = Arc::clone(&self.scorer);

            tasks.spawn(async move {
                let _permit = permit;
                analyze_one(registry, transcripts, scorer, video).await
            });
        }

        let mut moments = HashMap::new();

        while let Some(joined) = tasks.join_next().await {
            let report = joined.map_err(PipelineError::task_join)??;
            match report.result {
                Ok((score, video_moments)) => {
                    summary.analyzed += 1;
                    counter!("aclip_videos_analyzed_total").increment(1);
                    if score >= self.config.virality_threshold {
                        info!(video_id = %report.video_id, score, "Above selection threshold");
                    }
                    moments.insert(report.video_id, video_moments);
                }
                Err(fault) => {
                    counter!("aclip_videos_failed_total").increment(1);
                    summary.record_failure(
                        report.video_id,
                        RunStage::Analyzing.as_str(),
                        fault.reason,
                        fault.terminal,
                    );
                }
            }
        }

        info!(
            analyzed = summary.analyzed,
            failed = summary.failed,
            "Analysis phase complete"
        );
        Ok(moments)
    }

    /// The selection gate.
    async fn run_selecting(&self, summary: &mut RunSummary) -> PipelineResult<Vec<VideoRecord>> {
        info!(stage = %RunStage::Selecting, "Entering stage");

        let selected = self
            .registry
            .select_for_creation(
                self.config.virality_threshold,
                self.config.max_videos_to_process,
            )
            .await?;

        summary.qualified = selected.len();
        counter!("aclip_videos_qualified_total").increment(selected.len() as u64);
        info!(
            qualified = selected.len(),
            threshold = self.config.virality_threshold,
            "Selection gate complete"
        );
        Ok(selected)
    }

    /// Clip creation for the selected videos, at low concurrency.
    async fn run_creating(
        &self,
        summary: &mut RunSummary,
        selected: Vec<VideoRecord>,
        moments: &HashMap<VideoId, Vec<ViralMoment>>,
        deadline: Instant,
    ) -> PipelineResult<Vec<ClipCandidate>> {
        info!(stage = %RunStage::Creating, "Entering stage");

        let semaphore = Arc::new(Semaphore::new(self.config.creation_concurrency));
        let mut tasks: JoinSet<PipelineResult<CreateReport>> = JoinSet::new();

        for video in selected {
            if Instant::now() >= deadline {
                warn!("Run deadline reached, not scheduling remaining creation work");
                summary.deadline_hit = true;
                break;
            }

            // Advancing to Processing before the spawn keeps the status
            // write outside the concurrent section.
            if let Err(e) = self
                .registry
                .update_status(&video.id, VideoStatus::Processing, None)
                .await
            {
                let fault = registry_fault(e)?;
                summary.record_failure(
                    video.id.clone(),
                    RunStage::Creating.as_str(),
                    fault.reason,
                    fault.terminal,
                );
                continue;
            }

            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(PipelineError::task_join)?;
            let registry = Arc::clone(&self.registry);
            let clips = Arc::clone(&self.clips);
            let video_moments = moments.get(&video.id).cloned().unwrap_or_default();

            tasks.spawn(async move {
                let _permit = permit;
                create_one(registry, clips, video, video_moments).await
            });
        }

        let mut candidates = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let report = joined.map_err(PipelineError::task_join)??;
            match report.result {
                Ok(mut clips) => {
                    summary.clips_generated += clips.len();
                    counter!("aclip_clips_generated_total").increment(clips.len() as u64);
                    candidates.append(&mut clips);
                }
                Err(fault) => {
                    counter!("aclip_videos_failed_total").increment(1);
                    summary.record_failure(
                        report.video_id,
                        RunStage::Creating.as_str(),
                        fault.reason,
                        fault.terminal,
                    );
                }
            }
        }

        info!(
            clips = candidates.len(),
            "Creation phase complete"
        );
        Ok(candidates)
    }

    /// Earning ranking + single-clip dispatch.
    async fn run_publishing(
        &self,
        summary: &mut RunSummary,
        candidates: &[ClipCandidate],
    ) -> PipelineResult<()> {
        info!(stage = %RunStage::Publishing, "Entering stage");

        let outcome = self
            .publisher
            .publish_best(candidates, &self.publish_store)
            .await?;

        summary.dispatches = outcome.dispatches.clone();

        if let Some(selected) = outcome.selected {
            if outcome.dispatches.iter().any(|d| d.success) {
                summary.published = 1;
                counter!("aclip_clips_published_total").increment(1);
                if let Err(e) = self
                    .registry
                    .update_status(&selected.source_video_id, VideoStatus::Published, None)
                    .await
                {
                    let fault = registry_fault(e)?;
                    warn!(
                        video_id = %selected.source_video_id,
                        reason = %fault.reason,
                        "Could not record published status"
                    );
                }
            } else {
                // Every platform refused; leave the source selectable for
                // a later run.
                let reason = "all platform dispatches failed".to_string();
                if let Err(e) = self
                    .registry
                    .mark_failed(&selected.source_video_id, &reason, false)
                    .await
                {
                    registry_fault(e)?;
                }
                summary.record_failure(
                    selected.source_video_id,
                    RunStage::Publishing.as_str(),
                    reason,
                    false,
                );
            }
        }

        Ok(())
    }

    /// Stamp publish state and close the summary.
    async fn run_cleanup(&self, summary: &mut RunSummary) -> PipelineResult<()> {
        info!(stage = %RunStage::Cleanup, "Entering stage");
        self.publish_store.set_last_run(Utc::now()).await?;
        summary.finish();
        Ok(())
    }
}

/// Analyze one video: acquire a transcript, score it, persist the result.
async fn analyze_one(
    registry: Arc<VideoRegistry>,
    transcripts: Arc<dyn TranscriptProvider>,
    scorer: Arc<dyn TranscriptScorer>,
    video: VideoRecord,
) -> PipelineResult<AnalyzeReport> {
    let logger = VideoLogger::new(&video.id, RunStage::Analyzing);
    logger.log_start(&video.title);

    let transcript = match transcripts.acquire_transcript(&video.id).await {
        AcquisitionOutcome::Acquired(transcript) => transcript,
        AcquisitionOutcome::Unavailable { reason, terminal } => {
            logger.log_failure(&reason);
            if let Err(e) = registry.mark_failed(&video.id, &reason, terminal).await {
                registry_fault(e)?;
            }
            return Ok(AnalyzeReport {
                video_id: video.id,
                result: Err(VideoFault { reason, terminal }),
            });
        }
    };

    if let Err(e) = registry
        .set_transcription_source(&video.id, transcript.source)
        .await
    {
        registry_fault(e)?;
    }
    logger.log_progress(&format!(
        "transcript acquired via {} ({} segments)",
        transcript.source.as_str(),
        transcript.segments.len()
    ));

    // Transient service failures get a short bounded retry; anything that
    // survives it escalates to a per-video failure.
    let retry = RetryConfig::new("virality_analysis").with_max_retries(2);
    let scored = retry_async(
        &retry,
        || scorer.score_transcript(&transcript, video.niche),
        AnalysisError::is_retryable,
    )
    .await
    .into_result();

    match scored {
        Ok(analysis) => {
            let score = analysis.aggregate_score;
            if let Err(e) = registry
                .update_status(&video.id, VideoStatus::Analyzed, Some(score))
                .await
            {
                let fault = registry_fault(e)?;
                return Ok(AnalyzeReport {
                    video_id: video.id,
                    result: Err(fault),
                });
            }
            logger.log_completion(&format!("virality score {score:.1}"));
            Ok(AnalyzeReport {
                video_id: video.id,
                result: Ok((score, analysis.moments)),
            })
        }
        Err(e) => {
            let reason = e.to_string();
            logger.log_failure(&reason);
            if let Err(e) = registry.mark_failed(&video.id, &reason, false).await {
                registry_fault(e)?;
            }
            Ok(AnalyzeReport {
                video_id: video.id,
                result: Err(VideoFault {
                    reason,
                    terminal: false,
                }),
            })
        }
    }
}

/// Generate clips for one selected video.
async fn create_one(
    registry: Arc<VideoRegistry>,
    clips: Arc<dyn ClipGenerator>,
    video: VideoRecord,
    moments: Vec<ViralMoment>,
) -> PipelineResult<CreateReport> {
    let logger = VideoLogger::new(&video.id, RunStage::Creating);
    logger.log_start(&format!("{} moments", moments.len()));

    match clips.generate(&video, &moments).await {
        Ok(candidates) => {
            logger.log_completion(&format!("{} clip candidates", candidates.len()));
            Ok(CreateReport {
                video_id: video.id,
                result: Ok(candidates),
            })
        }
        Err(e) => {
            let reason = e.to_string();
            logger.log_failure(&reason);
            if let Err(e) = registry.mark_failed(&video.id, &reason, false).await {
                registry_fault(e)?;
            }
            Ok(CreateReport {
                video_id: video.id,
                result: Err(VideoFault {
                    reason,
                    terminal: false,
                }),
            })
        }
    }
}

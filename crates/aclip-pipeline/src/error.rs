//! Pipeline error types.
//!
//! Only infrastructure-level failures surface as errors from a run;
//! per-video failures are recorded in the run summary and never abort the
//! batch.

use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Run-fatal pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("registry error: {0}")]
    Registry(#[from] aclip_registry::RegistryError),

    #[error("ranking error: {0}")]
    Ranking(#[from] aclip_ranking::RankingError),

    #[error("worker task panicked: {0}")]
    TaskJoin(String),
}

impl PipelineError {
    pub fn task_join(msg: impl std::fmt::Display) -> Self {
        Self::TaskJoin(msg.to_string())
    }
}

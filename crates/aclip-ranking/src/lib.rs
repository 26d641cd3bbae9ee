//! Earning-potential ranking and publish-time selection.
//!
//! Turns scored viral moments into clip candidates, ranks them by a
//! composite earning-potential score, gates on virality/safety/dedup, and
//! dispatches exactly one clip per run across the enabled platforms.

pub mod economics;
pub mod error;
pub mod publisher;
pub mod selection;
pub mod seo;

pub use economics::{
    base_views, earning_potential, engagement_quality, estimated_revenue, expected_views,
    revenue_rate, safety_score, EngagementWeights, SafetyPenalties,
};
pub use error::{RankingError, RankingResult};
pub use publisher::{PlatformPublisher, PublishOutcome, PublisherConfig, SmartPublisher};
pub use selection::{build_candidate, is_eligible, select_best, RankingConfig};
pub use seo::generate_metadata;

#[cfg(any(test, feature = "mocks"))]
pub use publisher::MockPlatformPublisher;

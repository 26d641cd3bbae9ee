//! Durable video registry and publish-state store.
//!
//! The registry is the only cross-stage shared mutable resource in the
//! pipeline; the forward-only status ordering keeps two stages from ever
//! writing the same record concurrently. Both stores survive process
//! restarts via atomic replace-on-write JSON files.

pub mod error;
pub mod publish_store;
pub mod store;

pub use error::{RegistryError, RegistryResult};
pub use publish_store::PublishStore;
pub use store::{IngestOutcome, VideoRegistry};

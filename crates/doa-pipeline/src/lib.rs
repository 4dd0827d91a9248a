//! doa-pipeline - orchestrates geometry, DSP, SRP-PHAT, and tracking into
//! a single real-time direction-of-arrival estimation pipeline.
//!
//! - [`pipeline::Pipeline`] - the orchestrator: feed it audio blocks,
//!   read back [`snapshot::Snapshot`]s
//! - [`config::PipelineConfig`] - full configuration tree
//! - [`mailbox::Mailbox`] - single-slot producer/consumer handoff
//! - [`snapshot::SnapshotSlot`] - clone-on-read latest-result publication

pub mod config;
pub mod error;
pub mod mailbox;
pub mod pipeline;
pub mod snapshot;

pub use config::{PipelineConfig, SslSettings, StftSettings};
pub use error::ConfigError;
pub use mailbox::Mailbox;
pub use pipeline::{AudioMailbox, Pipeline};
pub use snapshot::{Snapshot, SnapshotSlot, TrackSnapshot};

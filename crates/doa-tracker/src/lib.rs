//! doa-tracker - multi-target azimuth tracking over DOA detections.
//!
//! - [`tracker::MultiTargetTracker`] - gated association, Kalman update,
//!   pending-track birth/promotion, confidence-based death
//! - [`track::TrackState`] - a confirmed, Kalman-tracked source
//! - [`pending::PendingTrack`] - a not-yet-confirmed candidate
//! - [`config::TrackerConfig`] - tuning parameters

pub mod config;
pub mod pending;
pub mod track;
pub mod tracker;

pub use config::TrackerConfig;
pub use pending::PendingTrack;
pub use track::TrackState;
pub use tracker::{Detection, MultiTargetTracker};

//! Latest-result publication: a clone-on-read snapshot behind a mutex.

use doa_ssl::DoaCandidate;
use std::sync::Mutex;

/// A confirmed track's state as exposed in a [`Snapshot`].
#[derive(Debug, Clone, Copy)]
pub struct TrackSnapshot {
    /// Stable track id.
    pub id: u64,
    /// Azimuth, degrees, `[0, 360)`, world frame (orientation offset applied).
    pub azimuth_deg: f32,
    /// Track confidence, `[0, 1]`.
    pub confidence: f32,
}

/// One frame's worth of DOA pipeline output.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Monotonically increasing STFT frame counter.
    pub frame_index: u64,
    /// Raw DOA candidates extracted this frame, after track-aware merging
    /// and orientation-offset correction.
    pub candidates: Vec<DoaCandidate>,
    /// Confirmed tracks as of this frame.
    pub tracks: Vec<TrackSnapshot>,
}

/// Thread-safe latest-snapshot publication point.
///
/// Readers get a clone of whatever was last published and never block
/// the writer (and vice versa) for longer than the clone itself takes.
pub struct SnapshotSlot {
    inner: Mutex<Option<Snapshot>>,
}

impl SnapshotSlot {
    /// An empty slot: no snapshot has been published yet.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Publish a new snapshot, replacing whatever was there before.
    pub fn publish(&self, snapshot: Snapshot) {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(snapshot);
    }

    /// Clone of the most recently published snapshot, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Snapshot> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        guard.clone()
    }
}

impl Default for SnapshotSlot {
    fn default() -> Self {
        Self::new()
    }
}

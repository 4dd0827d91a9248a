//! Multi-target tracker: gated association, Kalman update, pending-track
//! birth/promotion, and confidence-based death.
//!
//! Predicts all confirmed tracks, greedily associates detections to tracks within
//! `gate_deg`, Kalman-update the matched tracks, then run unmatched
//! detections (excluding ones near an already-confirmed track) through a
//! pending-candidate birth/promotion/expiry pipeline, and finally prune
//! confirmed tracks that have missed too many frames or stayed
//! low-confidence too long.

use crate::config::TrackerConfig;
use crate::pending::PendingTrack;
use crate::track::TrackState;
use doa_geometry::angle::circular_distance_deg;

/// One DOA detection fed into the tracker for a single frame.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    /// Azimuth, degrees.
    pub azimuth_deg: f32,
    /// SRP-PHAT power at this azimuth (used to gate pending-track birth).
    pub power: f32,
}

/// Gated nearest-neighbor multi-target azimuth tracker.
pub struct MultiTargetTracker {
    config: TrackerConfig,
    next_id: u64,
    tracks: Vec<TrackState>,
    pending: Vec<PendingTrack>,
}

impl MultiTargetTracker {
    /// Build a tracker with the given configuration, starting with no tracks.
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            next_id: 1,
            tracks: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Currently confirmed tracks, in birth order.
    #[must_use]
    pub fn tracks(&self) -> &[TrackState] {
        &self.tracks
    }

    /// Currently pending (unconfirmed) candidates.
    #[must_use]
    pub fn pending(&self) -> &[PendingTrack] {
        &self.pending
    }

    /// Advance the tracker by one frame, given this frame's DOA detections.
    pub fn step(&mut self, detections: &[Detection]) {
        for t in &mut self.tracks {
            t.predict(self.config.dt, self.config.process_noise);
        }

        let mut used = vec![false; detections.len()];
        for track in &mut self.tracks {
            let mut best: Option<(usize, f32)> = None;
            for (i, det) in detections.iter().enumerate() {
                if used[i] {
                    continue;
                }
                let dist = circular_distance_deg(det.azimuth_deg, track.theta_deg).abs();
                if dist <= self.config.gate_deg && best.is_none_or(|(_, d)| dist < d) {
                    best = Some((i, dist));
                }
            }
            if let Some((i, _)) = best {
                used[i] = true;
                track.kalman_update(detections[i].azimuth_deg, self.config.measurement_noise);
            } else {
                track.mark_missed();
            }
        }

        self.update_pending(detections, &used);
        self.age_and_prune();
    }

    fn update_pending(&mut self, detections: &[Detection], used_by_tracks: &[bool]) {
        let mut used = vec![false; detections.len()];

        // Match existing pending candidates first, nearest within gate_deg.
        for pending in &mut self.pending {
            let mut best: Option<(usize, f32)> = None;
            for (i, det) in detections.iter().enumerate() {
                if used_by_tracks[i] || used[i] {
                    continue;
                }
                let dist = circular_distance_deg(det.azimuth_deg, pending.theta_deg).abs();
                if dist <= self.config.gate_deg && best.is_none_or(|(_, d)| dist < d) {
                    best = Some((i, dist));
                }
            }
            if let Some((i, _)) = best {
                used[i] = true;
                pending.mark_seen(detections[i].azimuth_deg, detections[i].power);
            } else {
                pending.mark_missed();
            }
        }

        // Leftover detections, far enough from every confirmed track and
        // strong enough, seed new pending candidates.
        let exclusion_deg = 1.5 * self.config.gate_deg;
        for (i, det) in detections.iter().enumerate() {
            if used_by_tracks[i] || used[i] {
                continue;
            }
            if det.power < self.config.pending_track_power_threshold {
                continue;
            }
            let near_confirmed = self
                .tracks
                .iter()
                .any(|t| circular_distance_deg(det.azimuth_deg, t.theta_deg).abs() <= exclusion_deg);
            if near_confirmed {
                continue;
            }
            self.pending.push(PendingTrack::new(det.azimuth_deg, det.power));
        }

        // Promote.
        let mut promoted_thetas = Vec::new();
        self.pending.retain(|p| {
            let confident_enough = p.confidence(self.config.pending_track_max_age)
                >= self.config.min_confidence_for_promotion;
            let hit_rate_enough = p.hit_rate() >= self.config.min_hit_rate_for_promotion;
            let old_enough = p.age() >= self.config.birth_frames;
            if old_enough && confident_enough && hit_rate_enough {
                promoted_thetas.push(p.azimuth_deg());
                false
            } else {
                true
            }
        });
        for theta in promoted_thetas {
            self.create_track(theta);
        }

        // Expire.
        let max_age = self.config.pending_track_max_age;
        self.pending.retain(|p| p.age() < max_age);
    }

    fn create_track(&mut self, theta_deg: f32) {
        let id = self.next_id;
        self.next_id += 1;
        tracing::debug!(track_id = id, azimuth_deg = theta_deg, "track born");
        self.tracks.push(TrackState::new(
            id,
            theta_deg,
            self.config.measurement_noise,
            self.config.process_noise,
        ));
    }

    fn age_and_prune(&mut self) {
        let min_confidence_to_keep = self.config.min_confidence_to_keep;
        for t in &mut self.tracks {
            if t.confidence() < min_confidence_to_keep {
                t.low_confidence_streak += 1;
            } else {
                t.low_confidence_streak = 0;
            }
        }

        let death_frames = self.config.death_frames;
        let low_conf_limit = self.config.low_confidence_frames_before_removal;
        self.tracks.retain(|t| {
            let missed_too_long = t.misses >= death_frames;
            let stale_and_old = t.misses >= 10 && t.age > 15;
            let removal_threshold = if t.misses >= 5 { 2 } else { low_conf_limit };
            let low_confidence_too_long = t.low_confidence_streak >= removal_threshold;

            if missed_too_long || stale_and_old || low_confidence_too_long {
                tracing::debug!(track_id = t.id, "track died");
                false
            } else {
                true
            }
        });
    }
}

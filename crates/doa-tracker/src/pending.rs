//! Pending (not-yet-confirmed) track candidates.

/// A candidate track not yet promoted to a confirmed [`crate::TrackState`].
///
/// Pending tracks exist so a single noisy detection doesn't immediately
/// spawn a full Kalman-tracked source; only a candidate that repeatedly
/// reappears near the same azimuth gets promoted.
#[derive(Debug, Clone)]
pub struct PendingTrack {
    pub(crate) theta_deg: f32,
    pub(crate) peak_power: f32,
    pub(crate) hits: u32,
    pub(crate) misses: u32,
    pub(crate) age: u32,
}

impl PendingTrack {
    pub(crate) fn new(theta_deg: f32, peak_power: f32) -> Self {
        Self {
            theta_deg,
            peak_power,
            hits: 1,
            misses: 0,
            age: 1,
        }
    }

    /// Current azimuth estimate (simple last-seen value, no filtering).
    #[must_use]
    pub fn azimuth_deg(&self) -> f32 {
        self.theta_deg
    }

    /// Strongest SRP-PHAT power seen at this candidate across its lifetime.
    #[must_use]
    pub fn peak_power(&self) -> f32 {
        self.peak_power
    }

    /// Frames since this pending track first appeared.
    #[must_use]
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Fraction of frames since birth in which this candidate was
    /// redetected.
    #[must_use]
    pub fn hit_rate(&self) -> f32 {
        self.hits as f32 / self.age.max(1) as f32
    }

    /// Confidence in `[0, 1]`: hit rate times a recent-activity penalty
    /// times how far through its maximum allowed lifetime
    /// (`pending_track_max_age`) it has aged.
    #[must_use]
    pub fn confidence(&self, pending_track_max_age: u32) -> f32 {
        let recent_activity = if self.misses <= 1 {
            1.0
        } else if self.misses <= 3 {
            0.6
        } else {
            0.2
        };
        let age_factor = (self.age as f32 / pending_track_max_age.max(1) as f32).min(1.0);
        (self.hit_rate() * recent_activity * age_factor).clamp(0.0, 1.0)
    }

    pub(crate) fn mark_seen(&mut self, theta_deg: f32, power: f32) {
        self.theta_deg = theta_deg;
        self.peak_power = self.peak_power.max(power);
        self.hits += 1;
        self.misses = 0;
        self.age += 1;
    }

    pub(crate) fn mark_missed(&mut self) {
        self.misses += 1;
        self.age += 1;
    }
}

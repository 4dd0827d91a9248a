//! Confirmed track state: a 1-D constant-velocity Kalman filter on azimuth.

use doa_geometry::angle::{circular_distance_deg, wrap_deg_0_360};

/// A confirmed, actively-tracked sound source.
#[derive(Debug, Clone)]
pub struct TrackState {
    /// Stable identifier, assigned once at track birth and never reused.
    pub id: u64,
    /// Estimated azimuth, degrees, unwrapped (not normalized to `[0, 360)`
    /// internally so the Kalman filter doesn't see a discontinuity).
    pub theta_deg: f32,
    /// Estimated angular velocity, degrees/second.
    pub theta_dot_deg_s: f32,
    /// 2x2 state covariance, row-major `[[p00, p01], [p10, p11]]`.
    pub covariance: [[f32; 2]; 2],
    /// Consecutive-or-total successful associations since birth.
    pub hits: u32,
    /// Frames since the last successful association.
    pub misses: u32,
    /// Frames since birth.
    pub age: u32,
    /// Consecutive frames this track's confidence has been below
    /// `TrackerConfig::min_confidence_to_keep`.
    pub low_confidence_streak: u32,
}

impl TrackState {
    pub(crate) fn new(id: u64, theta_deg: f32, measurement_noise: f32, process_noise: f32) -> Self {
        Self {
            id,
            theta_deg,
            theta_dot_deg_s: 0.0,
            covariance: [
                [measurement_noise * measurement_noise, 0.0],
                [0.0, process_noise * process_noise],
            ],
            hits: 1,
            misses: 0,
            age: 1,
            low_confidence_streak: 0,
        }
    }

    /// Azimuth wrapped to `[0, 360)` degrees, for external reporting.
    #[must_use]
    pub fn azimuth_deg(&self) -> f32 {
        wrap_deg_0_360(self.theta_deg)
    }

    /// Confidence in `[0, 1]`: hit rate times a recent-activity penalty
    /// times an age ramp-up factor.
    #[must_use]
    pub fn confidence(&self) -> f32 {
        let hit_rate = self.hits as f32 / self.age.max(1) as f32;
        let recent_activity = if self.misses <= 2 {
            1.0
        } else if self.misses <= 5 {
            0.6
        } else {
            0.2
        };
        let age_factor = (self.age as f32 / 10.0).min(1.0);
        (hit_rate * recent_activity * age_factor).clamp(0.0, 1.0)
    }

    pub(crate) fn predict(&mut self, dt: f32, process_noise: f32) {
        self.theta_deg += self.theta_dot_deg_s * dt;

        let f01 = dt;
        let p00 = self.covariance[0][0];
        let p01 = self.covariance[0][1];
        let p10 = self.covariance[1][0];
        let p11 = self.covariance[1][1];

        // P' = F P F^T + Q, F = [[1, dt], [0, 1]]
        let new_p00 = p00 + f01 * p10 + f01 * (p01 + f01 * p11);
        let new_p01 = p01 + f01 * p11;
        let new_p10 = p10 + f01 * p11;
        let new_p11 = p11;

        let q = process_noise * process_noise * dt;
        self.covariance = [[new_p00 + q, new_p01], [new_p10, new_p11 + q]];
    }

    pub(crate) fn kalman_update(&mut self, measured_theta_deg: f32, measurement_noise: f32) {
        let innovation = circular_distance_deg(measured_theta_deg, self.theta_deg);
        let r = measurement_noise * measurement_noise;
        let s = self.covariance[0][0] + r;
        let k0 = self.covariance[0][0] / s;
        let k1 = self.covariance[1][0] / s;

        self.theta_deg += k0 * innovation;
        self.theta_dot_deg_s += k1 * innovation;

        let p00 = self.covariance[0][0];
        let p01 = self.covariance[0][1];
        let p10 = self.covariance[1][0];
        let p11 = self.covariance[1][1];
        self.covariance = [
            [(1.0 - k0) * p00, (1.0 - k0) * p01],
            [p10 - k1 * p00, p11 - k1 * p01],
        ];

        self.hits += 1;
        self.age += 1;
        self.misses = 0;
    }

    pub(crate) fn mark_missed(&mut self) {
        self.misses += 1;
        self.age += 1;
    }
}

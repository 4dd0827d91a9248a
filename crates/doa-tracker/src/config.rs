//! Tuning parameters for [`crate::MultiTargetTracker`].

/// Tracker tuning parameters. Defaults mirror the reference implementation
/// this tracker was built against.
#[derive(Debug, Clone, Copy)]
pub struct TrackerConfig {
    /// Frame period, in seconds, used by the constant-velocity prediction
    /// step. Callers should set this to `hop_size / sample_rate_hz`.
    pub dt: f32,
    /// Process noise standard deviation, degrees.
    pub process_noise: f32,
    /// Measurement noise standard deviation, degrees.
    pub measurement_noise: f32,
    /// Maximum angular distance, in degrees, for a detection to associate
    /// with an existing track or pending candidate.
    pub gate_deg: f32,
    /// Consecutive redetections a pending candidate needs before
    /// promotion is considered.
    pub birth_frames: u32,
    /// Consecutive missed frames before a confirmed track is dropped.
    pub death_frames: u32,
    /// Minimum SRP power a detection must have to seed or feed a pending
    /// candidate.
    pub pending_track_power_threshold: f32,
    /// Maximum age, in frames, a pending candidate is kept before expiry.
    pub pending_track_max_age: u32,
    /// Minimum confidence a pending candidate needs for promotion.
    pub min_confidence_for_promotion: f32,
    /// Minimum hit rate a pending candidate needs for promotion.
    pub min_hit_rate_for_promotion: f32,
    /// Confidence floor below which a confirmed track starts accruing a
    /// low-confidence removal streak.
    pub min_confidence_to_keep: f32,
    /// Consecutive low-confidence frames before a track is removed
    /// (shortened to 2 once a track has 5+ misses).
    pub low_confidence_frames_before_removal: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            dt: 0.032,
            process_noise: 5.0,
            measurement_noise: 5.0,
            gate_deg: 20.0,
            birth_frames: 3,
            death_frames: 10,
            pending_track_power_threshold: 0.03,
            pending_track_max_age: 8,
            min_confidence_for_promotion: 0.20,
            min_hit_rate_for_promotion: 0.4,
            min_confidence_to_keep: 0.10,
            low_confidence_frames_before_removal: 6,
        }
    }
}

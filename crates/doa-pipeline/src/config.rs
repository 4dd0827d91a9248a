//! Pipeline configuration tree.

use doa_dsp::{McraConfig, Window};
use doa_tracker::TrackerConfig;

/// STFT front-end configuration.
#[derive(Debug, Clone, Copy)]
pub struct StftSettings {
    /// Analysis frame size, in samples.
    pub frame_size: usize,
    /// Hop size between analysis frames, in samples.
    pub hop_size: usize,
    /// Analysis window.
    pub window: Window,
    /// Audio sample rate, Hz.
    pub sample_rate_hz: f32,
}

impl Default for StftSettings {
    fn default() -> Self {
        Self {
            frame_size: 512,
            hop_size: 256,
            window: Window::Hann,
            sample_rate_hz: 16_000.0,
        }
    }
}

/// SRP-PHAT scan and post-processing configuration.
#[derive(Debug, Clone, Copy)]
pub struct SslSettings {
    /// Azimuth grid resolution, degrees.
    pub azimuth_res_deg: f32,
    /// Maximum simultaneous DOA candidates extracted per frame.
    pub max_sources: usize,
    /// Minimum SRP power for a candidate to be extracted.
    pub min_power: f32,
    /// Circular non-maximum-suppression radius, degrees.
    pub suppression_deg: f32,
    /// Lower edge of the analysis passband, Hz.
    pub bandpass_low_hz: f32,
    /// Upper edge of the analysis passband, Hz.
    pub bandpass_high_hz: f32,
    /// Added to every reported/tracked azimuth to correct for array mounting
    /// orientation relative to the world frame.
    pub orientation_offset_deg: f32,
    /// Whether to apply a per-bin SNR mask (built from the shared, array-wide
    /// MCRA noise estimate) to every mic's STFT bins before cross-correlation.
    pub use_snr_mask: bool,
    /// SNR, dB, below which the mask fully attenuates a bin.
    pub snr_mask_low_db: f32,
    /// SNR, dB, above which the mask fully passes a bin.
    pub snr_mask_high_db: f32,
    /// Whether to apply a frequency-emphasis bell curve to the cross-spectrum.
    pub use_freq_weighting: bool,
    /// Center frequency of the emphasis curve, Hz.
    pub freq_weight_peak_hz: f32,
    /// Width (standard deviation) of the emphasis curve, Hz.
    pub freq_weight_width_hz: f32,
    /// Whether to weight each pair's contribution to the SRP map by its
    /// estimated reliability (currently a constant 1.0 placeholder; see
    /// DESIGN.md).
    pub use_pair_weighting: bool,
    /// Whether to exponentially smooth the SRP azimuth map across frames.
    pub use_temporal_smoothing: bool,
    /// EMA coefficient for temporal smoothing (closer to 1 = slower).
    pub temporal_smoothing_alpha: f32,
    /// Whether to add a Gaussian boost around each confirmed track's
    /// azimuth before peak extraction, to favor re-detecting known sources.
    pub use_tracking_boost: bool,
    /// Peak height of the tracking-boost Gaussian.
    pub tracking_boost_lambda: f32,
    /// Standard deviation, degrees, of the tracking-boost Gaussian.
    pub tracking_boost_sigma_deg: f32,
}

impl Default for SslSettings {
    fn default() -> Self {
        Self {
            azimuth_res_deg: 1.0,
            max_sources: 3,
            min_power: 0.05,
            suppression_deg: 25.0,
            bandpass_low_hz: 300.0,
            bandpass_high_hz: 4000.0,
            orientation_offset_deg: 0.0,
            use_snr_mask: true,
            snr_mask_low_db: 0.0,
            snr_mask_high_db: 20.0,
            use_freq_weighting: true,
            freq_weight_peak_hz: 1500.0,
            freq_weight_width_hz: 2000.0,
            use_pair_weighting: true,
            use_temporal_smoothing: true,
            temporal_smoothing_alpha: 0.8,
            use_tracking_boost: true,
            tracking_boost_lambda: 0.3,
            tracking_boost_sigma_deg: 15.0,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// STFT front-end settings.
    pub stft: StftSettings,
    /// Per-mic MCRA noise estimator settings.
    pub mcra: McraConfig,
    /// SRP-PHAT scan and candidate extraction settings.
    pub ssl: SslSettings,
    /// Multi-target tracker settings.
    pub tracker: TrackerConfig,
    /// Speed of sound, m/s.
    pub speed_of_sound_m_s: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let stft = StftSettings::default();
        let mut tracker = TrackerConfig::default();
        tracker.dt = stft.hop_size as f32 / stft.sample_rate_hz;
        Self {
            stft,
            mcra: McraConfig::default(),
            ssl: SslSettings::default(),
            tracker,
            speed_of_sound_m_s: 343.0,
        }
    }
}

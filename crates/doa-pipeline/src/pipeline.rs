//! The DOA pipeline orchestrator.
//!
//! Builds the azimuth grid and TDOA LUT from array geometry, then for
//! every completed STFT frame runs the fixed sequence
//! noise-estimate -> SNR-mask -> frequency-weight -> GCC-PHAT -> pair
//! weights -> SRP scan -> temporal smoothing -> tracking boost -> peak
//! extraction -> track-aware merge -> tracker step -> snapshot publish.

use crate::config::PipelineConfig;
use crate::error::ConfigError;
use crate::mailbox::Mailbox;
use crate::snapshot::{Snapshot, SnapshotSlot, TrackSnapshot};
use doa_dsp::{Mcra, StftFrame, StftProcessor};
use doa_geometry::angle::{circular_distance_deg, wrap_deg_0_360};
use doa_geometry::{MicArray, TdoaLut};
use doa_ssl::{DoaCandidate, PeakExtractor, SrpScanner};
use doa_tracker::{Detection, MultiTargetTracker};
use std::collections::HashMap;

const EPS: f32 = 1e-8;

/// Real-time direction-of-arrival estimation and multi-target tracking
/// pipeline for a planar microphone array.
pub struct Pipeline {
    config: PipelineConfig,
    array: MicArray,
    azimuth_grid_deg: Vec<f32>,
    stft: StftProcessor,
    global_noise: Mcra,
    mic_noise: Vec<Mcra>,
    srp: SrpScanner,
    peak_extractor: PeakExtractor,
    tracker: MultiTargetTracker,
    smoothed_map: Option<Vec<f32>>,
    frame_index: u64,
    band_bins: (usize, usize),
    freq_weights: Vec<f32>,
    snapshot: SnapshotSlot,
}

impl Pipeline {
    /// Build a pipeline for the given array geometry and configuration.
    pub fn new(array: MicArray, config: PipelineConfig) -> Result<Self, ConfigError> {
        let n_steps = (360.0 / config.ssl.azimuth_res_deg).round() as usize;
        let azimuth_grid_deg: Vec<f32> = (0..n_steps)
            .map(|i| i as f32 * config.ssl.azimuth_res_deg)
            .collect();

        let lut = TdoaLut::new(&array, azimuth_grid_deg.clone(), config.speed_of_sound_m_s)?;
        let srp = SrpScanner::from_pairs(array.pairs(), &lut, config.stft.sample_rate_hz)?;

        let stft = StftProcessor::new(
            config.stft.frame_size,
            config.stft.hop_size,
            config.stft.window,
        )?;
        let n_freq_bins = stft.n_freq_bins();

        let global_noise = Mcra::new(n_freq_bins, config.mcra);
        let mic_noise = (0..array.len())
            .map(|_| Mcra::new(n_freq_bins, config.mcra))
            .collect();

        let band_bins = compute_band_bins(
            config.ssl.bandpass_low_hz,
            config.ssl.bandpass_high_hz,
            config.stft.frame_size,
            config.stft.sample_rate_hz,
            n_freq_bins,
        );

        let freq_weights = compute_freq_weight_curve(
            n_freq_bins,
            config.stft.frame_size,
            config.stft.sample_rate_hz,
            config.ssl.freq_weight_peak_hz,
            config.ssl.freq_weight_width_hz,
            config.ssl.use_freq_weighting,
        );

        let peak_extractor = PeakExtractor {
            max_sources: config.ssl.max_sources,
            min_power: config.ssl.min_power,
            suppression_deg: config.ssl.suppression_deg,
        };

        let tracker = MultiTargetTracker::new(config.tracker);

        Ok(Self {
            config,
            array,
            azimuth_grid_deg,
            stft,
            global_noise,
            mic_noise,
            srp,
            peak_extractor,
            tracker,
            smoothed_map: None,
            frame_index: 0,
            band_bins,
            freq_weights,
            snapshot: SnapshotSlot::new(),
        })
    }

    /// Reset all streaming state (STFT buffers, noise estimates, smoothed
    /// map, tracker, frame counter) without rebuilding geometry.
    pub fn reset(&mut self) {
        self.stft.reset();
        self.global_noise.reset();
        for mcra in &mut self.mic_noise {
            mcra.reset();
        }
        self.smoothed_map = None;
        self.frame_index = 0;
        self.tracker = MultiTargetTracker::new(self.config.tracker);
    }

    /// The array geometry this pipeline was built for.
    #[must_use]
    pub fn array(&self) -> &MicArray {
        &self.array
    }

    /// Clone of the most recently published snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.latest()
    }

    /// Feed one block of multichannel samples (one `Vec<f32>` per
    /// microphone, same length, same order as `array.positions()`).
    pub fn process_block(&mut self, block: &[Vec<f32>]) -> Result<(), ConfigError> {
        let frames = self.stft.process_block(block)?;
        for frame in frames {
            self.process_stft_frame(frame)?;
        }
        Ok(())
    }

    fn process_stft_frame(&mut self, mut frame: StftFrame) -> Result<(), ConfigError> {
        let n_freq_bins = frame.spectra[0].len();
        let n_mics = frame.spectra.len();

        let mut mean_power = vec![0.0f32; n_freq_bins];
        let mut per_mic_power = Vec::with_capacity(n_mics);
        for spectrum in &frame.spectra {
            let power: Vec<f32> = spectrum.iter().map(|c| c.norm_sqr()).collect();
            for (m, &p) in mean_power.iter_mut().zip(power.iter()) {
                *m += p / n_mics as f32;
            }
            per_mic_power.push(power);
        }

        let global_noise = self.global_noise.update(&mean_power)?;

        if self.config.ssl.use_snr_mask {
            let mask: Vec<f32> = mean_power
                .iter()
                .zip(global_noise.iter())
                .map(|(&p, &n)| {
                    let snr_db = 10.0 * ((p / (n + EPS)).max(EPS)).log10();
                    ((snr_db - self.config.ssl.snr_mask_low_db)
                        / (self.config.ssl.snr_mask_high_db - self.config.ssl.snr_mask_low_db))
                        .clamp(0.0, 1.0)
                })
                .collect();
            for spectrum in &mut frame.spectra {
                for (bin, &w) in spectrum.iter_mut().zip(mask.iter()) {
                    *bin *= w;
                }
            }
        }

        let mut mean_noise = vec![0.0f32; n_mics];
        for (mic, power) in per_mic_power.iter().enumerate() {
            let noise = self.mic_noise[mic].update(power)?;
            mean_noise[mic] = noise.iter().copied().sum::<f32>() / noise.len().max(1) as f32;
        }

        let mut gcc_maps = HashMap::new();
        let mut pair_weights = HashMap::new();
        let pairs = self.array.pairs().to_vec();
        for &(i, j) in &pairs {
            let correlation = doa_dsp::compute_gcc_phat(
                &frame.spectra[i],
                &frame.spectra[j],
                Some(self.band_bins),
                Some(&self.freq_weights),
                EPS,
            )?;
            gcc_maps.insert((i, j), correlation);

            let weight = if self.config.ssl.use_pair_weighting {
                1.0 / (mean_noise[i] + mean_noise[j] + EPS)
            } else {
                1.0
            };
            pair_weights.insert((i, j), weight);
        }
        if self.config.ssl.use_pair_weighting {
            normalize_weights(&mut pair_weights);
        }

        let raw_power = self.srp.compute_srp(&gcc_maps, Some(&pair_weights))?;

        let smoothed = if self.config.ssl.use_temporal_smoothing {
            let alpha = self.config.ssl.temporal_smoothing_alpha;
            let prev = self
                .smoothed_map
                .get_or_insert_with(|| raw_power.clone());
            for (s, &r) in prev.iter_mut().zip(raw_power.iter()) {
                *s = alpha * *s + (1.0 - alpha) * r;
            }
            prev.clone()
        } else {
            raw_power
        };
        self.smoothed_map = Some(smoothed.clone());

        let boosted = if self.config.ssl.use_tracking_boost {
            self.apply_tracking_boost(&smoothed)
        } else {
            smoothed
        };

        let candidates = self
            .peak_extractor
            .extract(&boosted, &self.azimuth_grid_deg);
        let merged = self.merge_candidates_near_tracks(candidates);

        let oriented: Vec<DoaCandidate> = merged
            .into_iter()
            .map(|c| DoaCandidate {
                azimuth_deg: wrap_deg_0_360(c.azimuth_deg + self.config.ssl.orientation_offset_deg),
                ..c
            })
            .collect();

        let detections: Vec<Detection> = oriented
            .iter()
            .map(|c| Detection {
                azimuth_deg: c.azimuth_deg,
                power: c.power,
            })
            .collect();
        self.tracker.step(&detections);

        let tracks = self
            .tracker
            .tracks()
            .iter()
            .map(|t| TrackSnapshot {
                id: t.id,
                azimuth_deg: wrap_deg_0_360(
                    t.azimuth_deg() + self.config.ssl.orientation_offset_deg,
                ),
                confidence: t.confidence(),
            })
            .collect();

        self.snapshot.publish(Snapshot {
            frame_index: self.frame_index,
            candidates: oriented,
            tracks,
        });
        self.frame_index += 1;

        Ok(())
    }

    fn apply_tracking_boost(&self, map: &[f32]) -> Vec<f32> {
        let mut boosted = map.to_vec();
        let lambda = self.config.ssl.tracking_boost_lambda;
        let sigma = self.config.ssl.tracking_boost_sigma_deg;
        for track in self.tracker.tracks() {
            let track_az = track.azimuth_deg();
            for (idx, &grid_az) in self.azimuth_grid_deg.iter().enumerate() {
                let delta = circular_distance_deg(grid_az, track_az);
                boosted[idx] += lambda * (-0.5 * (delta / sigma).powi(2)).exp();
            }
        }
        boosted
    }

    fn merge_candidates_near_tracks(&self, candidates: Vec<DoaCandidate>) -> Vec<DoaCandidate> {
        if self.tracker.tracks().is_empty() {
            return candidates;
        }
        let gate_deg = self.config.tracker.gate_deg;

        let mut groups: HashMap<u64, Vec<DoaCandidate>> = HashMap::new();
        let mut unassigned = Vec::new();
        for c in candidates {
            let nearest = self
                .tracker
                .tracks()
                .iter()
                .map(|t| (t.id, circular_distance_deg(c.azimuth_deg, t.azimuth_deg()).abs()))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
            match nearest {
                Some((id, dist)) if dist <= gate_deg => {
                    groups.entry(id).or_default().push(c);
                }
                _ => unassigned.push(c),
            }
        }

        let mut merged = unassigned;
        for group in groups.into_values() {
            merged.push(weighted_circular_merge(&group));
        }
        merged
    }
}

fn weighted_circular_merge(group: &[DoaCandidate]) -> DoaCandidate {
    let total_power: f32 = group.iter().map(|c| c.power).sum();
    let (mut sin_sum, mut cos_sum) = (0.0f32, 0.0f32);
    for c in group {
        let w = if total_power > 0.0 {
            c.power / total_power
        } else {
            1.0 / group.len() as f32
        };
        let rad = c.azimuth_deg.to_radians();
        sin_sum += w * rad.sin();
        cos_sum += w * rad.cos();
    }
    let azimuth_deg = wrap_deg_0_360(sin_sum.atan2(cos_sum).to_degrees());
    let strongest = group
        .iter()
        .max_by(|a, b| a.power.partial_cmp(&b.power).unwrap())
        .unwrap();
    DoaCandidate {
        azimuth_deg,
        power: total_power,
        grid_index: strongest.grid_index,
    }
}

fn normalize_weights(weights: &mut HashMap<(usize, usize), f32>) {
    let sum: f32 = weights.values().sum();
    if sum <= 0.0 {
        return;
    }
    let scale = 1.0 / sum;
    for w in weights.values_mut() {
        *w *= scale;
    }
}

fn compute_band_bins(
    low_hz: f32,
    high_hz: f32,
    frame_size: usize,
    sample_rate_hz: f32,
    n_freq_bins: usize,
) -> (usize, usize) {
    let bin_hz = sample_rate_hz / frame_size as f32;
    let k_min = (low_hz / bin_hz).floor().max(0.0) as usize;
    let k_max = ((high_hz / bin_hz).ceil() as usize).clamp(k_min + 1, n_freq_bins);
    (k_min.min(n_freq_bins - 1), k_max)
}

fn compute_freq_weight_curve(
    n_freq_bins: usize,
    frame_size: usize,
    sample_rate_hz: f32,
    peak_hz: f32,
    width_hz: f32,
    enabled: bool,
) -> Vec<f32> {
    if !enabled {
        return vec![1.0; n_freq_bins];
    }
    let bin_hz = sample_rate_hz / frame_size as f32;
    let sigma = width_hz / 2.355;
    (0..n_freq_bins)
        .map(|k| {
            let f = k as f32 * bin_hz;
            (-0.5 * ((f - peak_hz) / sigma).powi(2)).exp()
        })
        .collect()
}

/// Convenience alias for a single-slot audio-block handoff between a
/// capture thread and the thread driving [`Pipeline::process_block`].
pub type AudioMailbox = Mailbox<Vec<Vec<f32>>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn square_array() -> MicArray {
        MicArray::new(vec![
            [0.032, 0.0, 0.0],
            [0.0, 0.032, 0.0],
            [-0.032, 0.0, 0.0],
            [0.0, -0.032, 0.0],
        ])
        .unwrap()
    }

    fn tone_block(n_mics: usize, n: usize, freq_hz: f32, fs: f32) -> Vec<Vec<f32>> {
        (0..n_mics)
            .map(|_| {
                (0..n)
                    .map(|i| 0.5 * (2.0 * PI * freq_hz * i as f32 / fs).sin())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn pipeline_builds_with_default_config() {
        let array = square_array();
        let pipeline = Pipeline::new(array, PipelineConfig::default());
        assert!(pipeline.is_ok());
    }

    #[test]
    fn processing_blocks_eventually_publishes_a_snapshot() {
        let array = square_array();
        let mut config = PipelineConfig::default();
        config.stft.sample_rate_hz = 16_000.0;
        config.tracker.dt = config.stft.hop_size as f32 / config.stft.sample_rate_hz;
        let mut pipeline = Pipeline::new(array, config).unwrap();

        let block = tone_block(4, 512 * 4, 1000.0, 16_000.0);
        pipeline.process_block(&block).unwrap();

        assert!(pipeline.snapshot().is_some());
    }

    #[test]
    fn reset_clears_frame_counter() {
        let array = square_array();
        let mut pipeline = Pipeline::new(array, PipelineConfig::default()).unwrap();
        let block = tone_block(4, 512 * 4, 1000.0, 16_000.0);
        pipeline.process_block(&block).unwrap();
        assert!(pipeline.snapshot().unwrap().frame_index > 0 || pipeline.snapshot().is_some());
        pipeline.reset();
        assert!(pipeline.snapshot().is_none());
    }
}

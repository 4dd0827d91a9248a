//! Property tests over the end-to-end pipeline.

use doa_geometry::MicArray;
use doa_pipeline::{Pipeline, PipelineConfig};
use proptest::prelude::*;

fn reference_array() -> MicArray {
    MicArray::new(vec![
        [0.0226, 0.0226, 0.0],
        [-0.0226, 0.0226, 0.0],
        [-0.0226, -0.0226, 0.0],
        [0.0226, -0.0226, 0.0],
    ])
    .unwrap()
}

fn default_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.stft.sample_rate_hz = 16_000.0;
    config.tracker.dt = config.stft.hop_size as f32 / config.stft.sample_rate_hz;
    config
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Snapshot frame_index never goes backwards, regardless of how much
    /// (noise-amplitude) audio is pushed through.
    #[test]
    fn frame_index_is_monotone(amp in 0.0f32..1.0f32, n_blocks in 1usize..4) {
        let array = reference_array();
        let mut pipeline = Pipeline::new(array, default_config()).unwrap();

        let mut last_seen: Option<u64> = None;
        for b in 0..n_blocks {
            let block: Vec<Vec<f32>> = (0..4)
                .map(|m| {
                    (0..512)
                        .map(|i| amp * (((b * 512 + i + m) % 7) as f32 / 7.0 - 0.5))
                        .collect()
                })
                .collect();
            pipeline.process_block(&block).unwrap();
            if let Some(snap) = pipeline.snapshot() {
                if let Some(prev) = last_seen {
                    prop_assert!(snap.frame_index >= prev);
                }
                last_seen = Some(snap.frame_index);
            }
        }
    }

    /// Every reported track and candidate azimuth stays within [0, 360).
    #[test]
    fn reported_azimuths_stay_in_range(offset_deg in -720.0f32..720.0f32) {
        let array = reference_array();
        let mut config = default_config();
        config.ssl.orientation_offset_deg = offset_deg;
        let mut pipeline = Pipeline::new(array, config).unwrap();

        let block: Vec<Vec<f32>> = (0..4)
            .map(|m| {
                (0..512 * 4)
                    .map(|i| 0.3 * (((i + m * 37) % 11) as f32 / 11.0 - 0.5))
                    .collect()
            })
            .collect();
        pipeline.process_block(&block).unwrap();

        if let Some(snapshot) = pipeline.snapshot() {
            for c in &snapshot.candidates {
                prop_assert!(c.azimuth_deg >= 0.0 && c.azimuth_deg < 360.0);
            }
            for t in &snapshot.tracks {
                prop_assert!(t.azimuth_deg >= 0.0 && t.azimuth_deg < 360.0);
            }
        }
    }
}

//! Steered Response Power (SRP-PHAT) azimuth scanner.
//!
//! For each grid azimuth and each microphone pair, look up (or
//! interpolate) the GCC-PHAT correlation value at the pair's expected
//! TDOA for that azimuth, and accumulate a pair-weighted sum into the
//! azimuth power map.

use crate::error::SslError;
use doa_geometry::TdoaLut;
use std::collections::HashMap;

/// Precomputed per-pair, per-grid-point sample delays, derived once from
/// a [`TdoaLut`] and a sample rate.
pub struct SrpScanner {
    pairs: Vec<(usize, usize)>,
    /// `delay_samples[pair_index][grid_index]`
    delay_samples: Vec<Vec<f32>>,
    grid_len: usize,
}

impl SrpScanner {
    /// Build a scanner from an explicit pair list (typically
    /// `array.pairs()`) and a TDOA lookup table built over the same array.
    pub fn from_pairs(
        pairs: &[(usize, usize)],
        lut: &TdoaLut,
        sample_rate_hz: f32,
    ) -> Result<Self, doa_geometry::GeometryError> {
        let grid_len = lut.grid_len();
        let mut delay_samples = Vec::with_capacity(pairs.len());
        for &(i, j) in pairs {
            let seconds = lut.get_seconds(i, j)?;
            delay_samples.push(seconds.iter().map(|&s| s * sample_rate_hz).collect());
        }
        Ok(Self {
            pairs: pairs.to_vec(),
            delay_samples,
            grid_len,
        })
    }

    /// Azimuth grid length this scanner was built for.
    #[must_use]
    pub fn grid_len(&self) -> usize {
        self.grid_len
    }

    /// Compute the SRP-PHAT azimuth power map from per-pair GCC-PHAT
    /// correlation sequences.
    ///
    /// `gcc_maps` must have an entry for every pair this scanner was
    /// built with; a missing pair is a caller bug and returns
    /// [`SslError::MissingPair`] rather than silently skipping it.
    /// `pair_weights` defaults to `1.0` for any pair not present in the map.
    pub fn compute_srp(
        &self,
        gcc_maps: &HashMap<(usize, usize), Vec<f32>>,
        pair_weights: Option<&HashMap<(usize, usize), f32>>,
    ) -> Result<Vec<f32>, SslError> {
        let mut power = vec![0.0f32; self.grid_len];

        for (pair_idx, &(i, j)) in self.pairs.iter().enumerate() {
            let correlation = gcc_maps
                .get(&(i, j))
                .ok_or(SslError::MissingPair(i, j))?;
            let center_idx = correlation.len() / 2;
            let weight = pair_weights
                .and_then(|w| w.get(&(i, j)))
                .copied()
                .unwrap_or(1.0);

            for grid_idx in 0..self.grid_len {
                let delay = self.delay_samples[pair_idx][grid_idx];
                let pos = center_idx as f32 + delay;

                let contribution = if (pos - pos.round()).abs() < 1e-4 {
                    let idx = pos.round() as i64;
                    let clamped = idx.clamp(0, correlation.len() as i64 - 1) as usize;
                    correlation[clamped]
                } else {
                    let lo = pos.floor();
                    let hi = pos.ceil();
                    if lo < 0.0 || hi as usize >= correlation.len() {
                        0.0
                    } else {
                        let frac = pos - lo;
                        let v_lo = correlation[lo as usize];
                        let v_hi = correlation[hi as usize];
                        v_lo * (1.0 - frac) + v_hi * frac
                    }
                };

                let contribution = if contribution.is_finite() {
                    contribution
                } else {
                    0.0
                };
                power[grid_idx] += weight * contribution;
            }
        }

        Ok(power)
    }
}

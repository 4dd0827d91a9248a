//! Minima-Controlled Recursive Averaging (MCRA) background noise estimator.
//!
//! A smoothed power spectrum drives a speech-presence probability estimate,
//! which gates whether a sliding minimum-tracking window is allowed to
//! update, which in turn rescales the noise floor estimate.
//!
//! The speech-presence-probability formula used here is
//! `p = clip((R - 1) / R, 0, 1)`, where `R` is the ratio of the smoothed
//! power to the tracked minimum. A nested-clip variant,
//! `clip(clip(R-1,0,None)/(clip(R-1,0,None)+1), 0, 1)`, is also common;
//! both converge to the same fixed points (0 as R -> 1, 1 as R -> infinity).

use crate::error::DspError;

/// Tunables for [`Mcra`], defaults matching the Python source.
#[derive(Debug, Clone, Copy)]
pub struct McraConfig {
    /// Smoothing factor for the running power spectrum `S`.
    pub alpha_s: f32,
    /// Number of frames in the sliding-minimum ring buffer per bin.
    pub minima_window: usize,
    /// Multiplier applied to the tracked minimum to form a new noise estimate.
    pub delta: f32,
    /// Smoothing factor for the final noise-floor EMA.
    pub alpha_d: f32,
    /// Floor applied to the noise estimate to avoid division by zero downstream.
    pub eps_floor: f32,
}

impl Default for McraConfig {
    fn default() -> Self {
        Self {
            alpha_s: 0.85,
            minima_window: 15,
            delta: 1.5,
            alpha_d: 0.1,
            eps_floor: 1e-8,
        }
    }
}

/// Per-bin MCRA noise floor tracker for one channel.
pub struct Mcra {
    config: McraConfig,
    n_freq: usize,
    smoothed: Vec<f32>,
    noise_estimate: Vec<f32>,
    /// Ring buffer of the last `minima_window` smoothed values, per bin.
    minima_ring: Vec<Vec<f32>>,
    ring_pos: usize,
    initialized: bool,
}

impl Mcra {
    /// Create an estimator for `n_freq` frequency bins.
    #[must_use]
    pub fn new(n_freq: usize, config: McraConfig) -> Self {
        Self {
            config,
            n_freq,
            smoothed: vec![0.0; n_freq],
            noise_estimate: vec![config.eps_floor; n_freq],
            minima_ring: vec![Vec::new(); n_freq],
            ring_pos: 0,
            initialized: false,
        }
    }

    /// Reset all internal state; the next `update` call re-initializes.
    pub fn reset(&mut self) {
        self.smoothed = vec![0.0; self.n_freq];
        self.noise_estimate = vec![self.config.eps_floor; self.n_freq];
        self.minima_ring = vec![Vec::new(); self.n_freq];
        self.ring_pos = 0;
        self.initialized = false;
    }

    /// The current per-bin noise power estimate.
    #[must_use]
    pub fn noise_estimate(&self) -> &[f32] {
        &self.noise_estimate
    }

    /// Feed one frame's power spectrum (`|X[k]|^2`) and return the updated
    /// per-bin noise estimate.
    pub fn update(&mut self, power_spectrum: &[f32]) -> Result<&[f32], DspError> {
        if power_spectrum.len() != self.n_freq {
            return Err(DspError::PowerSpectrumLengthMismatch {
                got: power_spectrum.len(),
                expected: self.n_freq,
            });
        }

        if !self.initialized {
            self.smoothed.copy_from_slice(power_spectrum);
            for (n, &p) in self.noise_estimate.iter_mut().zip(power_spectrum.iter()) {
                *n = (self.config.delta * p).max(self.config.eps_floor);
            }
            for (ring, &p) in self.minima_ring.iter_mut().zip(power_spectrum.iter()) {
                *ring = vec![p; self.config.minima_window];
            }
            self.initialized = true;
            return Ok(&self.noise_estimate);
        }

        let alpha_s = self.config.alpha_s;
        for (s, &p) in self.smoothed.iter_mut().zip(power_spectrum.iter()) {
            *s = alpha_s * *s + (1.0 - alpha_s) * p;
        }

        for k in 0..self.n_freq {
            let s = self.smoothed[k];
            let n_hat = self.noise_estimate[k];
            let r = s / (n_hat + self.config.eps_floor);
            let p_speech = ((r - 1.0) / r).clamp(0.0, 1.0);

            if p_speech < 0.5 {
                let ring = &mut self.minima_ring[k];
                if ring.len() < self.config.minima_window {
                    ring.push(s);
                } else {
                    ring[self.ring_pos % self.config.minima_window] = s;
                }
            }

            let ring = &self.minima_ring[k];
            let min_val = ring.iter().copied().fold(f32::INFINITY, f32::min);
            let n_new = (self.config.delta * min_val).max(self.config.eps_floor);

            self.noise_estimate[k] =
                (0.8 * n_hat + 0.2 * n_new).max(self.config.eps_floor);
        }
        self.ring_pos += 1;

        Ok(&self.noise_estimate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let mut mcra = Mcra::new(4, McraConfig::default());
        assert!(matches!(
            mcra.update(&[1.0, 2.0, 3.0]),
            Err(DspError::PowerSpectrumLengthMismatch { .. })
        ));
    }

    #[test]
    fn tracks_constant_noise_floor() {
        let mut mcra = Mcra::new(4, McraConfig::default());
        let floor = vec![0.01f32; 4];
        for _ in 0..200 {
            mcra.update(&floor).unwrap();
        }
        for &n in mcra.noise_estimate() {
            assert!((n - 0.01).abs() < 0.01, "noise estimate drifted: {n}");
        }
    }

    #[test]
    fn noise_estimate_is_robust_to_transient_speech_burst() {
        let mut mcra = Mcra::new(4, McraConfig::default());
        let floor = vec![0.01f32; 4];
        for _ in 0..50 {
            mcra.update(&floor).unwrap();
        }
        let burst = vec![10.0f32; 4];
        for _ in 0..5 {
            mcra.update(&burst).unwrap();
        }
        for &n in mcra.noise_estimate() {
            assert!(n < 1.0, "noise estimate tracked a transient burst: {n}");
        }
    }
}

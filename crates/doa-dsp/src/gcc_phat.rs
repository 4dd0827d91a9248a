//! PHAT-weighted generalized cross-correlation between microphone pairs.
//!
//! Cross power spectrum, optional band-limiting, PHAT (phase-only)
//! normalization, optional frequency weighting, inverse FFT, and a
//! zero-delay-centered (`fftshift`-style) output.

use crate::error::DspError;
use crate::fft::Fft;
use rustfft::num_complex::Complex;

/// Compute the PHAT-weighted cross-correlation between spectra `x_i` and
/// `x_j` from the same analysis frame (rFFT format: `frame_size/2 + 1` bins).
///
/// Returns a real-valued correlation sequence of length `frame_size`
/// (inferred as `2 * (n_freq_bins - 1)`) with zero delay centered at
/// index `frame_size / 2`.
///
/// `band_bins`, given as `(k_min, k_max)`, zeroes all cross-power outside
/// that half-open bin range before PHAT normalization. `freq_weights`,
/// if given, multiplies the normalized cross-spectrum bin-for-bin
/// (combining, e.g., an SNR mask and a frequency-emphasis curve computed
/// upstream).
pub fn gcc_phat(
    x_i: &[Complex<f32>],
    x_j: &[Complex<f32>],
    band_bins: Option<(usize, usize)>,
    freq_weights: Option<&[f32]>,
    eps: f32,
) -> Result<Vec<f32>, DspError> {
    if x_i.len() != x_j.len() {
        return Err(DspError::SpectraShapeMismatch {
            len_i: x_i.len(),
            len_j: x_j.len(),
        });
    }
    let n_freq_bins = x_i.len();
    let n_time = 2 * (n_freq_bins - 1);

    let mut cross: Vec<Complex<f32>> = x_i
        .iter()
        .zip(x_j.iter())
        .map(|(&a, &b)| a * b.conj())
        .collect();

    if let Some((k_min, k_max)) = band_bins {
        if k_min >= k_max || k_max > n_freq_bins {
            return Err(DspError::InvalidBandBins {
                k_min,
                k_max,
                n_freq_bins,
            });
        }
        for (k, c) in cross.iter_mut().enumerate() {
            if k < k_min || k >= k_max {
                *c = Complex::new(0.0, 0.0);
            }
        }
    }

    for c in &mut cross {
        let mag = c.norm();
        *c /= mag + eps;
    }

    if let Some(weights) = freq_weights {
        if weights.len() != n_freq_bins {
            return Err(DspError::FreqWeightsLengthMismatch {
                got: weights.len(),
                expected: n_freq_bins,
            });
        }
        for (c, &w) in cross.iter_mut().zip(weights.iter()) {
            *c *= w;
        }
    }

    let mut had_non_finite = false;
    for c in &mut cross {
        if !c.re.is_finite() || !c.im.is_finite() {
            had_non_finite = true;
            *c = Complex::new(0.0, 0.0);
        }
    }
    if had_non_finite {
        tracing::warn!("non-finite values in GCC-PHAT cross-spectrum; sanitized to zero");
    }

    let fft = Fft::new(n_time);
    let r = fft.inverse(&cross);
    Ok(fftshift(&r))
}

/// Rotate a time-domain sequence so index `n/2` (integer division) holds
/// what was index 0 — i.e. center the zero-lag sample.
fn fftshift(r: &[f32]) -> Vec<f32> {
    let n = r.len();
    let mid = n / 2;
    let mut out = Vec::with_capacity(n);
    out.extend_from_slice(&r[mid..]);
    out.extend_from_slice(&r[..mid]);
    out
}

/// Find the lag (in samples, relative to the centered zero-lag index) and
/// value of the strongest peak in a GCC-PHAT correlation sequence.
#[must_use]
pub fn peak_lag(correlation: &[f32]) -> (i32, f32) {
    let center = correlation.len() / 2;
    let (idx, &val) = correlation
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .unwrap();
    (idx as i32 - center as i32, val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fft::Fft as AnalysisFft;
    use std::f32::consts::PI;

    fn sine_spectrum(freq_hz: f32, fs: f32, n: usize, delay_samples: f32) -> Vec<Complex<f32>> {
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * freq_hz * (i as f32 - delay_samples) / fs).sin())
            .collect();
        AnalysisFft::new(n).forward(&signal)
    }

    #[test]
    fn rejects_shape_mismatch() {
        let a = vec![Complex::new(1.0, 0.0); 5];
        let b = vec![Complex::new(1.0, 0.0); 4];
        assert!(matches!(
            gcc_phat(&a, &b, None, None, 1e-8),
            Err(DspError::SpectraShapeMismatch { .. })
        ));
    }

    #[test]
    fn autocorrelation_peaks_at_zero_lag() {
        let x = sine_spectrum(1000.0, 16000.0, 512, 0.0);
        let r = gcc_phat(&x, &x, None, None, 1e-8).unwrap();
        let (lag, _) = peak_lag(&r);
        assert_eq!(lag, 0);
    }

    #[test]
    fn delayed_signal_peaks_near_delay() {
        let n = 512;
        let fs = 16000.0;
        let delay = 5.0;
        let x_i = sine_spectrum(1000.0, fs, n, 0.0);
        let x_j = sine_spectrum(1000.0, fs, n, delay);
        let r = gcc_phat(&x_i, &x_j, None, None, 1e-8).unwrap();
        let (lag, _) = peak_lag(&r);
        // x_j is a delayed copy of x_i, so correlation peaks near +delay.
        assert!((lag as f32 - delay).abs() <= 1.0, "lag = {lag}");
    }

    #[test]
    fn band_limiting_rejects_invalid_range() {
        let x = vec![Complex::new(1.0, 0.0); 129];
        assert!(matches!(
            gcc_phat(&x, &x, Some((50, 200)), None, 1e-8),
            Err(DspError::InvalidBandBins { .. })
        ));
    }

    #[test]
    fn freq_weights_length_is_validated() {
        let x = vec![Complex::new(1.0, 0.0); 129];
        let weights = vec![1.0; 10];
        assert!(matches!(
            gcc_phat(&x, &x, None, Some(&weights), 1e-8),
            Err(DspError::FreqWeightsLengthMismatch { .. })
        ));
    }
}

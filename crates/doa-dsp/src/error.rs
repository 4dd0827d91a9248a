//! Error taxonomy for the DSP front end (STFT, MCRA, GCC-PHAT).

use thiserror::Error;

/// Errors raised by `doa-dsp`'s streaming front end.
#[derive(Debug, Error)]
pub enum DspError {
    /// `hop_size` must be in `(0, frame_size]`.
    #[error("invalid hop size {hop_size} for frame size {frame_size}")]
    InvalidHopSize {
        /// The offending hop size, in samples.
        hop_size: usize,
        /// The frame size it was validated against, in samples.
        frame_size: usize,
    },

    /// A later call to `StftProcessor::process_block` supplied a different
    /// channel count than the first call.
    #[error("channel count changed from {expected} to {actual}")]
    ChannelCountChanged {
        /// Channel count observed on the first call.
        expected: usize,
        /// Channel count observed on this call.
        actual: usize,
    },

    /// The two spectra passed to `gcc_phat` had different bin counts.
    #[error("spectra shape mismatch: {len_i} vs {len_j} bins")]
    SpectraShapeMismatch {
        /// Bin count of the first spectrum.
        len_i: usize,
        /// Bin count of the second spectrum.
        len_j: usize,
    },

    /// `band_bins = (k_min, k_max)` was out of range or empty.
    #[error("invalid band_bins ({k_min}, {k_max}) for {n_freq_bins} frequency bins")]
    InvalidBandBins {
        /// Lower bin index, inclusive.
        k_min: usize,
        /// Upper bin index, exclusive.
        k_max: usize,
        /// Total number of frequency bins available.
        n_freq_bins: usize,
    },

    /// `freq_weights` length did not match the spectrum's bin count.
    #[error("freq_weights length {got} does not match {expected} frequency bins")]
    FreqWeightsLengthMismatch {
        /// Length actually supplied.
        got: usize,
        /// Length required (number of frequency bins).
        expected: usize,
    },

    /// `MCRA::update` was called with a power spectrum of unexpected length.
    #[error("power spectrum length {got} does not match configured {expected} frequency bins")]
    PowerSpectrumLengthMismatch {
        /// Length actually supplied.
        got: usize,
        /// Length the estimator was constructed for.
        expected: usize,
    },
}

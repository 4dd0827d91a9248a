//! Streaming, overlap-add short-time Fourier transform front end.
//!
//! Samples are appended to a
//! per-channel ring buffer as blocks arrive, and every time at least one
//! `frame_size`-sample window is available it is windowed, transformed,
//! and the buffer is advanced by `hop_size`.

use crate::error::DspError;
use crate::fft::{Fft, Window};
use rustfft::num_complex::Complex;

/// One windowed, transformed analysis frame across all channels.
#[derive(Debug, Clone)]
pub struct StftFrame {
    /// Per-channel complex spectrum, `frame_size / 2 + 1` bins each.
    pub spectra: Vec<Vec<Complex<f32>>>,
}

/// Streaming multichannel STFT analyzer.
pub struct StftProcessor {
    frame_size: usize,
    hop_size: usize,
    window: Window,
    window_coeffs: Vec<f32>,
    fft: Fft,
    buffers: Vec<Vec<f32>>,
    n_channels: Option<usize>,
}

impl StftProcessor {
    /// Create a processor for the given frame/hop size and window.
    ///
    /// `0 < hop_size <= frame_size` is required.
    pub fn new(frame_size: usize, hop_size: usize, window: Window) -> Result<Self, DspError> {
        if hop_size == 0 || hop_size > frame_size {
            return Err(DspError::InvalidHopSize {
                hop_size,
                frame_size,
            });
        }
        Ok(Self {
            frame_size,
            hop_size,
            window,
            window_coeffs: window.coefficients(frame_size),
            fft: Fft::new(frame_size),
            buffers: Vec::new(),
            n_channels: None,
        })
    }

    /// Analysis frame size, in samples.
    #[must_use]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop size between consecutive frames, in samples.
    #[must_use]
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Number of positive-frequency bins per channel spectrum.
    #[must_use]
    pub fn n_freq_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Drop all buffered, not-yet-analyzed samples and forget the channel
    /// count; the next `process_block` call re-establishes it.
    pub fn reset(&mut self) {
        self.buffers.clear();
        self.n_channels = None;
    }

    /// Feed one block of samples (one `Vec<f32>` per channel, equal length)
    /// and return every analysis frame that became available.
    ///
    /// The channel count must be the same across every call for the
    /// lifetime of this processor (enforced after the first call).
    pub fn process_block(&mut self, block: &[Vec<f32>]) -> Result<Vec<StftFrame>, DspError> {
        match self.n_channels {
            None => {
                self.n_channels = Some(block.len());
                self.buffers = vec![Vec::new(); block.len()];
            }
            Some(expected) if expected != block.len() => {
                return Err(DspError::ChannelCountChanged {
                    expected,
                    actual: block.len(),
                });
            }
            Some(_) => {}
        }

        for (buf, channel) in self.buffers.iter_mut().zip(block.iter()) {
            buf.extend_from_slice(channel);
        }

        let mut frames = Vec::new();
        while self.buffers[0].len() >= self.frame_size {
            let mut spectra = Vec::with_capacity(self.buffers.len());
            for buf in &self.buffers {
                let mut windowed: Vec<f32> = buf[..self.frame_size].to_vec();
                for (s, &w) in windowed.iter_mut().zip(self.window_coeffs.iter()) {
                    *s *= w;
                }
                spectra.push(self.fft.forward(&windowed));
            }
            frames.push(StftFrame { spectra });

            for buf in &mut self.buffers {
                buf.drain(..self.hop_size);
            }
        }

        Ok(frames)
    }

    /// The window function this processor applies before each transform.
    #[must_use]
    pub fn window(&self) -> Window {
        self.window
    }
}

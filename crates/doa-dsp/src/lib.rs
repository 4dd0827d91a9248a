//! doa-dsp - streaming STFT front end, MCRA noise estimation, and
//! PHAT-weighted cross-correlation for direction-of-arrival pipelines.
//!
//! - [`stft`] - per-channel streaming analysis framing
//! - [`mcra`] - per-bin background noise floor tracking
//! - [`gcc_phat`] - PHAT-normalized cross-correlation between mic pairs
//! - [`fft`] - shared windowed-FFT primitive

pub mod error;
pub mod fft;
pub mod gcc_phat;
pub mod mcra;
pub mod stft;

pub use error::DspError;
pub use fft::{Fft, Window};
pub use gcc_phat::{gcc_phat as compute_gcc_phat, peak_lag};
pub use mcra::{Mcra, McraConfig};
pub use stft::{StftFrame, StftProcessor};

//! Aggregate error type for pipeline construction and operation.

use thiserror::Error;

/// Errors raised while constructing or driving a [`crate::pipeline::Pipeline`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Array geometry or TDOA lookup table construction failed.
    #[error(transparent)]
    Geometry(#[from] doa_geometry::GeometryError),

    /// STFT, MCRA, or GCC-PHAT computation failed.
    #[error(transparent)]
    Dsp(#[from] doa_dsp::DspError),

    /// SRP scanning or peak extraction failed.
    #[error(transparent)]
    Ssl(#[from] doa_ssl::SslError),
}

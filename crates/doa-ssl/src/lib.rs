//! doa-ssl - SRP-PHAT azimuth scanning and peak extraction.
//!
//! - [`srp::SrpScanner`] - accumulates per-pair GCC-PHAT correlations into
//!   an azimuth power map
//! - [`peaks::PeakExtractor`] - extracts well-separated DOA candidates
//!   from that map

pub mod error;
pub mod peaks;
pub mod srp;

pub use error::SslError;
pub use peaks::{DoaCandidate, PeakExtractor};
pub use srp::SrpScanner;

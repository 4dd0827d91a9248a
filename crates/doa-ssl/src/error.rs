//! Error taxonomy for the SRP-PHAT scanner and peak extractor.

use thiserror::Error;

/// Errors raised by [`crate::srp::SrpScanner`].
#[derive(Debug, Error)]
pub enum SslError {
    /// A microphone pair the scanner's geometry expects had no GCC-PHAT
    /// map supplied for this frame. This indicates a caller bug (the
    /// pipeline failed to compute GCC-PHAT for every geometric pair), not
    /// a recoverable runtime condition.
    #[error("missing GCC-PHAT map for microphone pair ({0}, {1})")]
    MissingPair(usize, usize),
}

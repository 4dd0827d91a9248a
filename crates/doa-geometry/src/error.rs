//! Error taxonomy for array geometry and TDOA lookup construction.

use thiserror::Error;

/// Errors raised while constructing or querying array geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// Fewer than two microphones were supplied; no pairs can be formed.
    #[error("array must have at least 2 microphones, got {0}")]
    TooFewMics(usize),

    /// The azimuth grid passed to `TdoaLut::new` was empty.
    #[error("azimuth grid must be non-empty")]
    EmptyAzimuthGrid,

    /// The azimuth grid was not sorted in strictly increasing order.
    #[error("azimuth grid must be sorted in strictly increasing order, violated at index {0}")]
    UnsortedAzimuthGrid(usize),

    /// The requested pair `(i, j)` has no entry in the lookup table.
    #[error("no TDOA entry for microphone pair ({0}, {1})")]
    UnknownPair(usize, usize),

    /// Speed of sound must be positive.
    #[error("speed of sound must be positive, got {0}")]
    InvalidSpeedOfSound(f32),
}

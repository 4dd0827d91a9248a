//! doa-geometry - microphone array geometry and TDOA lookup tables.
//!
//! Provides the static, precomputed half of a direction-of-arrival
//! pipeline: where the microphones are, which pairs correlate against
//! each other, and how a given azimuth maps to an expected
//! time-difference-of-arrival for every pair.
//!
//! - [`array::MicArray`] - microphone positions, derived pairs, planarity
//!   diagnostics
//! - [`tdoa::TdoaLut`] - per-pair TDOA precomputed over a discrete
//!   azimuth grid
//! - [`angle`] - degree-wrapping helpers shared across the workspace

pub mod angle;
pub mod array;
pub mod error;
pub mod tdoa;

pub use array::{GeometryDiagnostics, MicArray, MicPosition};
pub use error::GeometryError;
pub use tdoa::TdoaLut;

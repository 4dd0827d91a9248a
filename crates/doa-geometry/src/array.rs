//! Planar microphone array geometry.

use crate::error::GeometryError;

/// A single microphone's 3-D position in meters, array-local frame.
pub type MicPosition = [f32; 3];

/// Diagnostics computed once at construction time, non-fatal.
#[derive(Debug, Clone, Default)]
pub struct GeometryDiagnostics {
    /// Largest absolute deviation from the best-fit `z = 0` plane, in meters.
    pub max_z_deviation_m: f32,
    /// Distance of the centroid from the array-local origin, in meters.
    pub centroid_offset_m: f32,
    /// Largest pairwise distance between any two microphones, in meters.
    pub aperture_m: f32,
}

/// A planar (or near-planar) microphone array: positions plus derived pairs.
#[derive(Debug, Clone)]
pub struct MicArray {
    positions: Vec<MicPosition>,
    pairs: Vec<(usize, usize)>,
    diagnostics: GeometryDiagnostics,
}

const Z_PLANARITY_WARN_M: f32 = 0.005;
const CENTROID_OFFSET_WARN_M: f32 = 0.02;
const APERTURE_MIN_WARN_M: f32 = 0.02;
const APERTURE_MAX_WARN_M: f32 = 0.12;

impl MicArray {
    /// Build an array from microphone positions (array-local, meters).
    ///
    /// Generates all `i < j` microphone pairs and runs non-fatal
    /// planarity/centroid/aperture diagnostics, logging a `tracing::warn!`
    /// for each one that falls outside the expected range for a small
    /// planar array.
    pub fn new(positions: Vec<MicPosition>) -> Result<Self, GeometryError> {
        if positions.len() < 2 {
            return Err(GeometryError::TooFewMics(positions.len()));
        }

        let n = positions.len();
        let mut pairs = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairs.push((i, j));
            }
        }

        let diagnostics = Self::run_diagnostics(&positions, &pairs);
        Ok(Self {
            positions,
            pairs,
            diagnostics,
        })
    }

    fn run_diagnostics(
        positions: &[MicPosition],
        pairs: &[(usize, usize)],
    ) -> GeometryDiagnostics {
        let n = positions.len() as f32;
        let centroid = positions.iter().fold([0.0f32; 3], |mut acc, p| {
            acc[0] += p[0];
            acc[1] += p[1];
            acc[2] += p[2];
            acc
        });
        let centroid = [centroid[0] / n, centroid[1] / n, centroid[2] / n];
        let centroid_offset_m =
            (centroid[0].powi(2) + centroid[1].powi(2) + centroid[2].powi(2)).sqrt();

        let max_z_deviation_m = positions
            .iter()
            .map(|p| (p[2] - centroid[2]).abs())
            .fold(0.0f32, f32::max);

        let aperture_m = pairs
            .iter()
            .map(|&(i, j)| distance(positions[i], positions[j]))
            .fold(0.0f32, f32::max);

        if max_z_deviation_m > Z_PLANARITY_WARN_M {
            tracing::warn!(
                max_z_deviation_m,
                threshold_m = Z_PLANARITY_WARN_M,
                "microphone array is not planar within tolerance"
            );
        }
        if centroid_offset_m > CENTROID_OFFSET_WARN_M {
            tracing::warn!(
                centroid_offset_m,
                threshold_m = CENTROID_OFFSET_WARN_M,
                "microphone array centroid is offset from the array-local origin"
            );
        }
        if aperture_m < APERTURE_MIN_WARN_M {
            tracing::warn!(
                aperture_m,
                threshold_m = APERTURE_MIN_WARN_M,
                "microphone array aperture is unusually small"
            );
        } else if aperture_m > APERTURE_MAX_WARN_M {
            tracing::warn!(
                aperture_m,
                threshold_m = APERTURE_MAX_WARN_M,
                "microphone array aperture is unusually large"
            );
        }

        GeometryDiagnostics {
            max_z_deviation_m,
            centroid_offset_m,
            aperture_m,
        }
    }

    /// Number of microphones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the array has no microphones (never true for a constructed `MicArray`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Microphone positions in array-local coordinates.
    #[must_use]
    pub fn positions(&self) -> &[MicPosition] {
        &self.positions
    }

    /// All `i < j` microphone index pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    /// Diagnostics computed at construction time.
    #[must_use]
    pub fn diagnostics(&self) -> &GeometryDiagnostics {
        &self.diagnostics
    }

    /// The largest pairwise distance between any two microphones.
    #[must_use]
    pub fn aperture_m(&self) -> f32 {
        self.diagnostics.aperture_m
    }
}

fn distance(a: MicPosition, b: MicPosition) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

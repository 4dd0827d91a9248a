//! Precomputed time-difference-of-arrival lookup table over an azimuth grid.

use crate::array::MicArray;
use crate::error::GeometryError;

/// Precomputed TDOA, in seconds, for every microphone pair at every grid azimuth.
///
/// Uses the far-field plane-wave approximation: for a source at azimuth
/// `theta` (0deg = +X, 90deg = +Y, measured counter-clockwise in the array
/// plane), the unit direction of arrival is `u(theta) = [cos theta, sin
/// theta, 0]`, and the TDOA between mics `i` and `j` is
/// `tau_ij = -dot(pos_j - pos_i, u(theta)) / speed_of_sound`.
/// The sign convention matches the GCC-PHAT correlation lag convention
/// used in `doa-dsp::gcc_phat`.
#[derive(Debug, Clone)]
pub struct TdoaLut {
    azimuth_grid_deg: Vec<f32>,
    pairs: Vec<(usize, usize)>,
    /// `tdoa_sec[pair_index][grid_index]`
    tdoa_sec: Vec<Vec<f32>>,
    speed_of_sound_m_s: f32,
}

impl TdoaLut {
    /// Build a TDOA lookup table for `array` over `azimuth_grid_deg`.
    ///
    /// `azimuth_grid_deg` must be non-empty and strictly increasing.
    /// `speed_of_sound_m_s` is typically 343.0 (dry air, ~20C).
    pub fn new(
        array: &MicArray,
        azimuth_grid_deg: Vec<f32>,
        speed_of_sound_m_s: f32,
    ) -> Result<Self, GeometryError> {
        if azimuth_grid_deg.is_empty() {
            return Err(GeometryError::EmptyAzimuthGrid);
        }
        if speed_of_sound_m_s <= 0.0 {
            return Err(GeometryError::InvalidSpeedOfSound(speed_of_sound_m_s));
        }
        for w in azimuth_grid_deg.windows(2) {
            if w[1] <= w[0] {
                let idx = azimuth_grid_deg
                    .iter()
                    .position(|&v| v == w[1])
                    .unwrap_or(0);
                return Err(GeometryError::UnsortedAzimuthGrid(idx));
            }
        }

        let pairs = array.pairs().to_vec();
        let positions = array.positions();

        let unit_vectors: Vec<(f32, f32)> = azimuth_grid_deg
            .iter()
            .map(|&deg| {
                let rad = deg.to_radians();
                (rad.cos(), rad.sin())
            })
            .collect();

        let mut tdoa_sec = Vec::with_capacity(pairs.len());
        for &(i, j) in &pairs {
            let delta = [
                positions[j][0] - positions[i][0],
                positions[j][1] - positions[i][1],
            ];
            let row: Vec<f32> = unit_vectors
                .iter()
                .map(|&(ux, uy)| {
                    let proj = delta[0] * ux + delta[1] * uy;
                    -proj / speed_of_sound_m_s
                })
                .collect();
            tdoa_sec.push(row);
        }

        Ok(Self {
            azimuth_grid_deg,
            pairs,
            tdoa_sec,
            speed_of_sound_m_s,
        })
    }

    fn pair_index(&self, i: usize, j: usize) -> Option<(usize, bool)> {
        self.pairs
            .iter()
            .position(|&(pi, pj)| pi == i && pj == j)
            .map(|idx| (idx, false))
            .or_else(|| {
                self.pairs
                    .iter()
                    .position(|&(pi, pj)| pi == j && pj == i)
                    .map(|idx| (idx, true))
            })
    }

    /// Full TDOA row (seconds, one per azimuth grid point) for pair `(i, j)`.
    ///
    /// Accepts either storage order of the pair; if queried with the
    /// reversed order the row is negated.
    pub fn get_seconds(&self, i: usize, j: usize) -> Result<Vec<f32>, GeometryError> {
        let (idx, negate) = self
            .pair_index(i, j)
            .ok_or(GeometryError::UnknownPair(i, j))?;
        let row = &self.tdoa_sec[idx];
        Ok(if negate {
            row.iter().map(|&v| -v).collect()
        } else {
            row.clone()
        })
    }

    /// TDOA in seconds for pair `(i, j)` at a specific grid index.
    pub fn seconds_at(&self, i: usize, j: usize, grid_idx: usize) -> Result<f32, GeometryError> {
        let (idx, negate) = self
            .pair_index(i, j)
            .ok_or(GeometryError::UnknownPair(i, j))?;
        let v = *self
            .tdoa_sec
            .get(idx)
            .and_then(|row| row.get(grid_idx))
            .ok_or(GeometryError::UnknownPair(i, j))?;
        Ok(if negate { -v } else { v })
    }

    /// The azimuth grid, in degrees, this table was built over.
    #[must_use]
    pub fn azimuth_grid_deg(&self) -> &[f32] {
        &self.azimuth_grid_deg
    }

    /// Number of azimuth grid points.
    #[must_use]
    pub fn grid_len(&self) -> usize {
        self.azimuth_grid_deg.len()
    }

    /// Maximum possible |TDOA| across all pairs, in seconds: `aperture / c`.
    #[must_use]
    pub fn max_tdoa_seconds(&self, array: &MicArray) -> f32 {
        array.aperture_m() / self.speed_of_sound_m_s
    }

    /// `max_tdoa_seconds` converted to samples at `sample_rate_hz`.
    #[must_use]
    pub fn max_tdoa_samples(&self, array: &MicArray, sample_rate_hz: f32) -> f32 {
        self.max_tdoa_seconds(array) * sample_rate_hz
    }
}

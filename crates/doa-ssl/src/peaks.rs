//! Non-maximum-suppressing peak extraction from an SRP-PHAT azimuth map.
//!
//! Repeatedly takes the argmax, stops once it falls below `min_power` or
//! `max_sources` candidates have been found, and zero out a circular
//! neighborhood around each accepted peak before the next argmax.

use doa_geometry::angle::{circular_distance_deg, wrap_deg_0_360};

/// One candidate direction-of-arrival extracted from an azimuth power map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoaCandidate {
    /// Azimuth in degrees, wrapped to `[0, 360)`.
    pub azimuth_deg: f32,
    /// SRP-PHAT power at this azimuth.
    pub power: f32,
    /// Index into the azimuth grid this candidate came from.
    pub grid_index: usize,
}

/// Extracts up to `max_sources` well-separated peaks from an azimuth power map.
#[derive(Debug, Clone, Copy)]
pub struct PeakExtractor {
    /// Maximum number of candidates to extract per frame.
    pub max_sources: usize,
    /// Candidates below this power are not extracted.
    pub min_power: f32,
    /// Half-width, in degrees, of the neighborhood suppressed around each
    /// accepted peak before searching for the next one.
    pub suppression_deg: f32,
}

impl Default for PeakExtractor {
    fn default() -> Self {
        Self {
            max_sources: 3,
            min_power: 0.05,
            suppression_deg: 25.0,
        }
    }
}

impl PeakExtractor {
    /// Extract candidates from `power_map`, evaluated at `azimuth_grid_deg`.
    ///
    /// `power_map.len()` must equal `azimuth_grid_deg.len()`; mismatched
    /// lengths degrade gracefully by scanning only the overlapping range.
    #[must_use]
    pub fn extract(&self, power_map: &[f32], azimuth_grid_deg: &[f32]) -> Vec<DoaCandidate> {
        let n = power_map.len().min(azimuth_grid_deg.len());
        let mut working: Vec<f32> = power_map[..n]
            .iter()
            .map(|v| if v.is_finite() { *v } else { 0.0 })
            .collect();
        let mut candidates = Vec::with_capacity(self.max_sources);

        for _ in 0..self.max_sources {
            let (idx, &power) = working
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
                .unwrap();

            if power < self.min_power {
                break;
            }

            candidates.push(DoaCandidate {
                azimuth_deg: wrap_deg_0_360(azimuth_grid_deg[idx]),
                power,
                grid_index: idx,
            });

            self.suppress_neighborhood(&mut working, azimuth_grid_deg, idx);
        }

        candidates
    }

    fn suppress_neighborhood(&self, working: &mut [f32], grid: &[f32], center_idx: usize) {
        let center_deg = grid[center_idx];
        for (k, v) in working.iter_mut().enumerate() {
            if circular_distance_deg(grid[k], center_deg).abs() <= self.suppression_deg {
                *v = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<f32> {
        (0..360).map(|i| i as f32).collect()
    }

    #[test]
    fn extracts_single_peak() {
        let grid = grid();
        let mut map = vec![0.0f32; 360];
        map[90] = 1.0;
        let extractor = PeakExtractor::default();
        let candidates = extractor.extract(&map, &grid);
        assert_eq!(candidates.len(), 1);
        assert!((candidates[0].azimuth_deg - 90.0).abs() < 1e-3);
    }

    #[test]
    fn respects_min_power_threshold() {
        let grid = grid();
        let map = vec![0.01f32; 360];
        let extractor = PeakExtractor::default();
        assert!(extractor.extract(&map, &grid).is_empty());
    }

    #[test]
    fn suppresses_nearby_secondary_peak() {
        let grid = grid();
        let mut map = vec![0.0f32; 360];
        map[90] = 1.0;
        map[100] = 0.9; // within 25deg suppression radius of 90
        let extractor = PeakExtractor::default();
        let candidates = extractor.extract(&map, &grid);
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn keeps_well_separated_peaks_up_to_max_sources() {
        let grid = grid();
        let mut map = vec![0.0f32; 360];
        map[0] = 1.0;
        map[120] = 0.9;
        map[240] = 0.8;
        let extractor = PeakExtractor::default();
        let candidates = extractor.extract(&map, &grid);
        assert_eq!(candidates.len(), 3);
    }
}

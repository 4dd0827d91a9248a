//! Angular arithmetic shared by geometry, SSL and tracking.

/// Wrap a degree value into `[-180, 180)`.
#[must_use]
pub fn wrap_deg(deg: f32) -> f32 {
    let mut d = deg % 360.0;
    if d < -180.0 {
        d += 360.0;
    } else if d >= 180.0 {
        d -= 360.0;
    }
    d
}

/// Wrap a degree value into `[0, 360)`.
#[must_use]
pub fn wrap_deg_0_360(deg: f32) -> f32 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

/// Shortest signed angular distance `a - b`, wrapped into `[-180, 180)`.
#[must_use]
pub fn circular_distance_deg(a: f32, b: f32) -> f32 {
    wrap_deg(a - b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_deg_basic() {
        assert!((wrap_deg(0.0) - 0.0).abs() < 1e-6);
        assert!((wrap_deg(180.0) - (-180.0)).abs() < 1e-4);
        assert!((wrap_deg(-180.0) - (-180.0)).abs() < 1e-4);
        assert!((wrap_deg(361.0) - 1.0).abs() < 1e-3);
        assert!((wrap_deg(-361.0) - (-1.0)).abs() < 1e-3);
    }

    #[test]
    fn wrap_deg_0_360_basic() {
        assert!((wrap_deg_0_360(-1.0) - 359.0).abs() < 1e-3);
        assert!((wrap_deg_0_360(360.0) - 0.0).abs() < 1e-3);
        assert!((wrap_deg_0_360(45.0) - 45.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn wrap_deg_is_idempotent(d in -1.0e6f32..1.0e6f32) {
            let w = wrap_deg(d);
            prop_assert!(w >= -180.0 && w < 180.0);
            prop_assert!((wrap_deg(w) - w).abs() < 1e-2);
        }

        #[test]
        fn wrap_deg_0_360_is_idempotent(d in -1.0e6f32..1.0e6f32) {
            let w = wrap_deg_0_360(d);
            prop_assert!(w >= 0.0 && w < 360.0);
            prop_assert!((wrap_deg_0_360(w) - w).abs() < 1e-2);
        }

        #[test]
        fn circular_distance_is_antisymmetric(a in -1.0e4f32..1.0e4f32, b in -1.0e4f32..1.0e4f32) {
            let d_ab = circular_distance_deg(a, b);
            let d_ba = circular_distance_deg(b, a);
            // both are in [-180, 180); their sum wraps to 0 except at the +-180 boundary
            let sum = wrap_deg(d_ab + d_ba);
            prop_assert!(sum.abs() < 1e-2 || (sum.abs() - 360.0).abs() < 1e-2);
        }
    }
}

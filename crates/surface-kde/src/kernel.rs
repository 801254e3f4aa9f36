//! Distance and kernel functions used by the surface KDE.

/// Quartic (biweight) kernel constant.
const QUARTIC_NORM: f64 = 15.0 / 16.0;

/// Quartic kernel estimate of weight `z` at distance `d` with bandwidth `h`.
///
/// Zero for `d > h`, and exactly zero at `d == h`.
#[inline]
pub fn quartic(d: f64, h: f64, z: f64) -> f64 {
    if d <= h {
        QUARTIC_NORM * (1.0 - (d / h).powi(2)).powi(2) * z
    } else {
        0.0
    }
}

/// Euclidean distance with the x component divided by `x_warp` before the
/// square root.
#[inline]
pub fn warped_distance(p1: (f64, f64), p2: (f64, f64), x_warp: f64) -> f64 {
    ((p1.0 - p2.0).powi(2) / x_warp + (p1.1 - p2.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartic_peak() {
        assert!((quartic(0.0, 2.0, 1.0) - 0.9375).abs() < 1e-12);
        assert!((quartic(0.0, 2.0, 4.0) - 3.75).abs() < 1e-12);
    }

    #[test]
    fn test_quartic_edge_is_zero() {
        assert_eq!(quartic(2.0, 2.0, 10.0), 0.0);
        assert_eq!(quartic(2.5, 2.0, 10.0), 0.0);
    }

    #[test]
    fn test_quartic_halfway() {
        // (15/16) * (1 - 0.25)^2
        assert!((quartic(1.0, 2.0, 1.0) - 0.52734375).abs() < 1e-12);
    }

    #[test]
    fn test_warped_distance_unwarped() {
        assert_eq!(warped_distance((0.0, 0.0), (3.0, 4.0), 1.0), 5.0);
    }

    #[test]
    fn test_warped_distance_attenuates_x() {
        // x distance 4 over warp 4 contributes 16 / 4 = 4
        assert_eq!(warped_distance((0.0, 0.0), (4.0, 0.0), 4.0), 2.0);
        assert_eq!(warped_distance((0.0, 1.0), (0.0, 4.0), 9.0), 3.0);
    }
}

//! Polar projection helpers.
//!
//! The descriptor grid bins points by planar range and azimuth. Sector
//! widths and yaw estimates are specified in degrees, so the azimuth helper
//! works in degrees as well.

/// Four-quadrant azimuth of `(x, y)` in degrees, in `[0, 360)`.
///
/// Azimuth increases counter-clockwise from the +X axis. The origin maps
/// to 0 degrees.
///
/// # Example
/// ```
/// use polar_context::core::math::azimuth_deg;
///
/// assert!((azimuth_deg(1.0, 1.0) - 45.0).abs() < 1e-4);
/// assert!((azimuth_deg(0.0, -1.0) - 270.0).abs() < 1e-4);
/// ```
#[inline]
pub fn azimuth_deg(x: f32, y: f32) -> f32 {
    let deg = y.atan2(x).to_degrees();
    if deg < 0.0 { deg + 360.0 } else { deg }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_azimuth_axes() {
        assert_relative_eq!(azimuth_deg(1.0, 0.0), 0.0);
        assert_relative_eq!(azimuth_deg(0.0, 1.0), 90.0);
        assert_relative_eq!(azimuth_deg(-1.0, 0.0), 180.0);
        assert_relative_eq!(azimuth_deg(0.0, -1.0), 270.0);
    }

    #[test]
    fn test_azimuth_quadrants() {
        assert_relative_eq!(azimuth_deg(1.0, 1.0), 45.0, epsilon = 1e-4);
        assert_relative_eq!(azimuth_deg(-1.0, 1.0), 135.0, epsilon = 1e-4);
        assert_relative_eq!(azimuth_deg(-1.0, -1.0), 225.0, epsilon = 1e-4);
        assert_relative_eq!(azimuth_deg(1.0, -1.0), 315.0, epsilon = 1e-4);
    }

    #[test]
    fn test_azimuth_origin() {
        assert_relative_eq!(azimuth_deg(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_azimuth_range() {
        // Sweep a full circle and confirm the result never leaves [0, 360).
        for i in 0..720 {
            let angle = (i as f32 * 0.5).to_radians();
            let deg = azimuth_deg(angle.cos(), angle.sin());
            assert!((0.0..360.0).contains(&deg), "azimuth {} out of range", deg);
        }
    }

    #[test]
    fn test_azimuth_just_below_full_turn() {
        let deg = azimuth_deg(1.0, -1e-4);
        assert!(deg > 359.0 && deg < 360.0);
    }
}

//! 3D point type.

use serde::{Deserialize, Serialize};

/// A 3D point in the sensor frame, in meters.
///
/// Z is height above the sensor origin; the descriptor grid bins by the
/// planar (XY) projection only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3D {
    /// X coordinate in meters
    pub x: f32,
    /// Y coordinate in meters
    pub y: f32,
    /// Z coordinate (height) in meters
    pub z: f32,
}

impl Point3D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance from the sensor origin projected onto the XY plane.
    #[inline]
    pub fn planar_range(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

//! 3D point cloud container.

use serde::{Deserialize, Serialize};

use super::point::Point3D;

/// Collection of 3D points using Struct of Arrays (SoA) layout.
///
/// Instead of `Vec<Point3D>` (x,y,z,x,y,z...), stores separate coordinate
/// vectors. This is the input format for descriptor construction; callers
/// are expected to hand over already downsampled, motion-compensated
/// clouds in the sensor frame.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointCloud3D {
    /// X coordinates in meters
    pub xs: Vec<f32>,
    /// Y coordinates in meters
    pub ys: Vec<f32>,
    /// Z coordinates (height) in meters
    pub zs: Vec<f32>,
}

impl PointCloud3D {
    /// Create an empty point cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
            zs: Vec::with_capacity(capacity),
        }
    }

    /// Create from a slice of points (converts AoS to SoA).
    pub fn from_points(points: &[Point3D]) -> Self {
        let mut cloud = Self::with_capacity(points.len());
        for p in points {
            cloud.push(*p);
        }
        cloud
    }

    /// Add a point.
    #[inline]
    pub fn push(&mut self, point: Point3D) {
        self.push_xyz(point.x, point.y, point.z);
    }

    /// Add a point by coordinates directly.
    #[inline]
    pub fn push_xyz(&mut self, x: f32, y: f32, z: f32) {
        self.xs.push(x);
        self.ys.push(y);
        self.zs.push(z);
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Clear all points.
    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.zs.clear();
    }

    /// Iterate over points (creates Point3D on the fly).
    pub fn iter(&self) -> impl Iterator<Item = Point3D> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .zip(self.zs.iter())
            .map(|((&x, &y), &z)| Point3D::new(x, y, z))
    }
}

//! The scan-context descriptor matrix and its derived keys.

use crate::core::math::azimuth_deg;
use crate::core::types::PointCloud3D;

/// Rotation-equivariant polar descriptor of one LiDAR scan.
///
/// The descriptor is an `R` x `S` matrix: rows are radial rings (distance
/// from the sensor, projected onto the XY plane), columns are azimuthal
/// sectors. Each cell holds the maximum height observed in that bin, after
/// a fixed mounting-height offset has been added; empty bins hold 0. A yaw
/// rotation of the sensor permutes columns, which is what makes the
/// matching in [`distance`](super::distance) rotation-invariant.
///
/// `R` and `S` are compile-time parameters because the ring key `[f32; R]`
/// is fed directly into a fixed-dimension k-d tree; the remaining knobs
/// (maximum radius, sensor height) stay runtime values.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanContext<const R: usize = 20, const S: usize = 60> {
    /// Cells in sector-major order: `cells[sector * R + ring]`.
    /// Keeps each sector's column contiguous for the cosine distance.
    cells: Vec<f32>,

    /// Per-ring mean of the cells (length `R`).
    ring_key: [f32; R],

    /// Per-sector mean of the cells (length `S`).
    sector_key: [f32; S],
}

impl<const R: usize, const S: usize> ScanContext<R, S> {
    /// Build the descriptor from a point cloud in the sensor frame.
    ///
    /// # Arguments
    /// * `cloud` - Downsampled scan points in the sensor frame
    /// * `max_radius` - Points beyond this planar range are ignored (meters)
    /// * `sensor_height` - Added to every Z so heights are roughly
    ///   ground-relative when the scan is in sensor-local coordinates;
    ///   pass 0.0 for clouds already in a base frame (meters)
    pub fn from_cloud(cloud: &PointCloud3D, max_radius: f32, sensor_height: f32) -> Self {
        let mut cells = vec![0.0f32; R * S];
        let ring_width = max_radius / R as f32;
        let sector_width = 360.0 / S as f32;

        for point in cloud.iter() {
            let range = point.planar_range();
            if range > max_radius {
                continue;
            }

            let ring = ((range / ring_width) as usize).min(R - 1);
            let sector = ((azimuth_deg(point.x, point.y) / sector_width) as usize).min(S - 1);

            let cell = &mut cells[sector * R + ring];
            *cell = cell.max(point.z + sensor_height);
        }

        Self::from_cells(cells)
    }

    /// Wrap a cell vector and compute both keys.
    fn from_cells(cells: Vec<f32>) -> Self {
        debug_assert_eq!(cells.len(), R * S);

        let mut ring_key = [0.0f32; R];
        let mut sector_key = [0.0f32; S];
        for sector in 0..S {
            let column = &cells[sector * R..(sector + 1) * R];
            for (ring, &value) in column.iter().enumerate() {
                ring_key[ring] += value;
                sector_key[sector] += value;
            }
        }
        for value in ring_key.iter_mut() {
            *value /= S as f32;
        }
        for value in sector_key.iter_mut() {
            *value /= R as f32;
        }

        Self {
            cells,
            ring_key,
            sector_key,
        }
    }

    /// Number of radial rings.
    pub const fn rings(&self) -> usize {
        R
    }

    /// Number of azimuthal sectors.
    pub const fn sectors(&self) -> usize {
        S
    }

    /// Cell value at (ring, sector).
    #[inline]
    pub fn get(&self, ring: usize, sector: usize) -> f32 {
        self.cells[sector * R + ring]
    }

    /// One sector's column of ring values (contiguous slice of length `R`).
    #[inline]
    pub fn sector_column(&self, sector: usize) -> &[f32] {
        &self.cells[sector * R..(sector + 1) * R]
    }

    /// All cells in sector-major order (for visualization or export).
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    /// Ring key: mean cell value per ring. Invariant under sensor yaw.
    pub fn ring_key(&self) -> &[f32; R] {
        &self.ring_key
    }

    /// Sector key: mean cell value per sector. Permutes under sensor yaw.
    pub fn sector_key(&self) -> &[f32; S] {
        &self.sector_key
    }

    /// Copy of this descriptor with columns cyclically shifted right.
    ///
    /// Sector `j` of the input becomes sector `(j + shift) mod S` of the
    /// output. A sensor yaw of `shift * (360 / S)` degrees produces exactly
    /// this permutation of the descriptor.
    pub fn shifted(&self, shift: usize) -> Self {
        let shift = shift % S;
        let mut cells = vec![0.0f32; R * S];
        for sector in 0..S {
            let dst = (sector + shift) % S;
            cells[dst * R..(dst + 1) * R].copy_from_slice(self.sector_column(sector));
        }
        Self::from_cells(cells)
    }
}

//! Polar-grid scan descriptors for place recognition.
//!
//! A [`ScanContext`] summarizes one LiDAR scan as a small ring-by-sector
//! matrix of maximum heights. Two derived keys support fast matching: the
//! ring key (per-ring mean, invariant under sensor yaw) drives candidate
//! retrieval, while the sector key (per-sector mean) drives coarse yaw
//! alignment. The [`distance`] module scores aligned descriptor pairs.
//!
//! Based on Kim & Kim, "Scan Context: Egocentric Spatial Descriptor for
//! Place Recognition within 3D Point Cloud Map", IROS 2018.

mod context;
pub mod distance;

pub use context::ScanContext;

//! Configuration for loop-closure detection.

use serde::{Deserialize, Serialize};

/// Configuration for [`LoopDetector`](super::LoopDetector).
///
/// Defaults follow the values validated in the Scan Context paper for a
/// 20-ring x 60-sector grid on outdoor LiDAR data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoopDetectorConfig {
    /// Maximum planar range considered by the descriptor (meters).
    /// Points farther out are ignored.
    /// Default: 80.0
    pub max_radius: f32,

    /// Sensor mounting height, added to every point's Z so bin heights are
    /// roughly ground-relative (meters). Set to 0.0 when scans are already
    /// expressed in a base frame.
    /// Default: 2.0
    pub sensor_height: f32,

    /// Number of most-recent scans excluded from matching.
    /// Guarantees a query can never match itself or its immediate
    /// temporal neighbors.
    /// Default: 50
    pub num_exclude_recent: usize,

    /// Number of ring-key candidates retrieved from the index per query.
    /// Each candidate is re-scored with the full descriptor distance.
    /// Default: 10
    pub num_candidates: usize,

    /// Fraction of the sector count searched around the coarse yaw
    /// estimate during fine alignment.
    /// Default: 0.1
    pub search_ratio: f32,

    /// Descriptor distance below which a candidate is accepted as a loop
    /// closure. Empirically 0.1-0.2 works for a 20x60 grid; higher values
    /// need downstream geometric verification.
    /// Default: 0.13
    pub distance_threshold: f32,

    /// Number of ingested scans between ring-key index rebuilds.
    /// Rebuilding on every insert would be wasted work; stale entries are
    /// covered by the recency exclusion.
    /// Default: 50
    pub tree_rebuild_period: usize,
}

impl Default for LoopDetectorConfig {
    fn default() -> Self {
        Self {
            max_radius: 80.0,
            sensor_height: 2.0,
            num_exclude_recent: 50,
            num_candidates: 10,
            search_ratio: 0.1,
            distance_threshold: 0.13,
            tree_rebuild_period: 50,
        }
    }
}

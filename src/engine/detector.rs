//! Loop-closure detector implementation.

use serde::{Deserialize, Serialize};

use crate::core::types::PointCloud3D;
use crate::descriptor::ScanContext;
use crate::descriptor::distance::context_distance;
use crate::error::{Error, Result};
use crate::index::RingKeyIndex;

use super::config::LoopDetectorConfig;

/// One stored scan: descriptor plus optional capture time.
///
/// The descriptor carries both derived keys; records are append-only and
/// identified by their position in the history (the node index).
struct DescriptorRecord<const R: usize, const S: usize> {
    context: ScanContext<R, S>,
    timestamp_s: Option<f64>,
}

/// A re-scored loop-closure candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandidateMatch {
    /// Node index of the candidate record.
    pub node: usize,
    /// Descriptor distance to the query (0 = identical up to rotation).
    pub distance: f32,
    /// Estimated yaw of the query relative to the candidate, in degrees.
    pub yaw_deg: f32,
}

/// Result of a loop-closure query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Node index of the query (always the most recent record).
    pub query: usize,

    /// Node index of the accepted match, or `None` when no candidate
    /// scored below the distance threshold.
    pub matched: Option<usize>,

    /// Descriptor distance of the best candidate (1.0 when no candidate
    /// was available).
    pub distance: f32,

    /// Estimated relative yaw of the best candidate, in degrees.
    pub yaw_deg: f32,

    /// All retrieved candidates with their scores, best first. Hosts with
    /// their own acceptance logic can re-threshold these.
    pub candidates: Vec<CandidateMatch>,
}

impl DetectionResult {
    /// Whether a loop closure was accepted.
    pub fn is_loop(&self) -> bool {
        self.matched.is_some()
    }

    fn no_loop(query: usize) -> Self {
        Self {
            query,
            matched: None,
            distance: 1.0,
            yaw_deg: 0.0,
            candidates: Vec::new(),
        }
    }
}

/// Place-recognition loop-closure detector over a stream of LiDAR scans.
///
/// Every ingested scan is summarized as a [`ScanContext`] descriptor and
/// appended to an in-memory history. [`detect`](Self::detect) then asks
/// whether the most recent scan revisits a previously seen place: a k-d
/// tree over rotation-invariant ring keys shortlists candidates, each
/// shortlisted descriptor is re-scored with the rotation-searched cosine
/// distance, and the best one is accepted if it clears the configured
/// threshold.
///
/// `R` and `S` are the descriptor's ring and sector counts; 20 x 60 is the
/// standard shape. The detector is single-threaded and owns all of its
/// state; independent instances share nothing.
pub struct LoopDetector<const R: usize = 20, const S: usize = 60> {
    /// Configuration.
    config: LoopDetectorConfig,

    /// Append-only descriptor history, indexed by node index.
    records: Vec<DescriptorRecord<R, S>>,

    /// Ring-key index over the search view, rebuilt periodically.
    index: RingKeyIndex<R>,

    /// Scans ingested since the last index rebuild.
    scans_since_rebuild: usize,
}

impl<const R: usize, const S: usize> LoopDetector<R, S> {
    /// Create a new detector.
    pub fn new(config: LoopDetectorConfig) -> Self {
        Self {
            config,
            records: Vec::new(),
            index: RingKeyIndex::new(),
            scans_since_rebuild: 0,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LoopDetectorConfig {
        &self.config
    }

    /// Number of ingested scans.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no scan has been ingested yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clear all stored descriptors and reset the index.
    pub fn clear(&mut self) {
        self.records.clear();
        self.index = RingKeyIndex::new();
        self.scans_since_rebuild = 0;
    }

    /// Ingest a scan: build its descriptor and append it to the history.
    ///
    /// Returns the node index assigned to the scan.
    pub fn add_scan(&mut self, cloud: &PointCloud3D) -> usize {
        self.insert(cloud, None)
    }

    /// [`add_scan`](Self::add_scan) with a capture timestamp (seconds).
    pub fn add_scan_at(&mut self, cloud: &PointCloud3D, timestamp_s: f64) -> usize {
        self.insert(cloud, Some(timestamp_s))
    }

    fn insert(&mut self, cloud: &PointCloud3D, timestamp_s: Option<f64>) -> usize {
        let context =
            ScanContext::from_cloud(cloud, self.config.max_radius, self.config.sensor_height);
        let node = self.records.len();
        self.records.push(DescriptorRecord {
            context,
            timestamp_s,
        });
        self.scans_since_rebuild += 1;
        node
    }

    /// Query the history for a revisit of the most recent scan's place.
    ///
    /// Returns `None` only when no scan has been ingested (there is no
    /// query record). Otherwise the result always carries the query node
    /// and best-candidate score; `matched` is set only when that score
    /// clears the distance threshold. Queries against too short a history
    /// report "no loop" rather than an error.
    pub fn detect(&mut self) -> Option<DetectionResult> {
        let query_node = self.records.len().checked_sub(1)?;

        // Everything in reach of the query would fall inside the recency
        // exclusion; nothing is eligible yet.
        if self.records.len() < self.config.num_exclude_recent + 1 {
            return Some(DetectionResult::no_loop(query_node));
        }

        if self.scans_since_rebuild >= self.config.tree_rebuild_period {
            self.rebuild_index();
        }

        let query = &self.records[query_node].context;
        let neighbors = self
            .index
            .nearest(query.ring_key(), self.config.num_candidates);
        if neighbors.is_empty() {
            return Some(DetectionResult::no_loop(query_node));
        }

        let sector_deg = 360.0 / S as f32;
        let mut candidates = Vec::with_capacity(neighbors.len());

        for neighbor in &neighbors {
            let candidate = &self.records[neighbor.node].context;
            let (distance, shift) = context_distance(query, candidate, self.config.search_ratio);
            let scored = CandidateMatch {
                node: neighbor.node,
                distance,
                yaw_deg: shift as f32 * sector_deg,
            };
            log::trace!(
                "candidate node {}: distance {:.4}, yaw {:.1} deg (ring-key distance {:.4})",
                scored.node,
                scored.distance,
                scored.yaw_deg,
                neighbor.distance
            );
            candidates.push(scored);
        }
        // Stable sort keeps the nearest-ring-key candidate first among ties.
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let best = candidates[0];
        let matched = if best.distance < self.config.distance_threshold {
            log::info!(
                "loop closure: node {} revisits node {} (distance {:.3}, yaw {:.1} deg)",
                query_node,
                best.node,
                best.distance,
                best.yaw_deg
            );
            Some(best.node)
        } else {
            None
        };

        Some(DetectionResult {
            query: query_node,
            matched,
            distance: best.distance,
            yaw_deg: best.yaw_deg,
            candidates,
        })
    }

    /// Rebuild the ring-key index over the current search view.
    ///
    /// The view is the history minus the `num_exclude_recent` newest
    /// records; the caller has already checked that it is non-empty.
    fn rebuild_index(&mut self) {
        let eligible = self.records.len() - self.config.num_exclude_recent;
        self.index
            .rebuild(self.records[..eligible].iter().map(|r| r.context.ring_key()));
        self.scans_since_rebuild = 0;
        log::debug!(
            "rebuilt ring-key index: {} of {} records searchable",
            eligible,
            self.records.len()
        );
    }

    /// Stored descriptor for a node index.
    pub fn context(&self, node: usize) -> Result<&ScanContext<R, S>> {
        self.record(node).map(|r| &r.context)
    }

    /// Capture timestamp recorded for a node index, if one was provided.
    pub fn timestamp(&self, node: usize) -> Result<Option<f64>> {
        self.record(node).map(|r| r.timestamp_s)
    }

    fn record(&self, node: usize) -> Result<&DescriptorRecord<R, S>> {
        self.records.get(node).ok_or(Error::IndexOutOfRange {
            index: node,
            len: self.records.len(),
        })
    }
}

impl<const R: usize, const S: usize> Default for LoopDetector<R, S> {
    fn default() -> Self {
        Self::new(LoopDetectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_point_cloud() -> PointCloud3D {
        let mut cloud = PointCloud3D::new();
        cloud.push_xyz(10.0, 0.0, 1.0);
        cloud
    }

    fn small_config() -> LoopDetectorConfig {
        LoopDetectorConfig {
            num_exclude_recent: 2,
            tree_rebuild_period: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_detect_on_empty_history() {
        let mut detector = LoopDetector::<20, 60>::default();
        assert!(detector.detect().is_none());
        assert!(detector.is_empty());
    }

    #[test]
    fn test_add_scan_assigns_sequential_nodes() {
        let mut detector = LoopDetector::<20, 60>::default();
        let cloud = single_point_cloud();

        assert_eq!(detector.add_scan(&cloud), 0);
        assert_eq!(detector.add_scan(&cloud), 1);
        assert_eq!(detector.add_scan_at(&cloud, 12.5), 2);
        assert_eq!(detector.len(), 3);
    }

    #[test]
    fn test_detect_with_short_history_reports_no_loop() {
        let mut detector = LoopDetector::<20, 60>::default();
        let cloud = single_point_cloud();
        for _ in 0..10 {
            detector.add_scan(&cloud);
        }

        let result = detector.detect().unwrap();
        assert_eq!(result.query, 9);
        assert!(result.matched.is_none());
        assert!(!result.is_loop());
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_detect_matches_identical_scan_outside_exclusion() {
        let mut detector = LoopDetector::<20, 60>::new(small_config());
        let cloud = single_point_cloud();
        for _ in 0..4 {
            detector.add_scan(&cloud);
        }

        // History 4, exclusion 2: nodes 0 and 1 are searchable.
        let result = detector.detect().unwrap();
        assert_eq!(result.query, 3);
        assert!(result.is_loop());
        assert!(result.matched.unwrap() <= 1);
        assert_relative_eq!(result.distance, 0.0, epsilon = 1e-6);
        assert_relative_eq!(result.yaw_deg, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_detect_before_first_rebuild_has_no_candidates() {
        let config = LoopDetectorConfig {
            num_exclude_recent: 1,
            tree_rebuild_period: 100,
            ..Default::default()
        };
        let mut detector = LoopDetector::<20, 60>::new(config);
        let cloud = single_point_cloud();
        for _ in 0..5 {
            detector.add_scan(&cloud);
        }

        // Counter (5) has not reached the period (100), so the index has
        // never been built.
        let result = detector.detect().unwrap();
        assert!(result.matched.is_none());
        assert!(result.candidates.is_empty());
        assert_relative_eq!(result.distance, 1.0);
    }

    #[test]
    fn test_context_access_and_out_of_range() {
        let mut detector = LoopDetector::<20, 60>::default();
        detector.add_scan(&single_point_cloud());

        let context = detector.context(0).unwrap();
        assert_eq!(context.rings(), 20);
        assert_eq!(context.sectors(), 60);

        assert_eq!(
            detector.context(5),
            Err(Error::IndexOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_timestamp_access() {
        let mut detector = LoopDetector::<20, 60>::default();
        detector.add_scan(&single_point_cloud());
        detector.add_scan_at(&single_point_cloud(), 42.0);

        assert_eq!(detector.timestamp(0).unwrap(), None);
        assert_eq!(detector.timestamp(1).unwrap(), Some(42.0));
        assert!(detector.timestamp(2).is_err());
    }

    #[test]
    fn test_clear_resets_state() {
        let mut detector = LoopDetector::<20, 60>::new(small_config());
        let cloud = single_point_cloud();
        for _ in 0..4 {
            detector.add_scan(&cloud);
        }
        assert!(detector.detect().unwrap().is_loop());

        detector.clear();
        assert!(detector.is_empty());
        assert!(detector.detect().is_none());

        // After re-ingesting, behaves like a fresh detector.
        for _ in 0..4 {
            detector.add_scan(&cloud);
        }
        assert!(detector.detect().unwrap().is_loop());
    }

    #[test]
    fn test_candidates_sorted_best_first() {
        let mut detector = LoopDetector::<20, 60>::new(LoopDetectorConfig {
            num_exclude_recent: 1,
            tree_rebuild_period: 1,
            ..Default::default()
        });

        // Distinct scans so candidate scores differ.
        for i in 0..6 {
            let mut cloud = PointCloud3D::new();
            let az = (i as f32 * 25.0 + 3.0).to_radians();
            cloud.push_xyz(10.0 * az.cos(), 10.0 * az.sin(), 1.0);
            cloud.push_xyz(30.0 * az.cos(), 30.0 * az.sin(), 0.5 + i as f32);
            detector.add_scan(&cloud);
        }

        let result = detector.detect().unwrap();
        for pair in result.candidates.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        assert_eq!(result.candidates[0].distance, result.distance);
    }
}

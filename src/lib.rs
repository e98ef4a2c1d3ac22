//! Place recognition for 3D LiDAR point clouds.
//!
//! Given a stream of scans from a moving sensor, this crate answers the
//! loop-closure question: does the latest scan revisit a place observed
//! earlier, and if so, which past scan and at what relative yaw?
//!
//! # Pipeline
//!
//! ```text
//! point cloud
//!     │
//!     ▼
//! ScanContext          R x S polar grid of per-bin max height
//!     │
//!     ├── ring key     per-ring mean, yaw-invariant → k-d tree retrieval
//!     └── sector key   per-sector mean → coarse yaw alignment
//!     │
//!     ▼
//! LoopDetector         candidate shortlist + rotation-searched cosine
//!                      distance + threshold
//! ```
//!
//! Matching is rotation-invariant: a yaw rotation of the sensor only
//! permutes descriptor columns, the ring key does not change at all, and
//! the scoring searches over column shifts — which is also how the
//! relative yaw estimate falls out of a match.
//!
//! The detector is synchronous and single-threaded; it owns its descriptor
//! history outright and performs no background work. Preprocessing
//! (downsampling, motion compensation) and geometric verification of
//! reported closures are the caller's business.
//!
//! # Example
//!
//! ```
//! use polar_context::{LoopDetector, LoopDetectorConfig, PointCloud3D};
//!
//! let mut detector = LoopDetector::<20, 60>::new(LoopDetectorConfig::default());
//!
//! let mut cloud = PointCloud3D::new();
//! cloud.push_xyz(10.0, 0.0, 1.0);
//!
//! let node = detector.add_scan(&cloud);
//! assert_eq!(node, 0);
//!
//! let result = detector.detect().expect("one scan has been ingested");
//! assert!(!result.is_loop()); // far too little history to match against
//! ```
//!
//! Based on Kim & Kim, "Scan Context: Egocentric Spatial Descriptor for
//! Place Recognition within 3D Point Cloud Map", IROS 2018.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Descriptors (depends on core)
// ============================================================================
pub mod descriptor;

// ============================================================================
// Layer 3: Ring-key index (no internal deps beyond key arrays)
// ============================================================================
pub mod index;

// ============================================================================
// Layer 4: Detection engine (depends on all layers)
// ============================================================================
pub mod engine;

pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use crate::core::types::{Point3D, PointCloud3D};
pub use crate::descriptor::ScanContext;
pub use crate::engine::{CandidateMatch, DetectionResult, LoopDetector, LoopDetectorConfig};
pub use crate::error::{Error, Result};
pub use crate::index::RingKeyIndex;

//! Nearest-neighbor index over ring keys.
//!
//! Candidate retrieval searches the ring keys of past scans with an exact
//! L2 k-d tree. The index holds a snapshot of the eligible prefix of the
//! descriptor history (the "search view") and is rebuilt periodically by
//! the detector rather than on every insert; between rebuilds it lags the
//! history, which is fine because the records it is missing sit inside the
//! detector's recency-exclusion window anyway and candidates are re-scored
//! with the full descriptor distance.

use kiddo::{KdTree, SquaredEuclidean};

/// A ring-key neighbor returned from the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Node index of the matching record in the descriptor history.
    pub node: usize,
    /// Euclidean (L2) distance between the ring keys.
    pub distance: f32,
}

/// Snapshot k-d tree over the search view of ring keys.
///
/// Tree items are node indices: the search view is always a prefix of the
/// append-only history, so position in the view and node index coincide.
pub struct RingKeyIndex<const R: usize> {
    tree: KdTree<f32, R>,
    len: usize,
}

impl<const R: usize> RingKeyIndex<R> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            tree: KdTree::new(),
            len: 0,
        }
    }

    /// Replace the snapshot with the given prefix of ring keys.
    pub fn rebuild<'a>(&mut self, keys: impl IntoIterator<Item = &'a [f32; R]>) {
        let mut tree = KdTree::new();
        let mut len = 0usize;
        for (node, key) in keys.into_iter().enumerate() {
            tree.add(key, node as u64);
            len += 1;
        }
        self.tree = tree;
        self.len = len;
    }

    /// Number of ring keys in the current snapshot.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Up to `count` nearest ring keys to `query`, closest first.
    ///
    /// Returns an empty vector when the snapshot is empty.
    pub fn nearest(&self, query: &[f32; R], count: usize) -> Vec<Neighbor> {
        if self.len == 0 || count == 0 {
            return Vec::new();
        }

        self.tree
            .nearest_n::<SquaredEuclidean>(query, count)
            .into_iter()
            .map(|n| Neighbor {
                node: n.item as usize,
                distance: n.distance.sqrt(),
            })
            .collect()
    }
}

impl<const R: usize> Default for RingKeyIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}

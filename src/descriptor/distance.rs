//! Rotation-invariant similarity between scan contexts.
//!
//! Matching proceeds in two stages:
//!
//! 1. A coarse yaw estimate from the 1-D sector keys ([`align_sector_keys`]),
//!    which is cheap because it ignores the ring dimension entirely.
//! 2. A fine search over a small window of column shifts around that
//!    estimate, scoring each with a column-wise cosine distance
//!    ([`context_distance`]).
//!
//! Distances are in `[0, 1]`; 0 means identical up to rotation, 1 means no
//! comparable structure.

use super::context::ScanContext;

/// Column shift of `candidate` that best matches `query`, by L1 distance
/// between sector keys.
///
/// Returns the shift `k` minimizing `Σ |query[j] - candidate[(j - k) mod S]|`,
/// i.e. the rotation to apply to the candidate so its sectors line up with
/// the query's. Ties resolve to the smallest shift.
pub fn align_sector_keys<const S: usize>(query: &[f32; S], candidate: &[f32; S]) -> usize {
    let mut best_shift = 0;
    let mut best_cost = f32::INFINITY;

    for shift in 0..S {
        let mut cost = 0.0f32;
        for j in 0..S {
            cost += (query[j] - candidate[(j + S - shift) % S]).abs();
        }
        if cost < best_cost {
            best_cost = cost;
            best_shift = shift;
        }
    }

    best_shift
}

/// Column-wise cosine distance between two descriptors, without shifting.
///
/// Averages `1 - cos(column_a, column_b)` over sector pairs where both
/// columns have a non-zero norm. If no sector pair qualifies (e.g. one
/// descriptor is all-zero), the distance is 1.0: maximally dissimilar.
pub fn direct_distance<const R: usize, const S: usize>(
    a: &ScanContext<R, S>,
    b: &ScanContext<R, S>,
) -> f32 {
    direct_distance_with_shift(a, b, 0)
}

/// [`direct_distance`] with `b`'s columns cyclically shifted by `shift`,
/// evaluated without materializing the shifted descriptor.
pub fn direct_distance_with_shift<const R: usize, const S: usize>(
    a: &ScanContext<R, S>,
    b: &ScanContext<R, S>,
    shift: usize,
) -> f32 {
    let shift = shift % S;
    let mut sum = 0.0f32;
    let mut compared = 0usize;

    for sector in 0..S {
        let col_a = a.sector_column(sector);
        let col_b = b.sector_column((sector + S - shift) % S);

        let mut dot = 0.0f32;
        let mut norm_a = 0.0f32;
        let mut norm_b = 0.0f32;
        for ring in 0..R {
            dot += col_a[ring] * col_b[ring];
            norm_a += col_a[ring] * col_a[ring];
            norm_b += col_b[ring] * col_b[ring];
        }

        if norm_a <= 0.0 || norm_b <= 0.0 {
            continue;
        }

        // Guard against cos > 1 from rounding; cells are non-negative so
        // the cosine cannot go below 0.
        let cos = (dot / (norm_a.sqrt() * norm_b.sqrt())).min(1.0);
        sum += 1.0 - cos;
        compared += 1;
    }

    if compared == 0 {
        return 1.0;
    }
    sum / compared as f32
}

/// Full rotation-invariant distance between two descriptors.
///
/// Seeds the search with the coarse sector-key alignment, then scores every
/// shift within `±⌊S * search_ratio / 2⌋` columns of it.
///
/// # Returns
///
/// Tuple of (minimum distance, best column shift). The shift converts to a
/// relative yaw of `shift * (360 / S)` degrees.
pub fn context_distance<const R: usize, const S: usize>(
    query: &ScanContext<R, S>,
    candidate: &ScanContext<R, S>,
    search_ratio: f32,
) -> (f32, usize) {
    let coarse = align_sector_keys(query.sector_key(), candidate.sector_key());
    let half_window = (S as f32 * search_ratio / 2.0) as isize;

    let mut best_distance = f32::INFINITY;
    let mut best_shift = coarse;
    for offset in -half_window..=half_window {
        let shift = (coarse as isize + offset).rem_euclid(S as isize) as usize;
        let distance = direct_distance_with_shift(query, candidate, shift);
        if distance < best_distance {
            best_distance = distance;
            best_shift = shift;
        }
    }

    (best_distance, best_shift)
}

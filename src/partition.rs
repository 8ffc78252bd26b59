// Allow casts for size calculations - row counts comfortably fit in f64
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

//! Proportional partitioning of an ordered row sequence.
//!
//! Rows are assigned to `k` buckets by cutting the sequence at cumulative
//! boundaries. Boundaries are rounded from cumulative proportions rather than
//! per-bucket sizes, so the bucket sizes always add up to the row count.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Cumulative row-count boundaries for `n` rows split by `ratios`.
///
/// Entry `i` is the exclusive end of bucket `i`. Boundaries are
/// `round(c_i * n)` over cumulative proportions `c_i`, rounding half to even,
/// clamped to be non-decreasing and at most `n`. The last boundary is always
/// exactly `n`.
///
/// Returns an empty vector when `ratios` is empty.
pub fn split_boundaries(n: usize, ratios: &[f64]) -> Vec<usize> {
    let mut boundaries = Vec::with_capacity(ratios.len());
    let mut cumulative = 0.0;
    let mut previous = 0usize;

    for ratio in ratios {
        cumulative += ratio;
        let raw = (cumulative * n as f64).round_ties_even();
        let bound = if raw <= 0.0 { 0 } else { (raw as usize).min(n) };
        let bound = bound.max(previous);
        boundaries.push(bound);
        previous = bound;
    }

    if let Some(last) = boundaries.last_mut() {
        *last = n;
    }
    boundaries
}

/// Slices an ordered list of row positions into one bucket per ratio.
pub fn partition_positions(positions: &[usize], ratios: &[f64]) -> Vec<Vec<usize>> {
    let mut start = 0;
    split_boundaries(positions.len(), ratios)
        .into_iter()
        .map(|end| {
            let bucket = positions[start..end].to_vec();
            start = end;
            bucket
        })
        .collect()
}

/// Row positions `0..n` in the order rows are handed out to buckets.
///
/// With a seed the order is a reproducible permutation; without one it is the
/// identity, which keeps an existing (for example chronological) order.
pub fn row_order(n: usize, shuffle: Option<u64>) -> Vec<usize> {
    let mut positions: Vec<usize> = (0..n).collect();
    if let Some(seed) = shuffle {
        let mut rng = StdRng::seed_from_u64(seed);
        positions.shuffle(&mut rng);
    }
    positions
}

/// Partitions rows `0..n` into one bucket per ratio.
///
/// Each bucket lists row positions in hand-out order.
pub fn partition_rows(n: usize, ratios: &[f64], shuffle: Option<u64>) -> Vec<Vec<usize>> {
    partition_positions(&row_order(n, shuffle), ratios)
}

/// Split index of every row `0..n`.
///
/// Entry `j` of the result is the bucket that row `j` belongs to.
pub fn assign_split_indices(n: usize, ratios: &[f64], shuffle: Option<u64>) -> Vec<usize> {
    let mut assignment = vec![0; n];
    for (split, rows) in partition_rows(n, ratios, shuffle).into_iter().enumerate() {
        for row in rows {
            assignment[row] = split;
        }
    }
    assignment
}

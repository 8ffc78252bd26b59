//! Property-based tests for the splitters.
//!
//! Uses proptest to check that row conservation, disjointness, boundary
//! fidelity and determinism hold across random datasets and ratio lists.

#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::{collections::HashSet, sync::Arc};

use arrow::{
    array::{Int64Array, RecordBatch},
    datatypes::{DataType, Field, Schema},
};
use proptest::prelude::*;
use recsplit::{
    assign_split_indices, chrono_split, random_split, split_boundaries, stratified_split,
    ArrowDataset, Dataset, SplitConfig,
};

/// One row per entry of `users`; `rowid` is the row number and `timestamp`
/// is taken from `times`.
fn dataset(users: &[i64], times: &[i64]) -> ArrowDataset {
    let schema = Arc::new(Schema::new(vec![
        Field::new("userID", DataType::Int64, false),
        Field::new("itemID", DataType::Int64, false),
        Field::new("timestamp", DataType::Int64, false),
        Field::new("rowid", DataType::Int64, false),
    ]));
    let n = users.len() as i64;
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(users.to_vec())),
            Arc::new(Int64Array::from(users.iter().map(|u| u * 7 % 5).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(times.to_vec())),
            Arc::new(Int64Array::from((0..n).collect::<Vec<_>>())),
        ],
    )
    .unwrap_or_else(|e| panic!("batch: {e}"));
    ArrowDataset::from_batch(batch).unwrap_or_else(|e| panic!("dataset: {e}"))
}

fn column(split: &ArrowDataset, name: &str) -> Vec<i64> {
    let idx = split
        .column_index(name)
        .unwrap_or_else(|e| panic!("column: {e}"));
    split
        .iter()
        .flat_map(|batch| {
            batch
                .column(idx)
                .as_any()
                .downcast_ref::<Int64Array>()
                .map(|a| a.values().to_vec())
                .unwrap_or_default()
        })
        .collect()
}

fn ratio_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.05f64..5.0, 2..6)
}

fn rows_strategy() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    (0usize..120).prop_flat_map(|n| {
        (
            prop::collection::vec(0i64..8, n),
            prop::collection::vec(0i64..50, n),
        )
    })
}

/// Every row id appears in exactly one split; returns the ids seen.
fn assert_disjoint(splits: &[ArrowDataset]) -> Result<HashSet<i64>, TestCaseError> {
    let mut seen = HashSet::new();
    for split in splits {
        for id in column(split, "rowid") {
            prop_assert!(seen.insert(id), "row {} appears twice", id);
        }
    }
    Ok(seen)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: boundaries are non-decreasing, end at n, and each is within
    /// one row of the unclamped cumulative target.
    #[test]
    fn prop_boundaries_track_cumulative_ratios(n in 0usize..500, raw in ratio_strategy()) {
        let total: f64 = raw.iter().sum();
        let ratios: Vec<f64> = raw.iter().map(|r| r / total).collect();
        let bounds = split_boundaries(n, &ratios);

        prop_assert_eq!(bounds.len(), ratios.len());
        prop_assert_eq!(bounds.last().copied(), Some(n));
        prop_assert!(bounds.windows(2).all(|w| w[0] <= w[1]));

        let mut cumulative = 0.0;
        for (bound, ratio) in bounds.iter().zip(&ratios) {
            cumulative += ratio;
            let target = cumulative * n as f64;
            prop_assert!((*bound as f64 - target).abs() <= 1.0 + 1e-9);
        }
    }

    /// Property: every row gets one index below k and index counts match
    /// boundary differences.
    #[test]
    fn prop_assignment_matches_boundaries(n in 0usize..300, raw in ratio_strategy(), seed in any::<u64>()) {
        let total: f64 = raw.iter().sum();
        let ratios: Vec<f64> = raw.iter().map(|r| r / total).collect();
        let assignment = assign_split_indices(n, &ratios, Some(seed));
        let bounds = split_boundaries(n, &ratios);

        prop_assert_eq!(assignment.len(), n);
        let mut start = 0;
        for (split, end) in bounds.into_iter().enumerate() {
            let count = assignment.iter().filter(|&&s| s == split).count();
            prop_assert_eq!(count, end - start);
            start = end;
        }
    }

    /// Property: multi-way random split conserves rows and is disjoint.
    #[test]
    fn prop_random_split_conserves_rows((users, times) in rows_strategy(), raw in ratio_strategy(), seed in any::<u64>()) {
        let data = dataset(&users, &times);
        let splits = random_split(&data, raw.clone(), seed).unwrap_or_else(|e| panic!("{e}"));

        prop_assert_eq!(splits.len(), raw.len());
        let seen = assert_disjoint(&splits)?;
        prop_assert_eq!(seen.len(), users.len());
    }

    /// Property: stratified splits conserve rows, and each user's share of
    /// every split follows the boundary rule for that user's row count.
    #[test]
    fn prop_stratified_split_per_user_sizes((users, times) in rows_strategy(), raw in ratio_strategy(), seed in any::<u64>()) {
        let data = dataset(&users, &times);
        let config = SplitConfig::new().with_ratio(raw.clone()).with_seed(seed);
        let splits = stratified_split(&data, &config).unwrap_or_else(|e| panic!("{e}"));

        let seen = assert_disjoint(&splits)?;
        prop_assert_eq!(seen.len(), users.len());

        let total: f64 = raw.iter().sum();
        let ratios: Vec<f64> = raw.iter().map(|r| r / total).collect();
        for user in 0..8 {
            let n = users.iter().filter(|&&u| u == user).count();
            let bounds = split_boundaries(n, &ratios);
            let mut start = 0;
            for (split, end) in splits.iter().zip(bounds) {
                let count = column(split, "userID").iter().filter(|&&u| u == user).count();
                prop_assert_eq!(count, end - start);
                start = end;
            }
        }
    }

    /// Property: same input and seed give identical splits.
    #[test]
    fn prop_stratified_split_is_deterministic((users, times) in rows_strategy(), seed in any::<u64>()) {
        let data = dataset(&users, &times);
        let config = SplitConfig::new().with_ratio([0.6, 0.2, 0.2]).with_seed(seed);
        let a = stratified_split(&data, &config).unwrap_or_else(|e| panic!("{e}"));
        let b = stratified_split(&data, &config).unwrap_or_else(|e| panic!("{e}"));
        for (x, y) in a.iter().zip(&b) {
            prop_assert_eq!(column(x, "rowid"), column(y, "rowid"));
        }
    }

    /// Property: after the activity filter, only users with enough rows are
    /// left, and all of their rows are left.
    #[test]
    fn prop_min_rating_filter_exact((users, times) in rows_strategy(), min_rating in 1i64..6) {
        let data = dataset(&users, &times);
        let config = SplitConfig::new().with_ratio(0.5).with_min_rating(min_rating);
        let splits = chrono_split(&data, &config).unwrap_or_else(|e| panic!("{e}"));

        let expected: HashSet<i64> = (0..users.len() as i64)
            .filter(|&row| {
                let user = users[row as usize];
                users.iter().filter(|&&u| u == user).count() as i64 >= min_rating
            })
            .collect();
        let seen = assert_disjoint(&splits)?;
        prop_assert_eq!(seen, expected);
    }

    /// Property: in a chronological split, every training row of a user is
    /// no later than any of that user's test rows.
    #[test]
    fn prop_chrono_split_never_leaks_future((users, times) in rows_strategy(), raw in ratio_strategy()) {
        let data = dataset(&users, &times);
        let config = SplitConfig::new().with_ratio(raw);
        let splits = chrono_split(&data, &config).unwrap_or_else(|e| panic!("{e}"));

        for user in 0..8 {
            let mut latest_before: Option<i64> = None;
            for split in &splits {
                let times_here: Vec<i64> = column(split, "userID")
                    .into_iter()
                    .zip(column(split, "timestamp"))
                    .filter(|(u, _)| *u == user)
                    .map(|(_, t)| t)
                    .collect();
                prop_assert!(times_here.windows(2).all(|w| w[0] <= w[1]));
                if let (Some(prev), Some(first)) = (latest_before, times_here.first()) {
                    prop_assert!(prev <= *first);
                }
                if let Some(last) = times_here.last() {
                    latest_before = Some(*last);
                }
            }
        }
    }
}

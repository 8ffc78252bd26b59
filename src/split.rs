// Allow casts for size calculations - these are intentional and safe for
// dataset sizes
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

//! Dataset splitting entry points.
//!
//! Three policies are offered:
//!
//! - [`random_split`]: rows of the whole dataset are shuffled and cut by
//!   ratio, with no regard for users or items.
//! - [`stratified_split`]: every user (or item) is split on its own after a
//!   seeded shuffle, so each keeps roughly the requested share in every set.
//! - [`chrono_split`]: like the stratified split, but each user's (or item's)
//!   interactions are ordered by time, so earlier interactions go to the
//!   earlier sets.
//!
//! # Example
//!
//! ```ignore
//! use recsplit::{chrono_split, random_split, SplitConfig};
//!
//! // 75/25 random split
//! let [train, test] = random_split(&ratings, 0.75, 42)?.try_into().unwrap();
//!
//! // Three-way chronological split of users with at least 5 ratings
//! let config = SplitConfig::new().with_ratio([0.8, 0.1, 0.1]).with_min_rating(5);
//! let splits = chrono_split(&ratings, &config)?;
//! ```

use crate::{
    config::SplitConfig,
    dataset::{take_rows, ArrowDataset, Dataset},
    error::{Error, Result},
    partition::{partition_rows, row_order},
    ratio::{RatioSpec, SplitRatio},
    stratify::{stratify, SplitMode},
};

/// Randomly splits the whole dataset.
///
/// A single fraction gives a conventional two-way train/test split (see
/// [`train_test_split`]). A list of proportions gives one output per entry,
/// cut from one seeded shuffle of all rows; lists that do not sum to one are
/// normalized.
///
/// # Errors
///
/// Returns [`Error::InvalidRatio`] for an unusable ratio, and
/// [`Error::InvalidConfig`] if a two-way split would leave a side empty.
pub fn random_split(
    dataset: &ArrowDataset,
    ratio: impl Into<SplitRatio>,
    seed: u64,
) -> Result<Vec<ArrowDataset>> {
    let spec = RatioSpec::parse(&ratio.into())?;

    if !spec.is_multi() {
        return train_test_split(dataset, spec.train_fraction(), seed);
    }

    let batch = dataset.to_batch()?;
    let outputs = partition_rows(batch.num_rows(), spec.ratios(), Some(seed))
        .iter()
        .map(|positions| ArrowDataset::from_batch(take_rows(&batch, positions)?))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        sizes = ?outputs.iter().map(Dataset::len).collect::<Vec<_>>(),
        seed,
        "random split complete"
    );

    Ok(outputs)
}

/// Two-way random split with shuffle-split sizing.
///
/// The training set gets `floor(train_size * n)` rows and the test set the
/// remaining `n - floor(train_size * n)`. Rows are drawn from one seeded
/// permutation: the first test-size rows form the test set, the following
/// ones the training set. Returns `[train, test]`.
///
/// # Errors
///
/// Returns [`Error::InvalidRatio`] if `train_size` is not in `(0, 1)`, and
/// [`Error::InvalidConfig`] if either set would be empty.
pub fn train_test_split(
    dataset: &ArrowDataset,
    train_size: f64,
    seed: u64,
) -> Result<Vec<ArrowDataset>> {
    if !train_size.is_finite() || train_size <= 0.0 || train_size >= 1.0 {
        return Err(Error::invalid_ratio(format!(
            "train_size must be between 0 and 1 (exclusive), got {train_size}"
        )));
    }

    let n = dataset.len();
    let n_train = (train_size * n as f64).floor() as usize;
    let n_test = n - n_train;
    if n_train == 0 || n_test == 0 {
        return Err(Error::invalid_config(format!(
            "with {n} rows and train_size={train_size}, the {} set would be empty",
            if n_train == 0 { "train" } else { "test" }
        )));
    }

    let batch = dataset.to_batch()?;
    let permutation = row_order(n, Some(seed));
    let (test_rows, train_rows) = permutation.split_at(n_test);

    let train = ArrowDataset::from_batch(take_rows(&batch, train_rows)?)?;
    let test = ArrowDataset::from_batch(take_rows(&batch, test_rows)?)?;

    tracing::info!(
        train = train.len(),
        test = test.len(),
        seed,
        "train/test split complete"
    );

    Ok(vec![train, test])
}

/// Stratified random split: every user (or item) is shuffled and split on
/// its own.
///
/// The same seed is used for every group.
///
/// # Errors
///
/// See [`stratify`].
pub fn stratified_split(dataset: &ArrowDataset, config: &SplitConfig) -> Result<Vec<ArrowDataset>> {
    stratify(dataset, config, SplitMode::Random)
}

/// Chronological split: every user's (or item's) interactions are ordered
/// by timestamp and cut by ratio, earliest first.
///
/// Rows with equal timestamps keep their input order. `config.seed` is not
/// used.
///
/// # Errors
///
/// See [`stratify`]. The timestamp column named in `config.columns` must
/// exist.
pub fn chrono_split(dataset: &ArrowDataset, config: &SplitConfig) -> Result<Vec<ArrowDataset>> {
    stratify(dataset, config, SplitMode::Chronological)
}

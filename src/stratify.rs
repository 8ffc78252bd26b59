//! Per-user / per-item stratified splitting.
//!
//! Every group (all interactions of one user, or of one item) is split on its
//! own with the same proportions, then the per-group pieces are gathered by
//! split index. Each user therefore shows up in every output set in roughly
//! the requested proportions, instead of landing wholly in train or test.

use arrow::array::RecordBatch;

use crate::{
    config::{check_min_rating, SplitConfig},
    dataset::{take_rows, ArrowDataset, Dataset},
    error::{Error, Result},
    filter::MinRatingFilter,
    group::{group_positions, key_values},
    partition::partition_rows,
    ratio::RatioSpec,
    transform::{Sort, Transform},
};

/// How rows are ordered inside a group before it is cut into splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Seeded shuffle within each group.
    Random,
    /// Ascending timestamp order within each group; earliest rows go to the
    /// first split.
    Chronological,
}

impl SplitMode {
    fn shuffle_seed(self, seed: u64) -> Option<u64> {
        match self {
            Self::Random => Some(seed),
            Self::Chronological => None,
        }
    }
}

/// Splits `dataset` group by group according to `config`.
///
/// Validation runs before any data is touched: the activity threshold, then
/// the user, item and (for chronological mode) timestamp columns, then the
/// ratio. Groups below `config.min_rating` rows are dropped. In random mode
/// every group is shuffled with the same `config.seed`.
///
/// Returns one dataset per ratio entry. Output `i` holds, for every group in
/// ascending key order, the rows that group assigned to split `i`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`], [`Error::ColumnNotFound`] or
/// [`Error::InvalidRatio`] on invalid input, and [`Error::Data`] if a key or
/// timestamp column holds nulls or an unsupported type.
pub fn stratify(
    dataset: &ArrowDataset,
    config: &SplitConfig,
    mode: SplitMode,
) -> Result<Vec<ArrowDataset>> {
    check_min_rating(config.min_rating)?;

    let columns = &config.columns;
    let schema = dataset.schema();
    let mut required = vec![columns.col_user.as_str(), columns.col_item.as_str()];
    if mode == SplitMode::Chronological {
        required.push(columns.col_timestamp.as_str());
    }
    for name in required {
        if schema.index_of(name).is_err() {
            return Err(Error::column_not_found(name));
        }
    }

    let spec = RatioSpec::parse(&config.ratio)?;
    let batch = preprocess(dataset.to_batch()?, config, mode)?;

    let group_column = config.group_column();
    let keys = key_values(&batch, group_column)?;
    let order: Vec<usize> = (0..batch.num_rows()).collect();
    let groups = group_positions(&keys, &order);

    let mut splits: Vec<Vec<usize>> = vec![Vec::new(); spec.num_splits()];
    for rows in groups.values() {
        let buckets = partition_rows(rows.len(), spec.ratios(), mode.shuffle_seed(config.seed));
        for (split, local) in splits.iter_mut().zip(buckets) {
            split.extend(local.into_iter().map(|i| rows[i]));
        }
    }

    tracing::debug!(
        group_column,
        groups = groups.len(),
        rows = batch.num_rows(),
        ?mode,
        "partitioned groups"
    );

    let outputs = splits
        .iter()
        .map(|positions| ArrowDataset::from_batch(take_rows(&batch, positions)?))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        sizes = ?outputs.iter().map(Dataset::len).collect::<Vec<_>>(),
        filter_by = %config.filter_by,
        ?mode,
        "stratified split complete"
    );

    Ok(outputs)
}

/// Applies the activity filter and, in chronological mode, the timestamp
/// sort.
fn preprocess(batch: RecordBatch, config: &SplitConfig, mode: SplitMode) -> Result<RecordBatch> {
    let mut steps: Vec<Box<dyn Transform>> = Vec::new();
    if config.min_rating > 1 {
        steps.push(Box::new(MinRatingFilter::new(
            config.min_rating,
            config.filter_by,
            config.columns.clone(),
        )?));
    }
    if mode == SplitMode::Chronological {
        steps.push(Box::new(Sort::by(config.columns.col_timestamp.as_str())));
    }

    steps.iter().try_fold(batch, |batch, step| step.apply(batch))
}

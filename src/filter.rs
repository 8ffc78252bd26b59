//! Minimum-activity filtering.
//!
//! Users (or items) with too few interactions carry little signal for
//! evaluation. The filter drops every row of a group whose row count is
//! below a threshold, keeping the order of the remaining rows.

use arrow::{
    array::{BooleanArray, RecordBatch},
    compute::filter_record_batch,
};

use crate::{
    config::{check_min_rating, ColumnNames, FilterBy},
    error::{Error, Result},
    group::{key_counts, key_values},
    transform::Transform,
};

/// Removes rows whose group has fewer than `min_rating` rows.
///
/// Groups are formed on the column selected by `filter_by`. A threshold of
/// one leaves the batch unchanged.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `min_rating < 1`, and a column or data
/// error if the key column is missing or unusable.
pub fn min_rating_filter(
    batch: &RecordBatch,
    min_rating: i64,
    filter_by: FilterBy,
    columns: &ColumnNames,
) -> Result<RecordBatch> {
    check_min_rating(min_rating)?;
    let column = filter_by.column(columns);

    let keys = key_values(batch, column)?;
    if min_rating == 1 {
        return Ok(batch.clone());
    }

    let threshold = usize::try_from(min_rating)
        .map_err(|_| Error::invalid_config(format!("min_rating {min_rating} is too large")))?;
    let counts = key_counts(&keys);
    let mask: BooleanArray = keys
        .iter()
        .map(|key| Some(counts.get(key).copied().unwrap_or(0) >= threshold))
        .collect();

    let filtered = filter_record_batch(batch, &mask).map_err(Error::Arrow)?;

    tracing::debug!(
        filter_by = %filter_by,
        min_rating,
        groups_removed = counts.values().filter(|&&c| c < threshold).count(),
        rows_removed = batch.num_rows() - filtered.num_rows(),
        rows_kept = filtered.num_rows(),
        "applied minimum rating filter"
    );

    Ok(filtered)
}

/// [`min_rating_filter`] as a [`Transform`].
///
/// # Example
///
/// ```
/// use recsplit::{filter::MinRatingFilter, ColumnNames, FilterBy};
///
/// let filter = MinRatingFilter::new(5, FilterBy::User, ColumnNames::default()).unwrap();
/// assert_eq!(filter.min_rating(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct MinRatingFilter {
    min_rating: i64,
    filter_by: FilterBy,
    columns: ColumnNames,
}

impl MinRatingFilter {
    /// Creates the filter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `min_rating < 1`.
    pub fn new(min_rating: i64, filter_by: FilterBy, columns: ColumnNames) -> Result<Self> {
        check_min_rating(min_rating)?;
        Ok(Self {
            min_rating,
            filter_by,
            columns,
        })
    }

    /// The activity threshold.
    pub fn min_rating(&self) -> i64 {
        self.min_rating
    }
}

impl Transform for MinRatingFilter {
    fn apply(&self, batch: RecordBatch) -> Result<RecordBatch> {
        min_rating_filter(&batch, self.min_rating, self.filter_by, &self.columns)
    }
}

//! Row-level operations: ordering.

use std::sync::Arc;

use arrow::{
    array::{Array, RecordBatch, UInt64Array},
    compute::{lexsort_to_indices, take, SortColumn, SortOptions},
};

use super::Transform;
use crate::error::{Error, Result};

/// A stable ascending sort of the rows of a RecordBatch by one column.
///
/// Rows with equal sort keys keep their relative input order, so sorting
/// interaction logs by timestamp never reorders same-instant events. Null
/// keys are rejected.
///
/// # Example
///
/// ```
/// use recsplit::transform::Sort;
///
/// let chronological = Sort::by("timestamp");
/// assert_eq!(chronological.column(), "timestamp");
/// ```
#[derive(Debug, Clone)]
pub struct Sort {
    column: String,
}

impl Sort {
    /// Creates an ascending sort on `column`.
    pub fn by<S: Into<String>>(column: S) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// The column rows are ordered by.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Row positions of `batch` in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is missing, contains nulls, or has a
    /// type Arrow cannot order.
    pub fn sorted_positions(&self, batch: &RecordBatch) -> Result<UInt64Array> {
        let idx = batch
            .schema()
            .index_of(&self.column)
            .map_err(|_| Error::column_not_found(&self.column))?;
        let values = batch.column(idx);

        if values.null_count() > 0 {
            return Err(Error::data(format!(
                "column '{}' has {} null values and cannot be ordered",
                self.column,
                values.null_count()
            )));
        }

        // Row position as a secondary key makes the sort stable.
        let positions: Arc<dyn Array> = Arc::new(UInt64Array::from_iter_values(
            0..batch.num_rows() as u64,
        ));
        let sort_columns = vec![
            SortColumn {
                values: Arc::clone(values),
                options: Some(SortOptions {
                    descending: false,
                    nulls_first: false,
                }),
            },
            SortColumn {
                values: positions,
                options: Some(SortOptions {
                    descending: false,
                    nulls_first: false,
                }),
            },
        ];

        let indices = lexsort_to_indices(&sort_columns, None).map_err(Error::Arrow)?;
        Ok(UInt64Array::from_iter_values(
            indices.values().iter().map(|&i| u64::from(i)),
        ))
    }
}

impl Transform for Sort {
    fn apply(&self, batch: RecordBatch) -> Result<RecordBatch> {
        if batch.num_rows() <= 1 {
            // Still surface a missing column.
            batch
                .schema()
                .index_of(&self.column)
                .map_err(|_| Error::column_not_found(&self.column))?;
            return Ok(batch);
        }

        let indices = self.sorted_positions(&batch)?;
        let schema = batch.schema();

        let new_columns: Vec<Arc<dyn Array>> = batch
            .columns()
            .iter()
            .map(|col| take(col.as_ref(), &indices, None).map_err(Error::Arrow))
            .collect::<Result<Vec<_>>>()?;

        RecordBatch::try_new(schema, new_columns).map_err(Error::Arrow)
    }
}

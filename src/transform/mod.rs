//! Batch transforms applied before splitting.
//!
//! A transform maps one RecordBatch to another. The splitters use them to
//! drop inactive users or items ([`MinRatingFilter`](crate::filter::MinRatingFilter))
//! and to put interactions in chronological order ([`Sort`]).

use arrow::array::RecordBatch;

use crate::error::Result;

mod row_ops;

pub use row_ops::Sort;

/// A transform that can be applied to RecordBatches.
///
/// # Thread Safety
///
/// All transforms must be thread-safe (Send + Sync).
pub trait Transform: Send + Sync {
    /// Applies the transform to a RecordBatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform cannot be applied to the batch.
    fn apply(&self, batch: RecordBatch) -> Result<RecordBatch>;
}

impl Transform for Box<dyn Transform> {
    fn apply(&self, batch: RecordBatch) -> Result<RecordBatch> {
        self.as_ref().apply(batch)
    }
}

//! recsplit - Train/test splitting for recommendation datasets
//!
//! Splits (user, item, rating, timestamp) interaction data held in Arrow
//! RecordBatches into two or more disjoint sets by ratio.
//!
//! # Splitting policies
//!
//! 1. **Random** - [`random_split`] shuffles all rows and cuts by ratio
//! 2. **Stratified** - [`stratified_split`] splits every user (or item)
//!    separately after a seeded shuffle
//! 3. **Chronological** - [`chrono_split`] splits every user (or item)
//!    separately, earliest interactions first
//!
//! Stratified policies can drop users or items with fewer than
//! `min_rating` interactions before splitting. Every remaining row ends up in
//! exactly one output set.
//!
//! # Quick Start
//!
//! ```no_run
//! use recsplit::{chrono_split, ArrowDataset, Dataset, SplitConfig};
//!
//! let ratings = ArrowDataset::from_csv("ratings.csv").unwrap();
//!
//! let config = SplitConfig::new().with_ratio([0.8, 0.1, 0.1]).with_min_rating(5);
//! let splits = chrono_split(&ratings, &config).unwrap();
//!
//! for (i, split) in splits.iter().enumerate() {
//!     println!("split {i}: {} interactions", split.len());
//! }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::cast_lossless,
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::float_cmp,
        clippy::similar_names
    )
)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod group;
pub mod partition;
pub mod ratio;
pub mod split;
pub mod stratify;
pub mod transform;

pub use arrow::{
    array::RecordBatch,
    datatypes::{Schema, SchemaRef},
};
pub use config::{ColumnNames, FilterBy, SplitConfig};
pub use dataset::{ArrowDataset, CsvOptions, Dataset};
pub use error::{Error, Result};
pub use filter::{min_rating_filter, MinRatingFilter};
pub use partition::{assign_split_indices, split_boundaries};
pub use ratio::{process_split_ratio, RatioSpec, SplitRatio};
pub use split::{chrono_split, random_split, stratified_split, train_test_split};
pub use stratify::SplitMode;
pub use transform::{Sort, Transform};

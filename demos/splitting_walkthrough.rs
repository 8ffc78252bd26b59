//! Splitting Walkthrough
//!
//! Builds a small ratings table and splits it three ways:
//! - random 75/25
//! - stratified per user, 60/20/20
//! - chronological per user, dropping users with fewer than 4 ratings
//!
//! Run with: RUST_LOG=recsplit=debug cargo run --example splitting_walkthrough

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::uninlined_format_args
)]

use std::sync::Arc;

use arrow::{
    array::{Float64Array, Int64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use recsplit::{chrono_split, random_split, stratified_split, ArrowDataset, Dataset, SplitConfig};

fn main() -> recsplit::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== recsplit walkthrough ===\n");

    let schema = Arc::new(Schema::new(vec![
        Field::new("userID", DataType::Utf8, false),
        Field::new("itemID", DataType::Int64, false),
        Field::new("rating", DataType::Float64, false),
        Field::new("timestamp", DataType::Int64, false),
    ]));

    // alice: 8 ratings, bob: 5, carol: 2
    let mut users = Vec::new();
    let mut items = Vec::new();
    let mut ratings = Vec::new();
    let mut timestamps = Vec::new();
    for (user, count) in [("alice", 8), ("bob", 5), ("carol", 2)] {
        for k in 0..count {
            users.push(user);
            items.push(100 + k);
            ratings.push(((k % 5) + 1) as f64);
            timestamps.push(1_600_000_000 + k * 3_600);
        }
    }

    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(users)),
            Arc::new(Int64Array::from(items)),
            Arc::new(Float64Array::from(ratings)),
            Arc::new(Int64Array::from(timestamps)),
        ],
    )?;
    let dataset = ArrowDataset::from_batch(batch)?;
    println!("Dataset has {} interactions\n", dataset.len());

    // 1. Random split
    let splits = random_split(&dataset, 0.75, 42)?;
    println!("1. Random 0.75: {:?}", sizes(&splits));

    // 2. Stratified random split
    let config = SplitConfig::new().with_ratio([0.6, 0.2, 0.2]);
    let splits = stratified_split(&dataset, &config)?;
    println!("2. Stratified [0.6, 0.2, 0.2]: {:?}", sizes(&splits));

    // 3. Chronological split with an activity filter
    let config = SplitConfig::new().with_ratio(0.8).with_min_rating(4);
    let splits = chrono_split(&dataset, &config)?;
    println!("3. Chronological 0.8, min_rating 4: {:?}", sizes(&splits));

    let out_dir = std::env::temp_dir();
    for (name, split) in ["train", "test"].iter().zip(&splits) {
        let path = out_dir.join(format!("recsplit_{}.parquet", name));
        split.to_parquet(&path)?;
        println!("   wrote {} rows to {}", split.len(), path.display());
    }

    Ok(())
}

fn sizes(splits: &[ArrowDataset]) -> Vec<usize> {
    splits.iter().map(Dataset::len).collect()
}

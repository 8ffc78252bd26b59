//! Grouping rows by a user or item key column.

use std::collections::BTreeMap;

use arrow::{
    array::{Array, ArrayRef, Float64Array, Int64Array, RecordBatch, StringArray, UInt64Array},
    compute::cast,
    datatypes::DataType,
};

use crate::error::{Error, Result};

/// Value of a key column in one row.
///
/// Integer ids are widened to 64 bits; string ids are owned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    /// Signed integer id.
    Int(i64),
    /// Unsigned integer id.
    UInt(u64),
    /// String id.
    Text(String),
}

/// Reads the key of every row of `column`.
///
/// Integer and string columns (including dictionary-encoded strings) are
/// supported. Float columns are accepted when every value is a whole number,
/// as happens when CSV inference types integer ids as `Float64`; such keys
/// become [`GroupKey::Int`].
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if the column is missing, and
/// [`Error::Data`] if it holds nulls (in the keys or in dictionary values),
/// fractional floats, or any other type.
pub fn key_values(batch: &RecordBatch, column: &str) -> Result<Vec<GroupKey>> {
    let idx = batch
        .schema()
        .index_of(column)
        .map_err(|_| Error::column_not_found(column))?;
    let array = batch.column(idx);

    match array.data_type() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let widened = non_null(widen(array, &DataType::Int64)?, column)?;
            let ints = downcast::<Int64Array>(&widened, column)?;
            Ok(ints.values().iter().map(|&v| GroupKey::Int(v)).collect())
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let widened = non_null(widen(array, &DataType::UInt64)?, column)?;
            let ints = downcast::<UInt64Array>(&widened, column)?;
            Ok(ints.values().iter().map(|&v| GroupKey::UInt(v)).collect())
        }
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            let widened = non_null(widen(array, &DataType::Float64)?, column)?;
            let floats = downcast::<Float64Array>(&widened, column)?;
            floats
                .values()
                .iter()
                .map(|&v| integral(v, column).map(GroupKey::Int))
                .collect()
        }
        DataType::Utf8 | DataType::LargeUtf8 => text_keys(array, column),
        DataType::Dictionary(_, value)
            if matches!(value.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            text_keys(array, column)
        }
        dt => Err(Error::data(format!(
            "unsupported type {dt:?} for key column '{column}'"
        ))),
    }
}

/// Groups row positions by key, visiting rows in `order`.
///
/// Within each group, positions keep the relative order they have in
/// `order`. Groups are returned in ascending key order.
pub fn group_positions(keys: &[GroupKey], order: &[usize]) -> BTreeMap<GroupKey, Vec<usize>> {
    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for &pos in order {
        groups.entry(keys[pos].clone()).or_default().push(pos);
    }
    groups
}

/// Number of rows per key.
pub fn key_counts(keys: &[GroupKey]) -> BTreeMap<&GroupKey, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn text_keys(array: &ArrayRef, column: &str) -> Result<Vec<GroupKey>> {
    // Unpacking a dictionary surfaces nulls stored in its values.
    let text = non_null(widen(array, &DataType::Utf8)?, column)?;
    let strings = downcast::<StringArray>(&text, column)?;
    Ok((0..strings.len())
        .map(|i| GroupKey::Text(strings.value(i).to_string()))
        .collect())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn integral(value: f64, column: &str) -> Result<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(Error::data(format!(
            "key column '{column}' holds non-integral value {value}"
        )))
    }
}

fn non_null(array: ArrayRef, column: &str) -> Result<ArrayRef> {
    match array.null_count() {
        0 => Ok(array),
        nulls => Err(Error::data(format!(
            "key column '{column}' has {nulls} null values"
        ))),
    }
}

fn widen(array: &ArrayRef, to: &DataType) -> Result<ArrayRef> {
    if array.data_type() == to {
        return Ok(array.clone());
    }
    cast(array.as_ref(), to).map_err(Error::Arrow)
}

fn downcast<'a, T: 'static>(array: &'a ArrayRef, column: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::data(format!("failed to read key column '{column}'")))
}

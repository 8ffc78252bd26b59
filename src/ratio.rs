//! Split ratio validation and normalization.
//!
//! A split is described either by a single training fraction (two-way split)
//! or by a list of proportions, one per output set (multi-way split). Lists
//! that do not sum to one are normalized.
//!
//! # Example
//!
//! ```
//! use recsplit::ratio::{RatioSpec, SplitRatio};
//!
//! let spec = RatioSpec::parse(&SplitRatio::from(vec![1.0, 1.0, 2.0])).unwrap();
//! assert!(spec.is_multi());
//! assert_eq!(spec.ratios(), &[0.25, 0.25, 0.5]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance used when checking whether a ratio list already sums to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// A ratio as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SplitRatio {
    /// Fraction of rows in the first (training) set; the rest go to the second.
    Fraction(f64),
    /// One proportion per output set. Normalized if the sum is not one.
    Proportions(Vec<f64>),
}

impl Default for SplitRatio {
    fn default() -> Self {
        Self::Fraction(0.75)
    }
}

impl From<f64> for SplitRatio {
    fn from(value: f64) -> Self {
        Self::Fraction(value)
    }
}

impl From<Vec<f64>> for SplitRatio {
    fn from(values: Vec<f64>) -> Self {
        Self::Proportions(values)
    }
}

impl From<&[f64]> for SplitRatio {
    fn from(values: &[f64]) -> Self {
        Self::Proportions(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for SplitRatio {
    fn from(values: [f64; N]) -> Self {
        Self::Proportions(values.to_vec())
    }
}

/// Canonical ratio sequence: at least two positive proportions summing to one.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioSpec {
    multi: bool,
    ratios: Vec<f64>,
}

impl RatioSpec {
    /// Validates and normalizes a ratio.
    ///
    /// A fraction `r` becomes `[r, 1 - r]` and is reported as two-way. A list
    /// is reported as multi-way and divided by its sum unless it already sums
    /// to one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRatio`] if a fraction lies outside `(0, 1)`,
    /// if a list has fewer than two elements, or if any element is not a
    /// positive finite number.
    pub fn parse(ratio: &SplitRatio) -> Result<Self> {
        match ratio {
            SplitRatio::Fraction(r) => {
                if !r.is_finite() || *r <= 0.0 || *r >= 1.0 {
                    return Err(Error::invalid_ratio(format!(
                        "split fraction must be between 0 and 1 (exclusive), got {r}"
                    )));
                }
                Ok(Self {
                    multi: false,
                    ratios: vec![*r, 1.0 - r],
                })
            }
            SplitRatio::Proportions(values) => {
                if values.len() < 2 {
                    return Err(Error::invalid_ratio(format!(
                        "{values:?} is not a valid ratio list, \
                         at least two proportions are required"
                    )));
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
                    return Err(Error::invalid_ratio(format!(
                        "all split ratios must be positive, got {bad}"
                    )));
                }

                let total: f64 = values.iter().sum();
                let ratios = if (total - 1.0).abs() <= SUM_TOLERANCE {
                    values.clone()
                } else {
                    values.iter().map(|v| v / total).collect()
                };

                Ok(Self {
                    multi: true,
                    ratios,
                })
            }
        }
    }

    /// True when the ratio was given as a list rather than a single fraction.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// The canonical proportions, one per output set.
    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Number of output sets.
    pub fn num_splits(&self) -> usize {
        self.ratios.len()
    }

    /// Training fraction of a two-way split (the first proportion).
    pub fn train_fraction(&self) -> f64 {
        self.ratios[0]
    }
}

/// Convenience wrapper returning `(is_multi, ratios)`.
///
/// # Errors
///
/// See [`RatioSpec::parse`].
pub fn process_split_ratio(ratio: &SplitRatio) -> Result<(bool, Vec<f64>)> {
    let spec = RatioSpec::parse(ratio)?;
    Ok((spec.multi, spec.ratios))
}

//! Split configuration.
//!
//! [`SplitConfig`] gathers every option the stratified splitters recognize.
//! It can be built in code with the `with_*` setters or read from JSON:
//!
//! ```
//! use recsplit::{FilterBy, SplitConfig};
//!
//! let config = SplitConfig::from_json_str(
//!     r#"{ "ratio": [0.8, 0.1, 0.1], "min_rating": 5, "filter_by": "item" }"#,
//! )
//! .unwrap();
//! assert_eq!(config.filter_by, FilterBy::Item);
//! assert_eq!(config.columns.col_user, "userID");
//! ```

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ratio::{RatioSpec, SplitRatio},
};

/// Default user id column name.
pub const DEFAULT_USER_COL: &str = "userID";
/// Default item id column name.
pub const DEFAULT_ITEM_COL: &str = "itemID";
/// Default timestamp column name.
pub const DEFAULT_TIMESTAMP_COL: &str = "timestamp";
/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// Which key rows are grouped (and activity-filtered) by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBy {
    /// Group by the user column.
    #[default]
    User,
    /// Group by the item column.
    Item,
}

impl FilterBy {
    /// The column name this key refers to under `columns`.
    pub fn column<'a>(&self, columns: &'a ColumnNames) -> &'a str {
        match self {
            Self::User => &columns.col_user,
            Self::Item => &columns.col_item,
        }
    }
}

impl FromStr for FilterBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Self::User),
            "item" => Ok(Self::Item),
            other => Err(Error::invalid_config(format!(
                "filter_by should be either 'user' or 'item', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for FilterBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Item => write!(f, "item"),
        }
    }
}

/// Column names of the interaction schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// User id column.
    pub col_user: String,
    /// Item id column.
    pub col_item: String,
    /// Timestamp column, required for chronological splits.
    pub col_timestamp: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            col_user: DEFAULT_USER_COL.to_string(),
            col_item: DEFAULT_ITEM_COL.to_string(),
            col_timestamp: DEFAULT_TIMESTAMP_COL.to_string(),
        }
    }
}

impl ColumnNames {
    /// Sets the user column name.
    #[must_use]
    pub fn with_user(mut self, name: impl Into<String>) -> Self {
        self.col_user = name.into();
        self
    }

    /// Sets the item column name.
    #[must_use]
    pub fn with_item(mut self, name: impl Into<String>) -> Self {
        self.col_item = name.into();
        self
    }

    /// Sets the timestamp column name.
    #[must_use]
    pub fn with_timestamp(mut self, name: impl Into<String>) -> Self {
        self.col_timestamp = name.into();
        self
    }
}

/// Options for the stratified splitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Training fraction or list of proportions.
    pub ratio: SplitRatio,
    /// Minimum number of interactions a user or item needs to be kept.
    pub min_rating: i64,
    /// Key used for grouping and for the activity filter.
    pub filter_by: FilterBy,
    /// Shuffle seed for the random modes.
    pub seed: u64,
    /// Column names.
    pub columns: ColumnNames,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            ratio: SplitRatio::default(),
            min_rating: 1,
            filter_by: FilterBy::default(),
            seed: DEFAULT_SEED,
            columns: ColumnNames::default(),
        }
    }
}

impl SplitConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the split ratio.
    #[must_use]
    pub fn with_ratio(mut self, ratio: impl Into<SplitRatio>) -> Self {
        self.ratio = ratio.into();
        self
    }

    /// Sets the minimum activity threshold.
    #[must_use]
    pub fn with_min_rating(mut self, min_rating: i64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Sets the grouping key.
    #[must_use]
    pub fn with_filter_by(mut self, filter_by: FilterBy) -> Self {
        self.filter_by = filter_by;
        self
    }

    /// Sets the shuffle seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the column names.
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Column that rows are grouped by.
    pub fn group_column(&self) -> &str {
        self.filter_by.column(&self.columns)
    }

    /// Checks the threshold and ratio without looking at any data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `min_rating < 1`, or
    /// [`Error::InvalidRatio`] if the ratio is not usable.
    pub fn validate(&self) -> Result<RatioSpec> {
        check_min_rating(self.min_rating)?;
        RatioSpec::parse(&self.ratio)
    }

    /// Parses a configuration from a JSON string. Missing fields take their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the JSON is malformed or has unknown
    /// `filter_by` values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(e.to_string()))
    }

    /// Reads a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or [`Error::Parse`]
    /// if it is not a valid configuration.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
        Self::from_json_str(&contents)
    }

    /// Serializes the configuration to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::parse(e.to_string()))
    }
}

/// Rejects activity thresholds below one.
pub(crate) fn check_min_rating(min_rating: i64) -> Result<()> {
    if min_rating < 1 {
        return Err(Error::invalid_config(format!(
            "min_rating should be an integer larger than or equal to 1, got {min_rating}"
        )));
    }
    Ok(())
}

use std::{env, path::PathBuf};

use crate::calendar::YearMonth;
use crate::errors::ConfigError;

pub const DEFAULT_STORAGE_KEY: &str = "liquid_habits_v1";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Key the tracker document is stored under.
    pub storage_key: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl TrackerConfig {
    pub fn with_storage_key(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
        }
    }
}

/// Settings of the report binary.
///
/// | variable             | default            |
/// |----------------------|--------------------|
/// | `HABIT_DATA_DIR`     | `data`             |
/// | `HABIT_STORAGE_KEY`  | `liquid_habits_v1` |
/// | `HABIT_REPORT_MONTH` | current month      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub data_dir: PathBuf,
    pub tracker: TrackerConfig,
    pub month: Option<YearMonth>,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = read("HABIT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let tracker = match read("HABIT_STORAGE_KEY") {
            Some(key) => TrackerConfig::with_storage_key(key.trim()),
            None => TrackerConfig::default(),
        };

        let month = read("HABIT_REPORT_MONTH")
            .map(|raw| {
                raw.parse::<YearMonth>()
                    .map_err(|err| ConfigError::invalid("HABIT_REPORT_MONTH", err.to_string()))
            })
            .transpose()?;

        Ok(Self {
            data_dir,
            tracker,
            month,
        })
    }
}

pub mod calendar;
pub mod config;
pub mod errors;
pub mod migrate;
pub mod models;
pub mod registry;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tracker;

pub use calendar::{YearMonth, date_key, days_in_month, partition_into_weeks, start_weekday};
pub use config::{ReportConfig, TrackerConfig};
pub use errors::{Rejection, StorageError, TrackerError};
pub use registry::{GoalDays, HabitUpdate};
pub use storage::{FileBackend, MemoryBackend, StorageBackend};
pub use tracker::HabitTracker;

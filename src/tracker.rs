use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::calendar::YearMonth;
use crate::config::TrackerConfig;
use crate::errors::{StorageError, TrackerError};
use crate::models::{
    DailyPoint, DayHabit, DetailedStats, Habit, HabitProgress, MonthPercent, MonthReport,
    MonthStats, Streaks, TrackerData,
};
use crate::registry::{GoalDays, HabitUpdate};
use crate::stats;
use crate::storage::{StorageBackend, load_data, persist_data};

/// A habit tracker bound to one stored document.
///
/// Every command applies to the in-memory model first and then writes the whole
/// document before returning. A failed write is reported as
/// [`TrackerError::Storage`] but the in-memory change is kept; [`HabitTracker::save`]
/// retries it.
#[derive(Debug)]
pub struct HabitTracker<B> {
    backend: B,
    config: TrackerConfig,
    data: TrackerData,
}

impl<B: StorageBackend> HabitTracker<B> {
    /// Reads the stored document under the configured key. A backend that cannot
    /// be read fails the open rather than starting empty over existing state.
    pub fn open(backend: B, config: TrackerConfig) -> Result<Self, StorageError> {
        let data = load_data(&backend, &config.storage_key)?;
        info!(
            key = %config.storage_key,
            habits = data.habits.len(),
            records = data.completions.len(),
            "opened habit tracker"
        );
        Ok(Self {
            backend,
            config,
            data,
        })
    }

    pub fn data(&self) -> &TrackerData {
        &self.data
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    pub fn save(&mut self) -> Result<(), TrackerError> {
        self.persist()?;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        persist_data(&mut self.backend, &self.config.storage_key, &self.data).inspect_err(|err| {
            warn!(key = %self.config.storage_key, "failed to persist tracker state: {err}");
        })
    }

    // Habits

    pub fn list_habits(&self) -> &[Habit] {
        self.data.habits.list()
    }

    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.data.habits.get(id)
    }

    pub fn add_habit(
        &mut self,
        name: &str,
        icon: &str,
        goal_days: GoalDays,
    ) -> Result<Habit, TrackerError> {
        let habit = self.data.habits.add(name, icon, goal_days).inspect_err(|err| {
            debug!("rejected new habit: {err}");
        })?;
        debug!(id = %habit.id, name = %habit.name, "added habit");
        self.persist()?;
        Ok(habit)
    }

    /// Returns `Ok(false)` and changes nothing when `id` is unknown.
    pub fn update_habit(&mut self, id: &str, update: HabitUpdate) -> Result<bool, TrackerError> {
        if !self.data.habits.update(id, update)? {
            debug!(id, "ignored update of unknown habit");
            return Ok(false);
        }
        debug!(id, "updated habit");
        self.persist()?;
        Ok(true)
    }

    /// Removes the definition only; the habit's completion records stay stored.
    pub fn delete_habit(&mut self, id: &str) -> Result<bool, TrackerError> {
        let Some(habit) = self.data.habits.delete(id) else {
            debug!(id, "ignored delete of unknown habit");
            return Ok(false);
        };
        debug!(id = %habit.id, name = %habit.name, "deleted habit");
        self.persist()?;
        Ok(true)
    }

    // Completions

    pub fn is_complete(&self, date: NaiveDate, habit_id: &str) -> bool {
        self.data.completions.is_complete(date, habit_id)
    }

    /// Returns whether anything changed. Unknown habits and repeated values are
    /// no-ops and do not write.
    pub fn set_complete(
        &mut self,
        date: NaiveDate,
        habit_id: &str,
        done: bool,
    ) -> Result<bool, TrackerError> {
        if !self.data.habits.contains(habit_id) {
            debug!(habit_id, "ignored mark for unknown habit");
            return Ok(false);
        }
        if !self.data.completions.set_complete(date, habit_id, done) {
            return Ok(false);
        }
        debug!(habit_id, %date, done, "set completion");
        self.persist()?;
        Ok(true)
    }

    /// Flips a mark and returns the new value, or `None` for an unknown habit.
    pub fn toggle(
        &mut self,
        date: NaiveDate,
        habit_id: &str,
    ) -> Result<Option<bool>, TrackerError> {
        if !self.data.habits.contains(habit_id) {
            debug!(habit_id, "ignored toggle for unknown habit");
            return Ok(None);
        }
        let done = self.data.completions.toggle(date, habit_id);
        debug!(habit_id, %date, done, "toggled completion");
        self.persist()?;
        Ok(Some(done))
    }

    /// Copies every registered habit's marks from `from` into the same day numbers
    /// of `to`. Returns the number of marks added.
    pub fn copy_forward(&mut self, from: YearMonth, to: YearMonth) -> Result<usize, TrackerError> {
        let habit_ids = self.data.habits.list().iter().map(|habit| habit.id.as_str());
        let added = self.data.completions.copy_forward(from, to, habit_ids);
        debug!(%from, %to, added, "copied completions forward");
        if added > 0 {
            self.persist()?;
        }
        Ok(added)
    }

    pub fn copy_previous_month(&mut self, into: YearMonth) -> Result<usize, TrackerError> {
        self.copy_forward(into.previous(), into)
    }

    // Statistics

    pub fn month_stats(&self, month: YearMonth) -> MonthStats {
        stats::month_stats(&self.data, month)
    }

    pub fn habit_month_percent(&self, month: YearMonth, habit_id: &str) -> u32 {
        stats::habit_month_percent(&self.data, month, habit_id)
    }

    pub fn habit_breakdown(&self, month: YearMonth) -> Vec<HabitProgress> {
        stats::habit_breakdown(&self.data, month)
    }

    pub fn daily_completion_percent(&self, month: YearMonth, day: u32) -> u32 {
        stats::daily_completion_percent(&self.data, month, day)
    }

    pub fn daily_series(&self, month: YearMonth) -> Vec<DailyPoint> {
        stats::daily_series(&self.data, month)
    }

    pub fn streaks(&self, month: YearMonth) -> Streaks {
        stats::streaks(&self.data, month)
    }

    pub fn streaks_at(&self, month: YearMonth, today: NaiveDate) -> Streaks {
        stats::streaks_at(&self.data, month, today)
    }

    pub fn best_day_percent(&self, month: YearMonth) -> u32 {
        stats::best_day_percent(&self.data, month)
    }

    pub fn year_overview(&self, year: i32) -> Vec<MonthPercent> {
        stats::year_overview(&self.data, year)
    }

    pub fn detailed_stats(&self, month: YearMonth) -> DetailedStats {
        stats::detailed_stats(&self.data, month)
    }

    pub fn detailed_stats_at(&self, month: YearMonth, today: NaiveDate) -> DetailedStats {
        stats::detailed_stats_at(&self.data, month, today)
    }

    pub fn day_habits(&self, date: NaiveDate) -> Vec<DayHabit> {
        stats::day_habits(&self.data, date)
    }

    pub fn report(&self, month: YearMonth) -> MonthReport {
        stats::build_report(&self.data, month)
    }

    pub fn report_at(&self, month: YearMonth, today: NaiveDate) -> MonthReport {
        stats::build_report_at(&self.data, month, today)
    }

    pub fn orphaned_records(&self) -> usize {
        stats::orphaned_records(&self.data)
    }
}

use serde::Serialize;

use crate::registry::HabitRegistry;
use crate::store::CompletionMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub goal_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub struct Completion {
    pub done: bool,
}

/// Everything one tracker persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrackerData {
    pub habits: HabitRegistry,
    pub completions: CompletionMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthStats {
    pub total_habits: u32,
    pub completed: u32,
    pub possible: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current_streak: u32,
    pub longest_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStats {
    pub completion_rate: u32,
    pub total_completed: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub best_day: u32,
    pub habits_tracked: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPercent {
    pub month_index: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub day: u32,
    pub date_key: String,
    pub completed: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitProgress {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub goal_days: u32,
    pub completed_days: u32,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHabit {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub done: bool,
}

/// Month summary as printed by the report binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthReport {
    pub month: String,
    pub title: String,
    pub stats: MonthStats,
    pub detailed: DetailedStats,
    pub habits: Vec<HabitProgress>,
    pub daily: Vec<DailyPoint>,
    pub year_overview: Vec<MonthPercent>,
}

use crate::calendar::{YearMonth, date_key};
use crate::models::{
    DailyPoint, DayHabit, DetailedStats, HabitProgress, MonthPercent, MonthReport, MonthStats,
    Streaks, TrackerData,
};
use chrono::{Datelike, Local, NaiveDate};

pub fn month_stats(data: &TrackerData, month: YearMonth) -> MonthStats {
    let total_habits = data.habits.len() as u32;
    let possible = total_habits * month.days();
    let completed: u32 = data
        .habits
        .list()
        .iter()
        .map(|habit| data.completions.count_in_month(month, &habit.id))
        .sum();

    MonthStats {
        total_habits,
        completed,
        possible,
        percent: percent(completed, possible),
    }
}

/// Share of the month's days on which `habit_id` was done.
pub fn habit_month_percent(data: &TrackerData, month: YearMonth, habit_id: &str) -> u32 {
    if !data.habits.contains(habit_id) {
        return 0;
    }
    percent(data.completions.count_in_month(month, habit_id), month.days())
}

pub fn habit_breakdown(data: &TrackerData, month: YearMonth) -> Vec<HabitProgress> {
    data.habits
        .list()
        .iter()
        .map(|habit| {
            let completed_days = data.completions.count_in_month(month, &habit.id);
            HabitProgress {
                id: habit.id.clone(),
                name: habit.name.clone(),
                icon: habit.icon.clone(),
                goal_days: habit.goal_days,
                completed_days,
                percent: percent(completed_days, month.days()),
            }
        })
        .collect()
}

/// Share of all habits done on `day` of `month`. Days outside the month give 0.
pub fn daily_completion_percent(data: &TrackerData, month: YearMonth, day: u32) -> u32 {
    if day > month.days() {
        return 0;
    }
    month
        .date(day)
        .map(|date| percent(completed_on(data, date), data.habits.len() as u32))
        .unwrap_or(0)
}

pub fn daily_series(data: &TrackerData, month: YearMonth) -> Vec<DailyPoint> {
    let total_habits = data.habits.len() as u32;
    month
        .dates()
        .map(|date| {
            let completed = completed_on(data, date);
            DailyPoint {
                day: date.day(),
                date_key: date_key(date),
                completed,
                percent: percent(completed, total_habits),
            }
        })
        .collect()
}

pub fn best_day_percent(data: &TrackerData, month: YearMonth) -> u32 {
    daily_series(data, month)
        .iter()
        .map(|point| point.percent)
        .max()
        .unwrap_or(0)
}

pub fn streaks(data: &TrackerData, month: YearMonth) -> Streaks {
    streaks_at(data, month, Local::now().date_naive())
}

/// Runs of days on which every habit was done, counted inside `month` only.
///
/// The current streak is the run ending on `today`; it is 0 when `today` is
/// outside the month or not fully done.
pub fn streaks_at(data: &TrackerData, month: YearMonth, today: NaiveDate) -> Streaks {
    if data.habits.is_empty() {
        return Streaks::default();
    }

    let mut streaks = Streaks::default();
    let mut run = 0u32;
    for date in month.dates() {
        if all_done_on(data, date) {
            run += 1;
            streaks.longest_streak = streaks.longest_streak.max(run);
        } else {
            run = 0;
        }
        if date == today {
            streaks.current_streak = run;
        }
    }
    streaks
}

pub fn year_overview(data: &TrackerData, year: i32) -> Vec<MonthPercent> {
    (0..12)
        .map(|month_index| MonthPercent {
            month_index: month_index as u32,
            percent: month_stats(data, YearMonth::new(year, month_index)).percent,
        })
        .collect()
}

pub fn detailed_stats(data: &TrackerData, month: YearMonth) -> DetailedStats {
    detailed_stats_at(data, month, Local::now().date_naive())
}

pub fn detailed_stats_at(data: &TrackerData, month: YearMonth, today: NaiveDate) -> DetailedStats {
    let stats = month_stats(data, month);
    let streaks = streaks_at(data, month, today);
    DetailedStats {
        completion_rate: stats.percent,
        total_completed: stats.completed,
        current_streak: streaks.current_streak,
        longest_streak: streaks.longest_streak,
        best_day: best_day_percent(data, month),
        habits_tracked: stats.total_habits,
    }
}

pub fn day_habits(data: &TrackerData, date: NaiveDate) -> Vec<DayHabit> {
    data.habits
        .list()
        .iter()
        .map(|habit| DayHabit {
            id: habit.id.clone(),
            name: habit.name.clone(),
            icon: habit.icon.clone(),
            done: data.completions.is_complete(date, &habit.id),
        })
        .collect()
}

pub fn build_report(data: &TrackerData, month: YearMonth) -> MonthReport {
    build_report_at(data, month, Local::now().date_naive())
}

pub fn build_report_at(data: &TrackerData, month: YearMonth, today: NaiveDate) -> MonthReport {
    MonthReport {
        month: month.key(),
        title: month.title(),
        stats: month_stats(data, month),
        detailed: detailed_stats_at(data, month, today),
        habits: habit_breakdown(data, month),
        daily: daily_series(data, month),
        year_overview: year_overview(data, month.year()),
    }
}

/// Completion records whose habit has been deleted.
pub fn orphaned_records(data: &TrackerData) -> usize {
    data.completions
        .iter()
        .filter(|(_, habit_id, _)| !data.habits.contains(habit_id))
        .count()
}

fn completed_on(data: &TrackerData, date: NaiveDate) -> u32 {
    data.habits
        .list()
        .iter()
        .filter(|habit| data.completions.is_complete(date, &habit.id))
        .count() as u32
}

fn all_done_on(data: &TrackerData, date: NaiveDate) -> bool {
    data.habits
        .list()
        .iter()
        .all(|habit| data.completions.is_complete(date, &habit.id))
}

/// `part / whole` as a whole percentage, rounding halves up.
fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((part * 200 + whole) / (whole * 2)) as u32
}

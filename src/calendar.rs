//! Calendar arithmetic for the month grid.
//!
//! Months are addressed by year and a 0-based month index. Weekdays count from
//! Sunday (`0`) to Saturday (`6`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Key for the calendar day a timestamp falls on in its own time zone.
pub fn date_key_local<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    date_key(at.date_naive())
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month_index: i32) -> u32 {
    YearMonth::new(year, month_index).days()
}

pub fn start_weekday(year: i32, month_index: i32) -> u32 {
    YearMonth::new(year, month_index).start_weekday()
}

pub fn partition_into_weeks(year: i32, month_index: i32) -> Vec<MonthDay> {
    YearMonth::new(year, month_index).partition_into_weeks()
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month_index: u32,
}

impl YearMonth {
    /// Out-of-range indices roll into the neighbouring years, so `-1` is December of
    /// the previous year and `12` is January of the next. Years are clamped to the
    /// range chrono can represent, so every month has all of its dates.
    pub fn new(year: i32, month_index: i32) -> Self {
        let year = i64::from(year) + i64::from(month_index.div_euclid(12));
        let year = year.clamp(
            i64::from(NaiveDate::MIN.year()),
            i64::from(NaiveDate::MAX.year()),
        );
        Self {
            year: year as i32,
            month_index: month_index.rem_euclid(12) as u32,
        }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month_index: date.month0(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month_index(self) -> u32 {
        self.month_index
    }

    pub fn previous(self) -> Self {
        Self::new(self.year, self.month_index as i32 - 1)
    }

    pub fn next(self) -> Self {
        Self::new(self.year, self.month_index as i32 + 1)
    }

    pub fn days(self) -> u32 {
        match self.month_index {
            1 if is_leap_year(self.year) => 29,
            1 => 28,
            3 | 5 | 8 | 10 => 30,
            _ => 31,
        }
    }

    /// Day `day` (1-based) of this month, if it exists.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month_index + 1, day)
    }

    pub fn dates(self) -> impl Iterator<Item = NaiveDate> {
        (1..=self.days()).filter_map(move |day| self.date(day))
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Weekday of day 1.
    pub fn start_weekday(self) -> u32 {
        self.date(1)
            .map(|date| date.weekday().num_days_from_sunday())
            .unwrap_or(0)
    }

    /// Every day of the month tagged with its 1-based week. Week 1 starts on day 1
    /// whatever its weekday; each Sunday after that opens the next week.
    pub fn partition_into_weeks(self) -> Vec<MonthDay> {
        let mut days = Vec::with_capacity(self.days() as usize);
        let mut week = 1;
        for date in self.dates() {
            let weekday = date.weekday().num_days_from_sunday();
            if weekday == 0 && date.day() > 1 {
                week += 1;
            }
            days.push(MonthDay {
                day: date.day(),
                week,
                weekday,
                date_key: date_key(date),
                date,
            });
        }
        days
    }

    pub fn week_count(self) -> u32 {
        self.partition_into_weeks()
            .last()
            .map(|day| day.week)
            .unwrap_or(1)
    }

    /// Week holding `date`, or week 1 when the date lies in another month.
    pub fn week_of(self, date: NaiveDate) -> u32 {
        if !self.contains(date) {
            return 1;
        }
        self.partition_into_weeks()
            .into_iter()
            .find(|day| day.date == date)
            .map(|day| day.week)
            .unwrap_or(1)
    }

    /// `YYYY-MM`.
    pub fn key(self) -> String {
        format!("{:04}-{:02}", self.year, self.month_index + 1)
    }

    pub fn title(self) -> String {
        format!("{} {}", MONTH_NAMES[self.month_index as usize], self.year)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month `{0}`, expected YYYY-MM")]
pub struct ParseMonthError(String);

impl FromStr for YearMonth {
    type Err = ParseMonthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMonthError(raw.to_string());
        let (year, month) = raw.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: i32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self::new(year, month - 1))
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthDay {
    pub day: u32,
    pub week: u32,
    pub weekday: u32,
    pub date_key: String,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn date_key_is_zero_padded() {
        assert_eq!(date_key(ymd(2024, 3, 7)), "2024-03-07");
        assert_eq!(date_key(ymd(2024, 12, 31)), "2024-12-31");
    }

    #[test]
    fn date_key_ignores_time_of_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let morning = tz.with_ymd_and_hms(2024, 3, 7, 0, 5, 0).unwrap();
        let night = tz.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap();
        assert_eq!(date_key_local(&morning), "2024-03-07");
        assert_eq!(date_key_local(&morning), date_key_local(&night));
    }

    #[test]
    fn february_follows_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2024, 3), 30);
        assert_eq!(days_in_month(2024, 11), 31);
    }

    #[test]
    fn start_weekday_matches_civil_calendar() {
        assert_eq!(start_weekday(2024, 1), 4);
        assert_eq!(start_weekday(2024, 2), 5);
        assert_eq!(start_weekday(2023, 9), 0);
    }

    #[test]
    fn month_index_rolls_over_years() {
        assert_eq!(YearMonth::new(2024, -1), YearMonth::new(2023, 11));
        assert_eq!(YearMonth::new(2024, 12), YearMonth::new(2025, 0));
        assert_eq!(YearMonth::new(2024, 0).previous().key(), "2023-12");
        assert_eq!(YearMonth::new(2024, 11).next().key(), "2025-01");
    }

    #[test]
    fn extreme_years_clamp_to_representable_months() {
        let last = YearMonth::new(i32::MAX, 11);
        assert_eq!((last.year(), last.month_index()), (NaiveDate::MAX.year(), 11));
        assert_eq!(last.date(31), Some(NaiveDate::MAX));
        let first = YearMonth::new(i32::MIN, -1);
        assert_eq!(first.year(), NaiveDate::MIN.year());

        for month in [last, YearMonth::new(i32::MAX, 1), first, YearMonth::new(i32::MIN, 1)] {
            assert_eq!(month.days() as usize, month.dates().count());
            assert_eq!(month.partition_into_weeks().len(), month.days() as usize);
            assert!(month.date(1).is_some());
        }
    }

    #[test]
    fn weeks_start_on_day_one_and_wrap_on_sunday() {
        // March 2024 opens on a Friday.
        let days = partition_into_weeks(2024, 2);
        assert_eq!(days.len(), 31);
        assert_eq!((days[0].week, days[0].weekday), (1, 5));
        assert_eq!((days[1].week, days[1].weekday), (1, 6));
        assert_eq!((days[2].week, days[2].weekday), (2, 0));
        assert_eq!(days[30].week, 6);
        assert_eq!(days[6].date_key, "2024-03-07");
        assert_eq!(YearMonth::new(2024, 2).week_count(), 6);
    }

    #[test]
    fn month_opening_on_sunday_stays_in_week_one() {
        // October 2023 opens on a Sunday.
        let days = partition_into_weeks(2023, 9);
        assert_eq!(days[0].week, 1);
        assert_eq!(days[6].week, 1);
        assert_eq!(days[7].week, 2);
    }

    #[test]
    fn week_of_falls_back_to_first_week() {
        let march = YearMonth::new(2024, 2);
        assert_eq!(march.week_of(ymd(2024, 3, 3)), 2);
        assert_eq!(march.week_of(ymd(2024, 4, 3)), 1);
    }

    #[test]
    fn parses_month_keys() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(month, YearMonth::new(2024, 2));
        assert_eq!(month.title(), "March 2024");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
    }
}

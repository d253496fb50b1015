use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::calendar::{YearMonth, date_key};
use crate::models::Completion;

/// Sparse `(date key, habit id) -> done` map.
///
/// A missing entry reads as not done. A `false` entry only exists where a `true`
/// was explicitly cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletionMap {
    days: BTreeMap<String, BTreeMap<String, Completion>>,
}

impl CompletionMap {
    pub fn is_complete(&self, date: NaiveDate, habit_id: &str) -> bool {
        self.is_complete_key(&date_key(date), habit_id)
    }

    pub fn is_complete_key(&self, key: &str, habit_id: &str) -> bool {
        self.days
            .get(key)
            .and_then(|marks| marks.get(habit_id))
            .is_some_and(|mark| mark.done)
    }

    /// Returns whether the stored value changed.
    pub fn set_complete(&mut self, date: NaiveDate, habit_id: &str, done: bool) -> bool {
        let key = date_key(date);
        if self.is_complete_key(&key, habit_id) == done {
            return false;
        }
        self.insert(key, habit_id.to_string(), Completion { done });
        true
    }

    /// Flips the mark and returns the new value.
    pub fn toggle(&mut self, date: NaiveDate, habit_id: &str) -> bool {
        let done = !self.is_complete(date, habit_id);
        self.set_complete(date, habit_id, done);
        done
    }

    /// Marks every day of `to` that was complete on the same day number of `from`,
    /// up to the shorter month. Never clears a mark. Returns how many marks changed.
    pub fn copy_forward<'a>(
        &mut self,
        from: YearMonth,
        to: YearMonth,
        habit_ids: impl IntoIterator<Item = &'a str> + Clone,
    ) -> usize {
        let shared_days = from.days().min(to.days());
        let mut changed = 0;
        for day in 1..=shared_days {
            let (Some(source), Some(target)) = (from.date(day), to.date(day)) else {
                continue;
            };
            for habit_id in habit_ids.clone() {
                if self.is_complete(source, habit_id) && self.set_complete(target, habit_id, true) {
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Days of `month` on which `habit_id` is done.
    pub fn count_in_month(&self, month: YearMonth, habit_id: &str) -> u32 {
        month
            .dates()
            .filter(|date| self.is_complete(*date, habit_id))
            .count() as u32
    }

    /// Stored records, including cleared ones.
    pub fn len(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, bool)> {
        self.days.iter().flat_map(|(key, marks)| {
            marks
                .iter()
                .map(move |(habit_id, mark)| (key.as_str(), habit_id.as_str(), mark.done))
        })
    }

    /// Raw write used when loading stored state.
    pub(crate) fn insert(&mut self, key: String, habit_id: String, mark: Completion) {
        self.days.entry(key).or_default().insert(habit_id, mark);
    }
}

//! Lenient reading of stored tracker documents.
//!
//! Stored state may come from older builds or sibling apps. Whatever shape it has,
//! loading produces a valid [`TrackerData`] and never fails.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

use crate::calendar::date_key;
use crate::models::{Completion, Habit, TrackerData};
use crate::registry::{GoalDays, HabitRegistry};
use crate::store::CompletionMap;

pub fn normalize(value: Value) -> TrackerData {
    let Value::Object(mut root) = value else {
        warn!("stored tracker state is not an object, starting empty");
        return TrackerData::default();
    };

    let habits: Vec<Habit> = match root.remove("habits") {
        Some(Value::Array(entries)) => entries.into_iter().filter_map(normalize_habit).collect(),
        Some(_) => {
            warn!("stored habits are not a list, ignoring them");
            Vec::new()
        }
        None => Vec::new(),
    };

    let completions = match root.remove("completions") {
        Some(Value::Object(days)) => normalize_completions(days),
        Some(_) => {
            warn!("stored completions are not a map, ignoring them");
            CompletionMap::default()
        }
        None => CompletionMap::default(),
    };

    TrackerData {
        habits: HabitRegistry::from_habits(habits),
        completions,
    }
}

fn normalize_habit(entry: Value) -> Option<Habit> {
    let Value::Object(fields) = entry else {
        warn!("dropping stored habit that is not an object");
        return None;
    };

    let name = ["name", "title"]
        .iter()
        .filter_map(|field| fields.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|name| !name.is_empty());
    let Some(name) = name else {
        warn!("dropping stored habit without a name");
        return None;
    };

    let id = match fields.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };

    Some(Habit {
        id,
        name: name.to_string(),
        icon: fields
            .get("icon")
            .and_then(Value::as_str)
            .map(|icon| icon.trim().to_string())
            .unwrap_or_default(),
        goal_days: GoalDays::from_value(fields.get("goalDays")).get(),
    })
}

fn normalize_completions(days: Map<String, Value>) -> CompletionMap {
    let mut completions = CompletionMap::default();
    for (raw_key, marks) in days {
        let Value::Object(marks) = marks else {
            warn!(key = %raw_key, "dropping stored day that is not a map");
            continue;
        };
        let key = canonical_key(&raw_key);
        for (habit_id, mark) in marks {
            let done = match &mark {
                Value::Object(fields) => fields.get("done").is_some_and(truthy),
                Value::Bool(_) | Value::Number(_) => truthy(&mark),
                _ => {
                    warn!(key = %raw_key, habit = %habit_id, "dropping unreadable completion mark");
                    continue;
                }
            };
            // Two spellings of one day may collide; a done mark wins.
            if done || !completions.is_complete_key(&key, &habit_id) {
                completions.insert(key.clone(), habit_id, Completion { done });
            }
        }
    }
    completions
}

/// Rewrites `2024-3-7` as `2024-03-07`. Keys that are not dates are kept as they are.
fn canonical_key(raw: &str) -> String {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(date_key)
        .unwrap_or_else(|_| raw.to_string())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn non_object_documents_load_empty() {
        for value in [json!(42), json!("hours"), json!([1, 2]), json!(null)] {
            assert_eq!(normalize(value), TrackerData::default());
        }
    }

    #[test]
    fn wrong_typed_sections_load_empty() {
        let data = normalize(json!({ "habits": { "a": 1 }, "completions": [1, 2] }));
        assert!(data.habits.is_empty());
        assert!(data.completions.is_empty());
    }

    #[test]
    fn current_layout_loads_as_is() {
        let data = normalize(json!({
            "habits": [{ "id": "h1", "name": "Read", "icon": "📚", "goalDays": 20 }],
            "completions": { "2024-03-01": { "h1": { "done": true } } }
        }));
        let habit = data.habits.get("h1").unwrap();
        assert_eq!(
            (habit.name.as_str(), habit.icon.as_str(), habit.goal_days),
            ("Read", "📚", 20)
        );
        assert!(data.completions.is_complete(ymd(2024, 3, 1), "h1"));
    }

    #[test]
    fn legacy_habit_fields_are_coerced() {
        let data = normalize(json!({
            "habits": [
                { "id": 1700000000000u64, "title": "Stretch", "goalDays": "abc" },
                { "name": "Walk", "icon": 7, "goalDays": "14" },
                { "id": "x", "name": "   " },
                "not a habit",
                { "id": "dup", "name": "First" },
                { "id": "dup", "name": "Second", "goalDays": 0 }
            ]
        }));

        let habits = data.habits.list();
        assert_eq!(habits.len(), 3);
        assert_eq!(habits[0].id, "1700000000000");
        assert_eq!((habits[0].name.as_str(), habits[0].goal_days), ("Stretch", 30));
        assert!(!habits[1].id.is_empty());
        assert_eq!((habits[1].icon.as_str(), habits[1].goal_days), ("", 14));
        assert_eq!(habits[2].name, "First");
    }

    #[test]
    fn legacy_marks_are_migrated() {
        let data = normalize(json!({
            "habits": [],
            "completions": {
                "2024-03-01": {
                    "a": true,
                    "b": 1,
                    "c": { "done": 0 },
                    "d": "yes",
                    "e": { "done": "x" }
                },
                "2024-03-02": 5
            }
        }));
        let day = ymd(2024, 3, 1);
        assert!(data.completions.is_complete(day, "a"));
        assert!(data.completions.is_complete(day, "b"));
        assert!(!data.completions.is_complete(day, "c"));
        assert!(!data.completions.is_complete(day, "d"));
        assert!(data.completions.is_complete(day, "e"));
        assert_eq!(data.completions.len(), 4);
    }

    #[test]
    fn unpadded_keys_are_canonicalised() {
        let data = normalize(json!({
            "completions": {
                "2024-3-7": { "a": { "done": true } },
                "2024-03-07": { "a": { "done": false }, "b": { "done": false } },
                "someday": { "a": { "done": true } }
            }
        }));
        assert!(data.completions.is_complete(ymd(2024, 3, 7), "a"));
        assert!(data.completions.is_complete_key("someday", "a"));
        assert_eq!(data.completions.len(), 3);
    }
}

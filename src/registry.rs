use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::errors::Rejection;
use crate::models::Habit;

pub const DEFAULT_GOAL_DAYS: u32 = 30;

/// Target number of days for a habit. Always positive.
///
/// Anything that does not read as a positive number becomes
/// [`DEFAULT_GOAL_DAYS`]; fractional values are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalDays(u32);

impl GoalDays {
    pub fn new(days: u32) -> Self {
        if days == 0 { Self::default() } else { Self(days) }
    }

    /// Form input, e.g. `"21"`, `" 7 "`, `"2.5"`. Unparseable text gives the default.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(days) = raw.parse::<u32>() {
            return Self::new(days);
        }
        raw.parse::<f64>()
            .map(Self::from_float)
            .unwrap_or_default()
    }

    /// A stored `goalDays` value of any JSON type.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(number)) => match number.as_u64() {
                Some(days) => u32::try_from(days).map(Self::new).unwrap_or_default(),
                None => number.as_f64().map(Self::from_float).unwrap_or_default(),
            },
            Some(Value::String(raw)) => Self::parse(raw),
            _ => Self::default(),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    fn from_float(value: f64) -> Self {
        if value.is_finite() && value >= 1.0 && value <= f64::from(u32::MAX) {
            Self(value.trunc() as u32)
        } else {
            Self::default()
        }
    }
}

impl Default for GoalDays {
    fn default() -> Self {
        Self(DEFAULT_GOAL_DAYS)
    }
}

impl From<u32> for GoalDays {
    fn from(days: u32) -> Self {
        Self::new(days)
    }
}

/// Fields to replace on an existing habit. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct HabitUpdate {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub goal_days: Option<GoalDays>,
}

impl HabitUpdate {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn goal_days(mut self, goal_days: GoalDays) -> Self {
        self.goal_days = Some(goal_days);
        self
    }
}

/// Habit definitions in insertion order. Ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HabitRegistry {
    habits: Vec<Habit>,
}

impl HabitRegistry {
    /// Builds a registry from stored habits, keeping the first habit of any
    /// duplicated id.
    pub fn from_habits(habits: impl IntoIterator<Item = Habit>) -> Self {
        let mut registry = Self::default();
        for habit in habits {
            if registry.contains(&habit.id) {
                debug!(id = %habit.id, "dropping duplicate habit id");
                continue;
            }
            registry.habits.push(habit);
        }
        registry
    }

    pub fn add(&mut self, name: &str, icon: &str, goal_days: GoalDays) -> Result<Habit, Rejection> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Rejection::EmptyName);
        }

        let habit = Habit {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            icon: icon.trim().to_string(),
            goal_days: goal_days.get(),
        };
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Returns `Ok(false)` when no habit has `id`.
    pub fn update(&mut self, id: &str, update: HabitUpdate) -> Result<bool, Rejection> {
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == id) else {
            return Ok(false);
        };

        let name = match update.name {
            Some(name) if name.trim().is_empty() => return Err(Rejection::EmptyName),
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };

        if let Some(name) = name {
            habit.name = name;
        }
        if let Some(icon) = update.icon {
            habit.icon = icon.trim().to_string();
        }
        if let Some(goal_days) = update.goal_days {
            habit.goal_days = goal_days.get();
        }
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> Option<Habit> {
        let index = self.habits.iter().position(|habit| habit.id == id)?;
        Some(self.habits.remove(index))
    }

    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn goal_days_falls_back_to_thirty() {
        assert_eq!(GoalDays::parse("abc").get(), 30);
        assert_eq!(GoalDays::parse("").get(), 30);
        assert_eq!(GoalDays::parse("0").get(), 30);
        assert_eq!(GoalDays::parse("-5").get(), 30);
        assert_eq!(GoalDays::parse("0.5").get(), 30);
        assert_eq!(GoalDays::parse("NaN").get(), 30);
        assert_eq!(GoalDays::parse(" 7 ").get(), 7);
        assert_eq!(GoalDays::parse("2.5").get(), 2);
        assert_eq!(GoalDays::new(0).get(), 30);
    }

    #[test]
    fn goal_days_reads_any_stored_shape() {
        assert_eq!(GoalDays::from_value(Some(&json!(21))).get(), 21);
        assert_eq!(GoalDays::from_value(Some(&json!("14"))).get(), 14);
        assert_eq!(GoalDays::from_value(Some(&json!(10.9))).get(), 10);
        assert_eq!(GoalDays::from_value(Some(&json!(-3))).get(), 30);
        assert_eq!(GoalDays::from_value(Some(&json!(null))).get(), 30);
        assert_eq!(GoalDays::from_value(Some(&json!(true))).get(), 30);
        assert_eq!(GoalDays::from_value(Some(&json!(u64::MAX))).get(), 30);
        assert_eq!(GoalDays::from_value(None).get(), 30);
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut registry = HabitRegistry::default();
        assert_eq!(registry.add("", "🔥", GoalDays::new(30)), Err(Rejection::EmptyName));
        assert_eq!(registry.add("   ", "", GoalDays::default()), Err(Rejection::EmptyName));
        assert!(registry.is_empty());
    }

    #[test]
    fn add_trims_and_generates_unique_ids() {
        let mut registry = HabitRegistry::default();
        let walk = registry.add("  Walk ", " 🚶 ", GoalDays::parse("abc")).unwrap();
        let read = registry.add("Read", "", GoalDays::new(12)).unwrap();

        assert_eq!(walk.name, "Walk");
        assert_eq!(walk.icon, "🚶");
        assert_eq!(walk.goal_days, 30);
        assert_eq!(read.goal_days, 12);
        assert_ne!(walk.id, read.id);
        let names: Vec<_> = registry.list().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Walk", "Read"]);
    }

    #[test]
    fn update_replaces_only_given_fields() {
        let mut registry = HabitRegistry::default();
        let habit = registry.add("Walk", "🚶", GoalDays::new(20)).unwrap();

        let updated = registry
            .update(&habit.id, HabitUpdate::default().goal_days(GoalDays::new(25)))
            .unwrap();
        assert!(updated);

        let stored = registry.get(&habit.id).unwrap();
        assert_eq!(stored.id, habit.id);
        assert_eq!(stored.name, "Walk");
        assert_eq!(stored.icon, "🚶");
        assert_eq!(stored.goal_days, 25);
    }

    #[test]
    fn update_of_unknown_id_is_a_no_op() {
        let mut registry = HabitRegistry::default();
        registry.add("Walk", "", GoalDays::default()).unwrap();
        let before = registry.clone();

        assert_eq!(registry.update("missing", HabitUpdate::default().name("Run")), Ok(false));
        assert_eq!(registry, before);
    }

    #[test]
    fn update_rejects_blank_name() {
        let mut registry = HabitRegistry::default();
        let habit = registry.add("Walk", "", GoalDays::default()).unwrap();
        let result = registry.update(&habit.id, HabitUpdate::default().name(" ").icon("x"));
        assert_eq!(result, Err(Rejection::EmptyName));
        assert_eq!(registry.get(&habit.id).unwrap().icon, "");
    }

    #[test]
    fn delete_keeps_order_of_the_rest() {
        let mut registry = HabitRegistry::default();
        let a = registry.add("A", "", GoalDays::default()).unwrap();
        let b = registry.add("B", "", GoalDays::default()).unwrap();
        let c = registry.add("C", "", GoalDays::default()).unwrap();

        assert_eq!(registry.delete(&b.id).map(|h| h.name), Some("B".to_string()));
        assert!(registry.delete(&b.id).is_none());
        let ids: Vec<_> = registry.list().iter().map(|h| h.id.clone()).collect();
        assert_eq!(ids, [a.id, c.id]);
    }

    #[test]
    fn from_habits_keeps_first_duplicate() {
        let habit = |id: &str, name: &str| Habit {
            id: id.to_string(),
            name: name.to_string(),
            icon: String::new(),
            goal_days: 30,
        };
        let registry = HabitRegistry::from_habits([
            habit("1", "First"),
            habit("1", "Second"),
            habit("2", "Other"),
        ]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("1").unwrap().name, "First");
    }
}

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{HabitError, Result};
use crate::habit::{Habit, HabitDetails};

/// Authoritative, ordered collection of habits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HabitStore {
    habits: Vec<Habit>,
}

/// Completion state of a habit after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub habit_id: String,
    pub name: String,
    pub date: NaiveDate,
    pub completed: bool,
}

impl HabitStore {
    /// Build a store from an external collection, rejecting empty names and
    /// duplicate ids.
    pub fn from_habits(habits: Vec<Habit>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for habit in &habits {
            if habit.name.trim().is_empty() {
                return Err(HabitError::EmptyName {
                    id: habit.id.clone(),
                });
            }
            if !seen.insert(habit.id.as_str()) {
                return Err(HabitError::DuplicateId(habit.id.clone()));
            }
        }
        Ok(Self { habits })
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn len(&self) -> usize {
        self.habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty()
    }

    pub fn get(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == habit_id)
    }

    pub fn details(&self, habit_id: &str) -> Option<HabitDetails> {
        self.get(habit_id).map(Habit::details)
    }

    /// Flip completion of `date` for the habit. Unknown ids are ignored and
    /// yield `None`; otherwise the returned outcome reflects membership after
    /// the mutation.
    pub fn toggle(&mut self, habit_id: &str, date: NaiveDate) -> Option<ToggleOutcome> {
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == habit_id) else {
            debug!(habit_id, "toggle ignored for unknown habit");
            return None;
        };
        let completed = habit.toggle(date);
        debug!(habit_id, %date, completed, "toggled habit completion");
        Some(ToggleOutcome {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            date,
            completed,
        })
    }

    /// Delete the habit entirely, returning it so callers can still refer to
    /// its name.
    pub fn remove(&mut self, habit_id: &str) -> Option<Habit> {
        let Some(index) = self.habits.iter().position(|habit| habit.id == habit_id) else {
            debug!(habit_id, "remove ignored for unknown habit");
            return None;
        };
        Some(self.habits.remove(index))
    }
}

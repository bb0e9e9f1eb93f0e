use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    error::Result,
    habit::{Habit, HabitDetails},
    notifications::{NotificationRequest, NotificationSink},
    projection::{self, HabitRow, ViewParams},
    reminders,
    store::{HabitStore, ToggleOutcome},
};

/// Result of one recomputation pass over the list view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ListSnapshot {
    pub rows: Vec<HabitRow>,
    pub reminders_sent: usize,
}

pub struct HabitTracker {
    store: RwLock<HabitStore>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

pub struct HabitTrackerBuilder {
    habits: Vec<Habit>,
    notification_sink: Option<Box<dyn NotificationSink>>,
}

impl HabitTrackerBuilder {
    pub fn new() -> Self {
        Self {
            habits: Vec::new(),
            notification_sink: None,
        }
    }

    pub fn add_habit(mut self, habit: Habit) -> Self {
        self.habits.push(habit);
        self
    }

    pub fn with_habits(mut self, habits: impl IntoIterator<Item = Habit>) -> Self {
        self.habits.extend(habits);
        self
    }

    pub fn with_notification_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.notification_sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<HabitTracker> {
        let store = HabitStore::from_habits(self.habits)?;
        info!(
            habit_count = store.len(),
            notifications = self.notification_sink.is_some(),
            "habit tracker ready"
        );
        Ok(HabitTracker {
            store: RwLock::new(store),
            notification_sink: self.notification_sink,
        })
    }
}

impl Default for HabitTrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitTracker {
    pub fn builder() -> HabitTrackerBuilder {
        HabitTrackerBuilder::new()
    }

    /// Immutable copy of the collection in its current order.
    pub fn snapshot(&self) -> Vec<Habit> {
        self.store.read().habits().to_vec()
    }

    pub fn len(&self) -> usize {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn get(&self, habit_id: &str) -> Option<Habit> {
        self.store.read().get(habit_id).cloned()
    }

    pub fn details(&self, habit_id: &str) -> Option<HabitDetails> {
        self.store.read().details(habit_id)
    }

    /// Toggle completion of `date` and announce the resulting state.
    #[instrument(skip(self))]
    pub fn toggle(&self, habit_id: &str, date: NaiveDate) -> Option<ToggleOutcome> {
        let outcome = self.store.write().toggle(habit_id, date)?;
        self.send(reminders::toggle_announcement(&outcome));
        Some(outcome)
    }

    /// Delete a habit and announce the removal under its former name.
    #[instrument(skip(self))]
    pub fn remove(&self, habit_id: &str) -> Option<Habit> {
        let removed = self.store.write().remove(habit_id)?;
        info!(habit_id, name = %removed.name, "removed habit");
        self.send(reminders::removal_announcement(&removed.name));
        Some(removed)
    }

    pub fn project(&self, params: &ViewParams) -> Vec<Habit> {
        let store = self.store.read();
        projection::project(store.habits(), params)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn rows(&self, params: &ViewParams, today: NaiveDate) -> Vec<HabitRow> {
        projection::project_rows(self.store.read().habits(), params, today)
    }

    /// One full pass: project, compute rows, then remind about every shown
    /// habit that is still open today.
    pub fn refresh(&self, params: &ViewParams, today: NaiveDate) -> ListSnapshot {
        let projected = self.project(params);
        let rows = projected
            .iter()
            .map(|habit| HabitRow::from_habit(habit, today))
            .collect();
        let reminders_sent = match &self.notification_sink {
            Some(sink) => reminders::dispatch_reminders(&projected, today, &**sink),
            None => 0,
        };
        ListSnapshot {
            rows,
            reminders_sent,
        }
    }

    fn send(&self, notification: NotificationRequest) {
        if let Some(sink) = &self.notification_sink {
            sink.notify(notification);
        }
    }
}

pub mod error;
pub mod habit;
pub mod notifications;
pub mod projection;
pub mod reminders;
pub mod service;
pub mod store;
pub mod streak;

pub use crate::error::{HabitError, Result};
pub use crate::habit::{Frequency, Habit, HabitDetails};
pub use crate::projection::{FrequencyFilter, HabitRow, SortKey, ViewParams};
pub use crate::service::{HabitTracker, HabitTrackerBuilder, ListSnapshot};

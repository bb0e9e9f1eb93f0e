use chrono::NaiveDate;
use tracing::debug;

use crate::habit::Habit;
use crate::notifications::{NotificationRequest, NotificationSink};
use crate::store::ToggleOutcome;

pub const REMINDER_TITLE: &str = "Habit Reminder";
pub const COMPLETED_TITLE: &str = "Habit Completed";
pub const INCOMPLETE_TITLE: &str = "Habit Incomplete";
pub const REMOVED_TITLE: &str = "Habit Removed";

pub fn reminder_for(habit: &Habit) -> NotificationRequest {
    NotificationRequest::new(
        REMINDER_TITLE,
        format!("Don't forget to complete your habit: {}", habit.name),
    )
}

pub fn toggle_announcement(outcome: &ToggleOutcome) -> NotificationRequest {
    if outcome.completed {
        NotificationRequest::new(
            COMPLETED_TITLE,
            format!("Habit \"{}\" has been completed.", outcome.name),
        )
    } else {
        NotificationRequest::new(
            INCOMPLETE_TITLE,
            format!("Habit \"{}\" has been marked as incomplete.", outcome.name),
        )
    }
}

pub fn removal_announcement(name: &str) -> NotificationRequest {
    NotificationRequest::new(REMOVED_TITLE, format!("Habit \"{}\" has been removed.", name))
}

/// Remind about every projected habit that is still open on `today`.
///
/// Runs on every projection change, so an open habit is reminded again each
/// time the list is recomputed (every search keystroke included).
pub fn dispatch_reminders<'a, I>(
    projected: I,
    today: NaiveDate,
    sink: &dyn NotificationSink,
) -> usize
where
    I: IntoIterator<Item = &'a Habit>,
{
    let mut sent = 0;
    for habit in projected {
        if !habit.is_completed_on(today) {
            sink.notify(reminder_for(habit));
            sent += 1;
        }
    }
    debug!(%today, sent, "dispatched habit reminders");
    sent
}

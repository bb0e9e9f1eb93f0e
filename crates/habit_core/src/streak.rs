use chrono::NaiveDate;

use crate::habit::Habit;

/// Streak length at which the progress bar is full.
pub const PROGRESS_TARGET_DAYS: u32 = 30;

/// Consecutive completed days walking backward from `today`.
///
/// Returns 0 when `today` itself is not completed. The walk can visit at most
/// as many days as there are completed dates, so it always terminates.
pub fn streak(habit: &Habit, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !habit.completed_dates.contains(&day) {
            break;
        }
        count += 1;
        cursor = day.pred_opt();
    }
    count
}

/// Percent of the progress bar filled for a streak, capped at 100.
pub fn progress_percent(streak: u32) -> f64 {
    (f64::from(streak) / f64::from(PROGRESS_TARGET_DAYS)).min(1.0) * 100.0
}

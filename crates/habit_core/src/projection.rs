use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HabitError, Result};
use crate::habit::{Frequency, Habit};
use crate::streak::{progress_percent, streak};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Frequency,
}

impl FromStr for SortKey {
    type Err = HabitError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "frequency" => Ok(SortKey::Frequency),
            _ => Err(HabitError::InvalidSortKey(value.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => f.write_str("name"),
            SortKey::Frequency => f.write_str("frequency"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyFilter {
    #[default]
    All,
    Daily,
    Weekly,
}

impl FrequencyFilter {
    pub fn matches(&self, frequency: Frequency) -> bool {
        match self {
            FrequencyFilter::All => true,
            FrequencyFilter::Daily => frequency == Frequency::Daily,
            FrequencyFilter::Weekly => frequency == Frequency::Weekly,
        }
    }
}

impl FromStr for FrequencyFilter {
    type Err = HabitError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FrequencyFilter::All),
            "daily" => Ok(FrequencyFilter::Daily),
            "weekly" => Ok(FrequencyFilter::Weekly),
            _ => Err(HabitError::InvalidFrequencyFilter(value.to_string())),
        }
    }
}

impl fmt::Display for FrequencyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyFilter::All => f.write_str("all"),
            FrequencyFilter::Daily => f.write_str("daily"),
            FrequencyFilter::Weekly => f.write_str("weekly"),
        }
    }
}

/// User-chosen search, sort and filter inputs of the list view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewParams {
    pub search_term: String,
    pub sort_by: SortKey,
    pub filter_frequency: FrequencyFilter,
}

impl ViewParams {
    pub fn new(
        search_term: impl Into<String>,
        sort_by: SortKey,
        filter_frequency: FrequencyFilter,
    ) -> Self {
        Self {
            search_term: search_term.into(),
            sort_by,
            filter_frequency,
        }
    }
}

/// One rendered line of the habit list.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HabitRow {
    pub id: String,
    pub name: String,
    pub frequency: Frequency,
    pub frequency_label: &'static str,
    pub streak: u32,
    pub progress: f64,
    pub completed_today: bool,
}

impl HabitRow {
    pub fn from_habit(habit: &Habit, today: NaiveDate) -> Self {
        let streak = streak(habit, today);
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            frequency: habit.frequency,
            frequency_label: habit.frequency.label(),
            streak,
            progress: progress_percent(streak),
            completed_today: habit.is_completed_on(today),
        }
    }
}

/// Filter by name, then by frequency, then sort by the chosen key.
///
/// The sort is stable: habits with equal keys keep their collection order.
pub fn project<'a>(habits: &'a [Habit], params: &ViewParams) -> Vec<&'a Habit> {
    let needle = params.search_term.to_lowercase();
    let mut projected: Vec<&Habit> = habits
        .iter()
        .filter(|habit| habit.name.to_lowercase().contains(&needle))
        .filter(|habit| params.filter_frequency.matches(habit.frequency))
        .collect();

    match params.sort_by {
        SortKey::Name => projected.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortKey::Frequency => {
            projected.sort_by(|a, b| locale_cmp(a.frequency.as_str(), b.frequency.as_str()))
        }
    }

    debug!(
        total = habits.len(),
        shown = projected.len(),
        sort_by = %params.sort_by,
        filter = %params.filter_frequency,
        "projected habit list"
    );
    projected
}

pub fn project_rows(habits: &[Habit], params: &ViewParams, today: NaiveDate) -> Vec<HabitRow> {
    project(habits, params)
        .into_iter()
        .map(|habit| HabitRow::from_habit(habit, today))
        .collect()
}

/// Case-insensitive first, lowercase before uppercase on ties, then raw
/// code points. `"apple"` sorts before `"Zebra"` and `"a"` before `"A"`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

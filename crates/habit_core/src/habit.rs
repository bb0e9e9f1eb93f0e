use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HabitError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub frequency: Frequency,
    #[serde(default)]
    pub completed_dates: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }

    /// Capitalized form shown next to a habit's name.
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = HabitError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            _ => Err(HabitError::InvalidFrequency(value.to_string())),
        }
    }
}

impl Habit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            frequency,
            completed_dates: BTreeSet::new(),
        }
    }

    pub fn with_completed_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.completed_dates.extend(dates);
        self
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Flips membership of `date` and returns whether the habit is completed
    /// on that date afterwards.
    pub(crate) fn toggle(&mut self, date: NaiveDate) -> bool {
        if self.completed_dates.remove(&date) {
            false
        } else {
            self.completed_dates.insert(date);
            true
        }
    }

    pub fn details(&self) -> HabitDetails {
        HabitDetails {
            id: self.id.clone(),
            name: self.name.clone(),
            frequency: self.frequency,
            completed_dates: self.completed_dates.iter().copied().collect(),
        }
    }
}

/// Everything the details dialog shows for a single habit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitDetails {
    pub id: String,
    pub name: String,
    pub frequency: Frequency,
    pub completed_dates: Vec<NaiveDate>,
}

impl HabitDetails {
    pub fn formatted_dates(&self) -> Vec<String> {
        self.completed_dates.iter().map(|date| format_date(*date)).collect()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| HabitError::InvalidDate(value.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Decode a JSON array of habits as handed over by the external state container.
pub fn habits_from_json(raw: &str) -> Result<Vec<Habit>> {
    Ok(serde_json::from_str(raw)?)
}

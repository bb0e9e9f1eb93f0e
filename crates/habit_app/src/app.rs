use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use habit_core::{
    habit::{habits_from_json, parse_date},
    notifications::{
        NotificationBackend, NotificationRequest, NotificationSink, PermissionGatedSink,
        PermissionState, RecordingSink,
    },
    HabitDetails, HabitRow, HabitTracker, ViewParams,
};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub seed_path: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub view: ViewParams,
    pub notification_permission: PermissionState,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparseable values are logged and
    /// the default kept.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup("HABIT_SEED") {
            if !path.trim().is_empty() {
                config.seed_path = Some(PathBuf::from(path));
            }
        }
        if let Some(value) = lookup("HABIT_TODAY") {
            match parse_date(&value) {
                Ok(date) => config.today = Some(date),
                Err(err) => warn!(%err, "ignoring HABIT_TODAY"),
            }
        }
        if let Some(term) = lookup("HABIT_SEARCH") {
            config.view.search_term = term;
        }
        if let Some(value) = lookup("HABIT_SORT") {
            match value.parse() {
                Ok(sort_by) => config.view.sort_by = sort_by,
                Err(err) => warn!(%err, "ignoring HABIT_SORT"),
            }
        }
        if let Some(value) = lookup("HABIT_FILTER") {
            match value.parse() {
                Ok(filter) => config.view.filter_frequency = filter,
                Err(err) => warn!(%err, "ignoring HABIT_FILTER"),
            }
        }
        if let Some(value) = lookup("HABIT_NOTIFICATIONS") {
            match value.parse() {
                Ok(permission) => config.notification_permission = permission,
                Err(err) => warn!(%err, "ignoring HABIT_NOTIFICATIONS"),
            }
        }
        config
    }

    /// The configured date, or the local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn load_seed(&self) -> Result<Vec<habit_core::Habit>> {
        let Some(path) = &self.seed_path else {
            return Ok(Vec::new());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read habit seed {}", path.display()))?;
        let habits = habits_from_json(&raw)
            .with_context(|| format!("failed to decode habit seed {}", path.display()))?;
        info!(path = %path.display(), count = habits.len(), "loaded habit seed");
        Ok(habits)
    }
}

/// Notification backend for a headless session: there is nobody to prompt,
/// so an undecided permission is granted on first use. Delivered requests are
/// logged and kept in the outbox.
pub struct SessionBackend {
    permission: Mutex<PermissionState>,
    outbox: Arc<RecordingSink>,
}

impl SessionBackend {
    pub fn new(permission: PermissionState, outbox: Arc<RecordingSink>) -> Self {
        Self {
            permission: Mutex::new(permission),
            outbox,
        }
    }
}

impl NotificationBackend for SessionBackend {
    fn permission(&self) -> PermissionState {
        *self.permission.lock()
    }

    fn request_permission(&self) -> PermissionState {
        let mut permission = self.permission.lock();
        if *permission == PermissionState::Default {
            info!("granting notification permission for headless session");
            *permission = PermissionState::Granted;
        }
        *permission
    }

    fn deliver(&self, notification: NotificationRequest) {
        info!(title = %notification.title, body = %notification.body, "notification");
        self.outbox.notify(notification);
    }
}

/// Headless list screen: owns the tracker and the user's view state, and runs
/// one recomputation pass after every change to the collection, the view
/// parameters or the date.
pub struct HabitListController {
    tracker: HabitTracker,
    params: ViewParams,
    today: NaiveDate,
    selected: Option<String>,
    rows: Vec<HabitRow>,
}

impl HabitListController {
    pub fn new(tracker: HabitTracker, params: ViewParams, today: NaiveDate) -> Self {
        let mut controller = Self {
            tracker,
            params,
            today,
            selected: None,
            rows: Vec::new(),
        };
        controller.recompute();
        controller
    }

    pub fn from_config(config: &AppConfig, sink: Box<dyn NotificationSink>) -> Result<Self> {
        let tracker = HabitTracker::builder()
            .with_habits(config.load_seed()?)
            .with_notification_sink(sink)
            .build()
            .context("failed to initialize habit tracker")?;
        Ok(Self::new(tracker, config.view.clone(), config.today()))
    }

    pub fn rows(&self) -> &[HabitRow] {
        &self.rows
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn tracker(&self) -> &HabitTracker {
        &self.tracker
    }

    /// Setting a value equal to the current one is not a change and does not
    /// recompute.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.params.search_term == term {
            return;
        }
        self.params.search_term = term;
        self.recompute();
    }

    pub fn set_sort_by(&mut self, sort_by: habit_core::SortKey) {
        if self.params.sort_by == sort_by {
            return;
        }
        self.params.sort_by = sort_by;
        self.recompute();
    }

    pub fn set_filter_frequency(&mut self, filter: habit_core::FrequencyFilter) {
        if self.params.filter_frequency == filter {
            return;
        }
        self.params.filter_frequency = filter;
        self.recompute();
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        if self.today == today {
            return;
        }
        self.today = today;
        self.recompute();
    }

    /// Toggle today's completion. Returns the new state, or `None` for an
    /// unknown habit, in which case nothing is recomputed.
    pub fn toggle(&mut self, habit_id: &str) -> Option<bool> {
        let outcome = self.tracker.toggle(habit_id, self.today)?;
        self.recompute();
        Some(outcome.completed)
    }

    pub fn remove(&mut self, habit_id: &str) -> bool {
        if self.tracker.remove(habit_id).is_none() {
            return false;
        }
        if self.selected.as_deref() == Some(habit_id) {
            self.selected = None;
        }
        self.recompute();
        true
    }

    pub fn open_details(&mut self, habit_id: &str) -> Option<HabitDetails> {
        let details = self.tracker.details(habit_id)?;
        self.selected = Some(habit_id.to_string());
        Some(details)
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    /// Details of the habit whose dialog is open, read fresh from the tracker.
    pub fn selected_details(&self) -> Option<HabitDetails> {
        self.selected
            .as_deref()
            .and_then(|habit_id| self.tracker.details(habit_id))
    }

    fn recompute(&mut self) {
        let snapshot = self.tracker.refresh(&self.params, self.today);
        debug!(
            shown = snapshot.rows.len(),
            reminders = snapshot.reminders_sent,
            search = %self.params.search_term,
            "recomputed habit list"
        );
        self.rows = snapshot.rows;
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    info!(today = %config.today(), "starting habit session");
    let outbox = Arc::new(RecordingSink::new());
    let sink = PermissionGatedSink::new(SessionBackend::new(
        config.notification_permission,
        Arc::clone(&outbox),
    ));
    let controller = HabitListController::from_config(&config, Box::new(sink))?;

    for row in controller.rows() {
        info!(
            name = %row.name,
            frequency = row.frequency_label,
            streak = row.streak,
            progress = row.progress,
            completed_today = row.completed_today,
            "habit"
        );
    }
    info!(
        shown = controller.rows().len(),
        total = controller.tracker().len(),
        notifications = outbox.len(),
        "habit session finished"
    );
    Ok(())
}

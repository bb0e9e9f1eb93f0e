use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use habit_app::{AppConfig, HabitListController};
use habit_core::{notifications::RecordingSink, Frequency, FrequencyFilter, Habit, SortKey};
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_controller() -> (HabitListController, Arc<RecordingSink>) {
    let temp = tempdir().expect("tempdir");
    let seed = temp.path().join("habits.json");
    let habits = vec![
        Habit::new("read", "Read", Frequency::Daily).with_completed_dates([
            date(2024, 1, 1),
            date(2024, 1, 2),
            date(2024, 1, 3),
        ]),
        Habit::new("swim", "Swim", Frequency::Weekly),
        Habit::new("walk", "Walk", Frequency::Daily),
    ];
    fs::write(&seed, serde_json::to_string(&habits).expect("encode seed")).expect("write seed");

    let config = AppConfig {
        seed_path: Some(seed),
        today: Some(date(2024, 1, 3)),
        ..AppConfig::default()
    };
    let sink = Arc::new(RecordingSink::new());
    let controller =
        HabitListController::from_config(&config, Box::new(sink.clone())).expect("controller");
    (controller, sink)
}

fn shown(controller: &HabitListController) -> Vec<String> {
    controller.rows().iter().map(|row| row.name.clone()).collect()
}

#[test]
fn every_view_change_recomputes_and_reminds() {
    let (mut controller, sink) = seeded_controller();
    assert_eq!(shown(&controller), vec!["Read", "Swim", "Walk"]);
    // Swim and Walk are still open today.
    assert_eq!(sink.take().len(), 2);

    controller.set_search_term("w");
    assert_eq!(shown(&controller), vec!["Swim", "Walk"]);
    assert_eq!(sink.take().len(), 2);

    controller.set_filter_frequency(FrequencyFilter::Daily);
    assert_eq!(shown(&controller), vec!["Walk"]);
    assert_eq!(sink.take().len(), 1);

    controller.set_search_term("");
    controller.set_filter_frequency(FrequencyFilter::All);
    controller.set_sort_by(SortKey::Frequency);
    assert_eq!(shown(&controller), vec!["Read", "Walk", "Swim"]);
}

#[test]
fn unchanged_view_settings_do_not_remind_again() {
    let (mut controller, sink) = seeded_controller();
    sink.take();
    let today = controller.today();

    controller.set_search_term("");
    controller.set_sort_by(SortKey::Name);
    controller.set_filter_frequency(FrequencyFilter::All);
    controller.set_today(today);
    assert!(sink.is_empty());

    controller.set_search_term("s");
    assert_eq!(sink.take().len(), 1);
    controller.set_search_term("s");
    assert!(sink.is_empty());
}

#[test]
fn toggle_and_remove_announce_then_refresh() {
    let (mut controller, sink) = seeded_controller();
    sink.take();

    assert_eq!(controller.toggle("walk"), Some(true));
    let delivered = sink.take();
    assert_eq!(delivered[0].title, "Habit Completed");
    assert_eq!(delivered[0].body, "Habit \"Walk\" has been completed.");
    // Only Swim is left to remind about after the refresh.
    assert_eq!(delivered.len(), 2);
    let walk = controller.rows().iter().find(|row| row.id == "walk").unwrap();
    assert!(walk.completed_today);
    assert_eq!(walk.streak, 1);

    assert_eq!(controller.toggle("missing"), None);
    assert!(sink.is_empty());

    controller.open_details("swim").expect("details");
    assert!(controller.remove("swim"));
    assert!(controller.selected_details().is_none());
    let delivered = sink.take();
    assert_eq!(delivered[0].title, "Habit Removed");
    assert_eq!(delivered[0].body, "Habit \"Swim\" has been removed.");
    assert!(!shown(&controller).contains(&"Swim".to_string()));
    assert!(!controller.remove("swim"));
}

#[test]
fn details_follow_later_toggles_and_date_changes() {
    let (mut controller, _sink) = seeded_controller();
    let details = controller.open_details("read").expect("details");
    assert_eq!(details.formatted_dates(), vec!["2024-01-01", "2024-01-02", "2024-01-03"]);

    controller.toggle("read");
    let refreshed = controller.selected_details().expect("still open");
    assert_eq!(refreshed.formatted_dates(), vec!["2024-01-01", "2024-01-02"]);

    controller.set_today(date(2024, 1, 2));
    let read = controller.rows().iter().find(|row| row.id == "read").unwrap();
    assert_eq!(read.streak, 2);

    controller.close_details();
    assert!(controller.selected_details().is_none());
    assert_eq!(controller.today(), date(2024, 1, 2));
}

#[test]
fn missing_seed_file_is_reported() {
    let config = AppConfig {
        seed_path: Some("/nonexistent/habits.json".into()),
        ..AppConfig::default()
    };
    let err = HabitListController::from_config(&config, Box::new(RecordingSink::new()))
        .err()
        .expect("missing seed must fail");
    assert!(format!("{err:#}").contains("failed to read habit seed"));
}

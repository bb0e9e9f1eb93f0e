use chrono::{Duration, NaiveDate};
use habit_core::{
    projection::{locale_cmp, project},
    store::HabitStore,
    streak::streak,
    Frequency, FrequencyFilter, Habit, SortKey, ViewParams,
};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn frequency_strategy() -> impl Strategy<Value = Frequency> {
    prop_oneof![Just(Frequency::Daily), Just(Frequency::Weekly)]
}

fn dates_strategy() -> impl Strategy<Value = Vec<NaiveDate>> {
    prop::collection::vec(0i64..120, 0..40)
        .prop_map(|offsets| offsets.into_iter().map(|d| base_date() + Duration::days(d)).collect())
}

fn habits_strategy() -> impl Strategy<Value = Vec<Habit>> {
    prop::collection::vec(
        ("[A-Za-z ]{1,8}", frequency_strategy(), dates_strategy()),
        0..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (name, frequency, dates))| {
                Habit::new(format!("h{idx}"), name, frequency).with_completed_dates(dates)
            })
            .collect()
    })
}

fn params_strategy() -> impl Strategy<Value = ViewParams> {
    (
        "[a-zA-Z ]{0,2}",
        prop_oneof![Just(SortKey::Name), Just(SortKey::Frequency)],
        prop_oneof![
            Just(FrequencyFilter::All),
            Just(FrequencyFilter::Daily),
            Just(FrequencyFilter::Weekly)
        ],
    )
        .prop_map(|(term, sort_by, filter)| ViewParams::new(term, sort_by, filter))
}

fn position(habits: &[Habit], id: &str) -> usize {
    habits.iter().position(|habit| habit.id == id).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn toggling_twice_restores_membership(dates in dates_strategy(), offset in 0i64..120) {
        let habit = Habit::new("h", "Habit", Frequency::Daily).with_completed_dates(dates);
        let mut store = HabitStore::from_habits(vec![habit.clone()]).unwrap();
        let date = base_date() + Duration::days(offset);
        store.toggle("h", date);
        store.toggle("h", date);
        prop_assert_eq!(store.get("h").unwrap(), &habit);
    }

    #[test]
    fn projection_is_filtered_sorted_and_stable(
        habits in habits_strategy(),
        params in params_strategy(),
    ) {
        let projected = project(&habits, &params);
        let needle = params.search_term.to_lowercase();

        for habit in &projected {
            prop_assert!(habit.name.to_lowercase().contains(&needle));
            prop_assert!(params.filter_frequency.matches(habit.frequency));
        }
        let expected = habits
            .iter()
            .filter(|h| h.name.to_lowercase().contains(&needle))
            .filter(|h| params.filter_frequency.matches(h.frequency))
            .count();
        prop_assert_eq!(projected.len(), expected);

        for pair in projected.windows(2) {
            let ordering = match params.sort_by {
                SortKey::Name => locale_cmp(&pair[0].name, &pair[1].name),
                SortKey::Frequency => {
                    locale_cmp(pair[0].frequency.as_str(), pair[1].frequency.as_str())
                }
            };
            prop_assert!(ordering.is_le());
            if ordering.is_eq() {
                prop_assert!(position(&habits, &pair[0].id) < position(&habits, &pair[1].id));
            }
        }

        let again = project(&habits, &params);
        prop_assert_eq!(projected, again);
    }

    #[test]
    fn streak_recurrence_holds(dates in dates_strategy(), offset in 0i64..120) {
        let habit = Habit::new("h", "Habit", Frequency::Daily).with_completed_dates(dates);
        let today = base_date() + Duration::days(offset);
        let yesterday = today.pred_opt().unwrap();
        if habit.is_completed_on(today) {
            prop_assert_eq!(streak(&habit, today), 1 + streak(&habit, yesterday));
        } else {
            prop_assert_eq!(streak(&habit, today), 0);
        }
    }
}

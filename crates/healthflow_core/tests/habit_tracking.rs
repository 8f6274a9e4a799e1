use chrono::NaiveDate;
use healthflow_core::db::open_db_in_memory;
use healthflow_core::{
    HabitService, HabitServiceError, HabitValidationError, RecordStore, SqliteKeyValueStore,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

#[test]
fn add_validates_before_persisting() {
    let conn = open_db_in_memory().unwrap();
    let service = HabitService::new(SqliteKeyValueStore::new(&conn));

    let err = service.add_habit("   ", 3, "times", day(10)).unwrap_err();
    assert!(matches!(
        err,
        HabitServiceError::Validation(HabitValidationError::EmptyName)
    ));
    let err = service.add_habit("Walk", 0, "times", day(10)).unwrap_err();
    assert!(matches!(
        err,
        HabitServiceError::Validation(HabitValidationError::NonPositiveTarget(0))
    ));
    assert!(service.list_habits().unwrap().is_empty());

    let habit = service.add_habit(" Walk ", 1, "times", day(10)).unwrap();
    assert_eq!(habit.name, "Walk");
    assert_eq!(habit.last_updated, "2024-05-10");
    assert_eq!(service.list_habits().unwrap(), vec![habit]);
}

#[test]
fn checking_and_progress_drive_completion_percentage() {
    let conn = open_db_in_memory().unwrap();
    let service = HabitService::new(SqliteKeyValueStore::new(&conn));

    let water = service.add_habit("Water", 8, "glasses", day(10)).unwrap();
    let read = service.add_habit("Read", 20, "pages", day(10)).unwrap();
    assert_eq!(service.completion_percentage().unwrap(), 0);

    let checked = service.set_checked(&water.id, true, day(10)).unwrap();
    assert!(checked.completed);
    assert_eq!(checked.current_progress, 8);
    assert_eq!(service.completion_percentage().unwrap(), 50);

    let partial = service.record_progress(&read.id, 12, day(10)).unwrap();
    assert!(!partial.completed);
    assert_eq!(partial.current_progress, 12);

    let overshoot = service.record_progress(&read.id, 45, day(10)).unwrap();
    assert!(overshoot.completed);
    assert_eq!(overshoot.current_progress, 20);
    assert_eq!(service.completion_percentage().unwrap(), 100);

    let unchecked = service.set_checked(&water.id, false, day(10)).unwrap();
    assert_eq!(unchecked.current_progress, 0);
    assert_eq!(service.completion_percentage().unwrap(), 50);
}

#[test]
fn edit_keeps_id_and_position() {
    let conn = open_db_in_memory().unwrap();
    let service = HabitService::new(SqliteKeyValueStore::new(&conn));

    let first = service.add_habit("Walk", 1, "times", day(10)).unwrap();
    let second = service.add_habit("Read", 10, "pages", day(10)).unwrap();

    let edited = service
        .edit_habit(&first.id, "Long walk", 30, "minutes", day(11))
        .unwrap();
    assert_eq!(edited.id, first.id);

    let habits = service.list_habits().unwrap();
    assert_eq!(habits[0].name, "Long walk");
    assert_eq!(habits[0].unit, "minutes");
    assert_eq!(habits[0].last_updated, "2024-05-11");
    assert_eq!(habits[1], second);
}

#[test]
fn unknown_ids_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let service = HabitService::new(SqliteKeyValueStore::new(&conn));

    let err = service.set_checked("missing", true, day(10)).unwrap_err();
    assert!(matches!(err, HabitServiceError::HabitNotFound(id) if id == "missing"));
    let err = service.delete_habit("missing").unwrap_err();
    assert!(matches!(err, HabitServiceError::HabitNotFound(_)));
}

#[test]
fn delete_removes_only_the_target() {
    let conn = open_db_in_memory().unwrap();
    let service = HabitService::new(SqliteKeyValueStore::new(&conn));

    let keep = service.add_habit("Walk", 1, "times", day(10)).unwrap();
    let removed = service.add_habit("Read", 10, "pages", day(10)).unwrap();

    let remaining = service.delete_habit(&removed.id).unwrap();
    assert_eq!(remaining, vec![keep]);
    assert_eq!(service.list_habits().unwrap(), remaining);
}

#[test]
fn daily_reset_runs_once_per_day() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let service = HabitService::new(kv);
    let store = RecordStore::new(kv);

    let habit = service.add_habit("Walk", 1, "times", day(10)).unwrap();
    let first = service.run_daily_reset(day(10)).unwrap();
    assert!(first.did_reset);
    assert_eq!(store.last_reset_date().unwrap(), "2024-05-10");

    service.set_checked(&habit.id, true, day(10)).unwrap();
    let same_day = service.run_daily_reset(day(10)).unwrap();
    assert!(!same_day.did_reset);
    assert!(service.list_habits().unwrap()[0].completed);

    let next_day = service.run_daily_reset(day(11)).unwrap();
    assert!(next_day.did_reset);
    let habits = service.list_habits().unwrap();
    assert!(!habits[0].completed);
    assert_eq!(habits[0].current_progress, 0);
    assert_eq!(habits[0].id, habit.id);
    assert_eq!(store.last_reset_date().unwrap(), "2024-05-11");

    let again = service.run_daily_reset(day(11)).unwrap();
    assert!(!again.did_reset);
}

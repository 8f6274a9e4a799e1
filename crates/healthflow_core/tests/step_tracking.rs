use healthflow_core::db::open_db_in_memory;
use healthflow_core::{AccelSample, SqliteKeyValueStore, StepService};

fn sample(x: f32, at_ms: i64) -> AccelSample {
    AccelSample {
        x,
        y: 0.0,
        z: 9.8,
        at_ms,
    }
}

#[test]
fn hardware_counter_counts_from_first_reading() {
    let conn = open_db_in_memory().unwrap();
    let mut service = StepService::new(SqliteKeyValueStore::new(&conn));

    assert_eq!(service.record_hardware_total(0).unwrap(), 0);
    assert_eq!(service.record_hardware_total(10_000).unwrap(), 0);
    assert_eq!(service.record_hardware_total(10_250).unwrap(), 250);
    assert_eq!(service.steps_today().unwrap(), 250);
    assert_eq!(service.lifetime_steps().unwrap(), 250);
}

#[test]
fn restarted_service_keeps_counting_from_stored_steps() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    let mut first = StepService::new(kv);
    first.record_hardware_total(10_000).unwrap();
    first.record_hardware_total(10_250).unwrap();

    let mut restarted = StepService::new(kv);
    assert_eq!(restarted.record_hardware_total(20_000).unwrap(), 250);
    assert_eq!(restarted.record_hardware_total(20_010).unwrap(), 260);
    assert_eq!(restarted.lifetime_steps().unwrap(), 260);
}

#[test]
fn reset_zeroes_today_but_keeps_lifetime() {
    let conn = open_db_in_memory().unwrap();
    let mut service = StepService::new(SqliteKeyValueStore::new(&conn));

    service.record_hardware_total(5_000).unwrap();
    service.record_hardware_total(5_400).unwrap();
    service.reset_steps().unwrap();

    assert_eq!(service.steps_today().unwrap(), 0);
    assert_eq!(service.lifetime_steps().unwrap(), 400);

    assert_eq!(service.record_hardware_total(5_450).unwrap(), 0);
    assert_eq!(service.record_hardware_total(5_460).unwrap(), 10);
    assert_eq!(service.lifetime_steps().unwrap(), 410);
}

#[test]
fn accelerometer_movement_adds_single_steps() {
    let conn = open_db_in_memory().unwrap();
    let mut service = StepService::new(SqliteKeyValueStore::new(&conn));

    assert_eq!(service.record_motion(sample(0.0, 0)).unwrap(), 0);
    assert_eq!(service.record_motion(sample(30.0, 200)).unwrap(), 1);
    // Inside the sample gap.
    assert_eq!(service.record_motion(sample(0.0, 250)).unwrap(), 1);
    // Too small to count.
    assert_eq!(service.record_motion(sample(30.5, 400)).unwrap(), 1);
    assert_eq!(service.record_motion(sample(0.0, 600)).unwrap(), 2);
    assert_eq!(service.lifetime_steps().unwrap(), 2);
}

#[test]
fn enable_flag_persists() {
    let conn = open_db_in_memory().unwrap();
    let service = StepService::new(SqliteKeyValueStore::new(&conn));

    assert!(!service.is_enabled().unwrap());
    service.set_enabled(true).unwrap();
    assert!(service.is_enabled().unwrap());
}

#[test]
fn detector_state_carries_across_service_instances() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);

    let mut first = StepService::new(kv);
    first.record_motion(sample(0.0, 0)).unwrap();
    let state = first.into_state();

    let mut second = StepService::with_state(kv, state);
    assert_eq!(second.record_motion(sample(30.0, 200)).unwrap(), 1);
}

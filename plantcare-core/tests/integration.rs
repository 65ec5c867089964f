//! Integration tests for the care engine over a file-backed database
//!
//! These tests drive the full flow: records written through `Database`,
//! read back through `PlantStore`, and classified into snapshots, calendars
//! and streaks.

use chrono::NaiveDate;
use plantcare_core::care::{
    build_month, classify, compute_next_due, plant_streak, CalendarMonth, CareSnapshot, Urgency,
};
use plantcare_core::config::CareConfig;
use plantcare_core::{Database, FixedClock, NewPlant, PlantStore, WateringEvent};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Open a migrated database in a fresh temp directory
fn open_db() -> (TempDir, Database) {
    plantcare_core::logging::init_test();
    let dir = TempDir::new().expect("failed to create temp dir");
    let db = Database::open(&dir.path().join("plants.db")).expect("failed to open db");
    db.migrate().expect("failed to migrate");
    (dir, db)
}

fn weekly(species: &str) -> NewPlant {
    NewPlant {
        species: species.to_string(),
        nickname: None,
        watering_interval_days: 7,
        last_watered_at: None,
    }
}

// ============================================
// Scheduling scenarios
// ============================================

#[test]
fn test_weekly_plant_due_then_overdue() {
    let (_dir, db) = open_db();
    let plant = db
        .add_plant(
            &NewPlant {
                last_watered_at: Some(date(2024, 1, 10)),
                ..weekly("Peace Lily")
            },
            date(2024, 1, 10),
        )
        .unwrap();
    assert_eq!(plant.next_due_at, date(2024, 1, 17));

    let on_time = CareSnapshot::build(&db, &FixedClock(date(2024, 1, 17)), None).unwrap();
    assert_eq!(on_time.entries[0].status.urgency, Urgency::DueToday);

    let late = CareSnapshot::build(&db, &FixedClock(date(2024, 1, 20)), None).unwrap();
    let status = &late.entries[0].status;
    assert_eq!(status.urgency, Urgency::Overdue);
    assert_eq!(status.label, "3 days overdue");
    assert_eq!(status.progress_fraction, 1.0);
}

#[test]
fn test_next_due_matches_stored_schedule() {
    let (_dir, db) = open_db();
    let today = date(2024, 3, 1);
    let plant = db.add_plant(&weekly("Snake Plant"), today).unwrap();
    assert_eq!(plant.next_due_at, compute_next_due(None, 7, today).unwrap());

    let watered = db
        .record_watering(&WateringEvent::new(&plant.id, date(2024, 3, 1)), today)
        .unwrap();
    assert_eq!(
        watered.next_due_at,
        compute_next_due(watered.last_watered_at, 7, today).unwrap()
    );
}

#[test]
fn test_interval_edit_reclassifies_against_current_interval() {
    let (_dir, db) = open_db();
    let today = date(2024, 5, 1);
    let plant = db
        .add_plant(
            &NewPlant {
                last_watered_at: Some(today),
                watering_interval_days: 30,
                ..weekly("Jade")
            },
            today,
        )
        .unwrap();

    // Stored due date is from the old interval; progress uses the new one
    let status = classify(plant.next_due_at, today, 3).unwrap();
    assert_eq!(status.urgency, Urgency::Healthy);
    assert_eq!(status.progress_fraction, 0.0);

    let updated = db.update_interval(&plant.id, 3, today).unwrap();
    assert_eq!(updated.next_due_at, date(2024, 5, 4));
}

// ============================================
// Calendar
// ============================================

#[test]
fn test_month_calendar_from_store() {
    let (_dir, db) = open_db();
    let today = date(2024, 2, 10);
    let fern = db
        .add_plant(
            &NewPlant {
                last_watered_at: Some(date(2024, 2, 8)),
                watering_interval_days: 3,
                ..weekly("Fern")
            },
            today,
        )
        .unwrap();
    let cactus = db.add_plant(&weekly("Cactus"), today).unwrap();

    let plants = db.list_plants().unwrap();
    let buckets = build_month(&plants, CalendarMonth::new(2024, 2).unwrap());
    assert_eq!(buckets.len(), 29);

    assert!(buckets[7].plants_watered.contains(&fern.id));
    assert!(buckets[10].plants_due.contains(&fern.id));
    assert!(buckets[9].plants_due.contains(&cactus.id));
    assert!(buckets.iter().all(|b| !b.plants_watered.contains(&cactus.id)));

    let snapshot =
        CareSnapshot::build(&db, &FixedClock(today), Some(CalendarMonth::new(2024, 2).unwrap()))
            .unwrap();
    assert_eq!(snapshot.calendar, buckets);
}

// ============================================
// Streaks
// ============================================

#[test]
fn test_streak_from_recorded_waterings() {
    let (_dir, db) = open_db();
    let plant = db.add_plant(&weekly("Monstera"), date(2024, 1, 1)).unwrap();

    for day in [1, 8, 15] {
        db.record_watering(
            &WateringEvent::new(&plant.id, date(2024, 1, day)),
            date(2024, 1, day),
        )
        .unwrap();
    }

    let plant = db.get_plant(&plant.id).unwrap().unwrap();
    let care = CareConfig::default();
    let streak = plant_streak(&db, &plant, date(2024, 1, 15), &care).unwrap();
    assert_eq!(streak.current_streak_days, 2);
    assert_eq!(streak.best_streak_days, 2);

    // Late watering resets the current streak but keeps the best
    db.record_watering(
        &WateringEvent::new(&plant.id, date(2024, 1, 30)),
        date(2024, 1, 30),
    )
    .unwrap();
    let streak = plant_streak(&db, &plant, date(2024, 1, 30), &care).unwrap();
    assert_eq!(streak.current_streak_days, 0);
    assert_eq!(streak.best_streak_days, 2);
}

#[test]
fn test_grace_days_from_config() {
    let (_dir, db) = open_db();
    let plant = db.add_plant(&weekly("Calathea"), date(2024, 1, 1)).unwrap();
    for day in [1, 9] {
        db.record_watering(
            &WateringEvent::new(&plant.id, date(2024, 1, day)),
            date(2024, 1, day),
        )
        .unwrap();
    }

    let strict = plant_streak(&db, &plant, date(2024, 1, 9), &CareConfig::default()).unwrap();
    assert_eq!(strict.current_streak_days, 0);

    let lenient =
        plant_streak(&db, &plant, date(2024, 1, 9), &CareConfig { grace_days: 1 }).unwrap();
    assert_eq!(lenient.current_streak_days, 1);
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plants.db");
    let id = {
        let db = Database::open(&path).unwrap();
        db.migrate().unwrap();
        db.add_plant(&weekly("Ivy"), date(2024, 1, 1)).unwrap().id
    };

    let db = Database::open(&path).unwrap();
    db.migrate().unwrap();
    let plants = db.list_plants().unwrap();
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0].id, id);
    assert_eq!(plants[0].display_name(), "Ivy");
}

mod common;

use chrono::Utc;
use vitalcoach::core::records::{self, RecordError};
use vitalcoach::db::RecordQuery;
use vitalcoach::models::health::{MealType, NewHealthRecord, Vitals};

#[test]
fn test_log_and_read_back() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");

    let input = NewHealthRecord {
        recorded_at: Some(common::noon(common::day(2026, 3, 2))),
        vitals: Vitals {
            steps: Some(9500.0),
            bp_systolic: Some(128.0),
            bp_diastolic: Some(82.0),
            ..Default::default()
        },
        medications: Some("  Ramipril 5mg ".to_string()),
        meal_type: Some(MealType::Lunch),
        notes: Some("   ".to_string()),
    };
    let saved = records::log_record(&db, &user.id, input, Utc::now()).unwrap();
    assert_eq!(saved.medications.as_deref(), Some("Ramipril 5mg"));
    assert!(saved.notes.is_none());

    let loaded = db.get_record(&user.id, &saved.id).unwrap().unwrap();
    assert_eq!(loaded.vitals, saved.vitals);
    assert_eq!(loaded.recorded_at, saved.recorded_at);
    assert_eq!(loaded.meal_type, Some(MealType::Lunch));
}

#[test]
fn test_invalid_record_not_stored() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let input = NewHealthRecord {
        vitals: Vitals {
            heart_rate: Some(5.0),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = records::log_record(&db, &user.id, input, Utc::now()).unwrap_err();
    assert!(matches!(err, RecordError::Invalid(_)));
    assert_eq!(db.count_records(&user.id).unwrap(), 0);
}

#[test]
fn test_date_range_is_inclusive_and_chronological() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    common::insert_series(
        &db,
        &user.id,
        common::day(2026, 3, 1),
        &[70.0, 70.5, 71.0, 71.5, 72.0],
        |w| Vitals {
            weight: Some(w),
            ..Default::default()
        },
    );

    let q = RecordQuery {
        from: Some(common::noon(common::day(2026, 3, 2))),
        to: Some(common::noon(common::day(2026, 3, 4))),
        limit: None,
    };
    let rows = records::list_records(&db, &user.id, &q).unwrap();
    let weights: Vec<f64> = rows.iter().filter_map(|r| r.vitals.weight).collect();
    assert_eq!(weights, vec![70.5, 71.0, 71.5]);
}

#[test]
fn test_limit_keeps_most_recent() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    common::insert_series(&db, &user.id, common::day(2026, 3, 1), &[1.0, 2.0, 3.0, 4.0], |m| {
        Vitals {
            mood: Some(m),
            ..Default::default()
        }
    });

    let q = RecordQuery {
        limit: Some(2),
        ..Default::default()
    };
    let rows = records::list_records(&db, &user.id, &q).unwrap();
    let moods: Vec<f64> = rows.iter().filter_map(|r| r.vitals.mood).collect();
    assert_eq!(moods, vec![3.0, 4.0]);
}

#[test]
fn test_inverted_range_is_error() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let q = RecordQuery {
        from: Some(common::noon(common::day(2026, 3, 5))),
        to: Some(common::noon(common::day(2026, 3, 1))),
        limit: None,
    };
    assert!(records::list_records(&db, &user.id, &q).is_err());
}

#[test]
fn test_records_are_private_to_owner() {
    let (_dir, db) = common::setup_db();
    let anna = common::add_user(&db, "anna@example.de");
    let ben = common::add_user(&db, "ben@example.de");
    let r = common::make_record(
        &anna.id,
        Vitals {
            steps: Some(1000.0),
            ..Default::default()
        },
        common::day(2026, 3, 1),
    );
    db.insert_record(&r).unwrap();

    assert!(db.get_record(&ben.id, &r.id).unwrap().is_none());
    assert!(!db.delete_record(&ben.id, &r.id).unwrap());
    assert!(db.delete_record(&anna.id, &r.id).unwrap());
    assert_eq!(db.count_records(&anna.id).unwrap(), 0);
}

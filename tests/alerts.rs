mod common;

use chrono::{Duration, Utc};
use serde_json::json;
use vitalcoach::core::alerts::{self, Averages, Thresholds};
use vitalcoach::models::alert::Severity;
use vitalcoach::models::health::{HealthRecord, Vitals};
use vitalcoach::models::user::{ActivityLevel, HealthGoal};

fn bp(sys: f64, dia: f64) -> Averages {
    Averages {
        bp_systolic: Some(sys),
        bp_diastolic: Some(dia),
        ..Default::default()
    }
}

#[test]
fn test_high_blood_pressure_warning() {
    let hits = alerts::evaluate(&bp(150.0, 85.0), &Thresholds::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].alert_type, "high_blood_pressure");
    assert_eq!(hits[0].severity, Severity::Warning);
}

#[test]
fn test_blood_pressure_at_threshold_not_flagged() {
    assert!(alerts::evaluate(&bp(140.0, 90.0), &Thresholds::default()).is_empty());
}

#[test]
fn test_average_barely_past_threshold_is_flagged() {
    let hits = alerts::evaluate(&bp(140.04, 80.0), &Thresholds::default());
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].alert_type, "high_blood_pressure");

    let steps = Averages {
        steps: Some(4999.96),
        ..Default::default()
    };
    let hits = alerts::evaluate(&steps, &Thresholds::default());
    assert_eq!(hits[0].alert_type, "low_activity");
}

#[test]
fn test_generate_compares_unrounded_averages() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let now = Utc::now();

    let mut readings = vec![140.0; 9];
    readings.push(140.4);
    for (i, sys) in readings.into_iter().enumerate() {
        let mut r = HealthRecord::new(
            &user.id,
            Vitals {
                bp_systolic: Some(sys),
                bp_diastolic: Some(80.0),
                ..Default::default()
            },
        );
        r.recorded_at = now - Duration::hours(i as i64 + 1);
        db.insert_record(&r).unwrap();
    }

    let report = alerts::generate(&db, &user, now).unwrap();
    assert!(report.averages.bp_systolic.unwrap() > 140.0);
    assert_eq!(report.alerts.len(), 1);

    // Serialized averages stay rounded to one decimal.
    let json = serde_json::to_value(&report.averages).unwrap();
    assert_eq!(json["bp_systolic"], 140.0);
}

#[test]
fn test_hypertensive_crisis_is_critical() {
    let hits = alerts::evaluate(&bp(185.0, 100.0), &Thresholds::default());
    assert_eq!(hits[0].severity, Severity::Critical);
}

#[test]
fn test_missing_metrics_do_not_alert() {
    assert!(alerts::evaluate(&Averages::default(), &Thresholds::default()).is_empty());
}

#[test]
fn test_several_rules_fire_together() {
    let avg = Averages {
        heart_rate: Some(110.0),
        steps: Some(2000.0),
        sleep_hours: Some(5.0),
        calories: Some(900.0),
        ..Default::default()
    };
    let types: Vec<String> = alerts::evaluate(&avg, &Thresholds::default())
        .into_iter()
        .map(|a| a.alert_type)
        .collect();
    assert_eq!(
        types,
        vec![
            "high_heart_rate",
            "low_activity",
            "insufficient_sleep",
            "low_calorie_intake"
        ]
    );
}

#[test]
fn test_profile_adjusts_thresholds() {
    let sedentary = Thresholds::for_profile(ActivityLevel::Sedentary, HealthGoal::Maintain);
    assert_eq!(sedentary.steps_min, 3000.0);

    let athlete = Thresholds::for_profile(ActivityLevel::VeryActive, HealthGoal::Maintain);
    assert_eq!(athlete.heart_rate_min, 40.0);
    let resting_48 = Averages {
        heart_rate: Some(48.0),
        ..Default::default()
    };
    assert!(alerts::evaluate(&resting_48, &athlete).is_empty());
    assert_eq!(alerts::evaluate(&resting_48, &Thresholds::default()).len(), 1);

    let cutting = Thresholds::for_profile(ActivityLevel::Moderate, HealthGoal::LoseWeight);
    assert_eq!(cutting.calories_max, 2000.0);
}

#[test]
fn test_user_overrides_merge_over_profile() {
    let (_dir, db) = common::setup_db();
    let mut user = common::add_user(&db, "anna@example.de");
    user.activity_level = ActivityLevel::Active;
    user.alert_thresholds = Some(json!({ "bp_systolic_max": 130 }));

    let t = Thresholds::for_user(&user);
    assert_eq!(t.bp_systolic_max, 130.0);
    assert_eq!(t.steps_min, 8000.0);
    assert_eq!(t.bp_diastolic_max, 90.0);

    user.alert_thresholds = Some(json!("kaputt"));
    assert_eq!(
        Thresholds::for_user(&user),
        Thresholds::for_profile(ActivityLevel::Active, HealthGoal::Maintain)
    );
}

#[test]
fn test_generate_uses_last_seven_days_and_persists() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let now = Utc::now();

    for days_ago in [1, 2, 3] {
        let mut r = HealthRecord::new(
            &user.id,
            Vitals {
                bp_systolic: Some(155.0),
                bp_diastolic: Some(95.0),
                ..Default::default()
            },
        );
        r.recorded_at = now - Duration::days(days_ago);
        db.insert_record(&r).unwrap();
    }
    // Old normal readings fall outside the averaging window.
    let mut old = HealthRecord::new(
        &user.id,
        Vitals {
            bp_systolic: Some(110.0),
            bp_diastolic: Some(70.0),
            ..Default::default()
        },
    );
    old.recorded_at = now - Duration::days(20);
    db.insert_record(&old).unwrap();

    let report = alerts::generate(&db, &user, now).unwrap();
    assert_eq!(report.averages.record_count, 3);
    assert_eq!(report.averages.bp_systolic, Some(155.0));
    assert_eq!(report.alerts.len(), 1);

    let history = db.list_alerts(&user.id, false, None).unwrap();
    assert_eq!(history.len(), 1);
    assert!(!history[0].acknowledged);

    assert!(db.acknowledge_alert(&user.id, &history[0].id).unwrap());
    assert!(db.list_alerts(&user.id, true, None).unwrap().is_empty());
}

#[test]
fn test_generate_without_data_is_quiet() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");
    let report = alerts::generate(&db, &user, Utc::now()).unwrap();
    assert!(report.alerts.is_empty());
    assert!(db.list_alerts(&user.id, false, None).unwrap().is_empty());
}

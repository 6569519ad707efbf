use chrono::{Duration, Utc};
use vitalcoach::core::validation::{validate_profile, validate_record, validate_registration};
use vitalcoach::models::health::{NewHealthRecord, Vitals};
use vitalcoach::models::user::{ProfileUpdate, Registration};

fn with_vitals(vitals: Vitals) -> NewHealthRecord {
    NewHealthRecord {
        vitals,
        ..Default::default()
    }
}

#[test]
fn test_valid_record_passes() {
    let input = with_vitals(Vitals {
        steps: Some(8000.0),
        heart_rate: Some(62.0),
        bp_systolic: Some(120.0),
        bp_diastolic: Some(80.0),
        ..Default::default()
    });
    assert!(validate_record(&input, Utc::now()).is_ok());
}

#[test]
fn test_empty_record_rejected() {
    let err = validate_record(&NewHealthRecord::default(), Utc::now()).unwrap_err();
    assert!(err.has_field("record"));
}

#[test]
fn test_out_of_range_values_collected() {
    let input = with_vitals(Vitals {
        heart_rate: Some(300.0),
        spo2: Some(101.0),
        steps: Some(-1.0),
        ..Default::default()
    });
    let err = validate_record(&input, Utc::now()).unwrap_err();
    assert!(err.has_field("heart_rate"));
    assert!(err.has_field("spo2"));
    assert!(err.has_field("steps"));
    assert_eq!(err.0.len(), 3);
}

#[test]
fn test_range_bounds_inclusive() {
    let input = with_vitals(Vitals {
        sleep_hours: Some(24.0),
        mood: Some(1.0),
        stress_level: Some(10.0),
        ..Default::default()
    });
    assert!(validate_record(&input, Utc::now()).is_ok());
}

#[test]
fn test_blood_pressure_pairing() {
    let only_sys = with_vitals(Vitals {
        bp_systolic: Some(120.0),
        ..Default::default()
    });
    let err = validate_record(&only_sys, Utc::now()).unwrap_err();
    assert!(err.has_field("bp_diastolic"));

    let inverted = with_vitals(Vitals {
        bp_systolic: Some(80.0),
        bp_diastolic: Some(120.0),
        ..Default::default()
    });
    let err = validate_record(&inverted, Utc::now()).unwrap_err();
    assert!(err.has_field("bp_diastolic"));
}

#[test]
fn test_future_timestamp_rejected() {
    let now = Utc::now();
    let mut input = with_vitals(Vitals {
        weight: Some(70.0),
        ..Default::default()
    });
    input.recorded_at = Some(now + Duration::hours(2));
    assert!(validate_record(&input, now).is_ok());

    input.recorded_at = Some(now + Duration::days(3));
    let err = validate_record(&input, now).unwrap_err();
    assert!(err.has_field("recorded_at"));
}

#[test]
fn test_notes_length_limit() {
    let mut input = with_vitals(Vitals {
        weight: Some(70.0),
        ..Default::default()
    });
    input.notes = Some("x".repeat(2001));
    assert!(validate_record(&input, Utc::now()).unwrap_err().has_field("notes"));
}

#[test]
fn test_registration_rules() {
    let bad = Registration {
        email: "kein-email".to_string(),
        name: " ".to_string(),
        password: "kurz".to_string(),
    };
    let err = validate_registration(&bad).unwrap_err();
    assert!(err.has_field("email"));
    assert!(err.has_field("name"));
    assert!(err.has_field("password"));
}

#[test]
fn test_profile_threshold_overrides_checked() {
    let update: ProfileUpdate =
        serde_json::from_str(r#"{"alert_thresholds": {"steps_min": -5}}"#).unwrap();
    assert!(validate_profile(&update).unwrap_err().has_field("alert_thresholds"));

    let update: ProfileUpdate =
        serde_json::from_str(r#"{"alert_thresholds": {"no_such_key": 1}}"#).unwrap();
    assert!(validate_profile(&update).is_err());

    let update: ProfileUpdate =
        serde_json::from_str(r#"{"alert_thresholds": null, "height_cm": 180}"#).unwrap();
    assert!(validate_profile(&update).is_ok());
    assert_eq!(update.alert_thresholds, Some(serde_json::Value::Null));
}

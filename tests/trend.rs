mod common;

use vitalcoach::core::trend::{self, WINDOW};
use vitalcoach::models::health::{MetricKind, Vitals};
use vitalcoach::models::insight::TrendDirection;

#[test]
fn test_insufficient_data_yields_none() {
    let values = vec![1.0; 2 * WINDOW - 1];
    assert!(trend::compute_trend(&values, WINDOW).is_none());
}

#[test]
fn test_rising_series() {
    let mut values = vec![5000.0; WINDOW];
    values.extend(vec![6000.0; WINDOW]);
    let t = trend::compute_trend(&values, WINDOW).unwrap();
    assert_eq!(t.direction, TrendDirection::Rising);
    assert_eq!(t.previous_avg, 5000.0);
    assert_eq!(t.recent_avg, 6000.0);
    assert_eq!(t.change_pct, 20.0);
}

#[test]
fn test_five_percent_is_still_stable() {
    let mut values = vec![100.0; WINDOW];
    values.extend(vec![105.0; WINDOW]);
    let t = trend::compute_trend(&values, WINDOW).unwrap();
    assert_eq!(t.direction, TrendDirection::Stable);

    let mut values = vec![100.0; WINDOW];
    values.extend(vec![94.0; WINDOW]);
    let t = trend::compute_trend(&values, WINDOW).unwrap();
    assert_eq!(t.direction, TrendDirection::Falling);
}

#[test]
fn test_only_last_two_windows_count() {
    let mut values = vec![1.0; 5];
    values.extend(vec![70.0; 2 * WINDOW]);
    let t = trend::compute_trend(&values, WINDOW).unwrap();
    assert_eq!(t.direction, TrendDirection::Stable);
    assert_eq!(t.change_pct, 0.0);
}

#[test]
fn test_zero_previous_average() {
    let mut values = vec![0.0; WINDOW];
    values.extend(vec![3.0; WINDOW]);
    let t = trend::compute_trend(&values, WINDOW).unwrap();
    assert_eq!(t.direction, TrendDirection::Rising);

    let zeros = vec![0.0; 2 * WINDOW];
    let t = trend::compute_trend(&zeros, WINDOW).unwrap();
    assert_eq!(t.direction, TrendDirection::Stable);
}

#[test]
fn test_insights_from_stored_records() {
    let (_dir, db) = common::setup_db();
    let user = common::add_user(&db, "anna@example.de");

    let mut weights = vec![80.0; WINDOW];
    weights.extend(vec![75.0; WINDOW]);
    common::insert_series(&db, &user.id, common::day(2026, 2, 1), &weights, |w| Vitals {
        weight: Some(w),
        steps: Some(7000.0),
        ..Default::default()
    });

    let insights = trend::compute_insights(&db, &user.id).unwrap();
    let weight = insights
        .iter()
        .find(|i| i.metric == MetricKind::Weight)
        .unwrap();
    assert_eq!(weight.trend, TrendDirection::Falling);
    assert_eq!(weight.unit, "kg");
    assert!(!weight.recommendation.is_empty());

    let steps = insights
        .iter()
        .find(|i| i.metric == MetricKind::Steps)
        .unwrap();
    assert_eq!(steps.trend, TrendDirection::Stable);

    assert!(insights.iter().all(|i| i.metric != MetricKind::HeartRate));
}

#[test]
fn test_direction_serializes_as_label() {
    let v = serde_json::to_value(TrendDirection::Rising).unwrap();
    assert_eq!(v, "steigend");
    assert_eq!(TrendDirection::Stable.to_string(), "stabil");
}

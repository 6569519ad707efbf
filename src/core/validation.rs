use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::models::health::{NewHealthRecord, Vitals};
use crate::models::user::{ProfileUpdate, Registration};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const MAX_MEDICATIONS_LEN: usize = 500;
const MAX_NOTES_LEN: usize = 2000;
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field-level problem found in one request body.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("validation failed: {}", summarize(.0))]
pub struct ValidationError(pub Vec<FieldError>);

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self.0))
        }
    }
}

/// Inclusive range per numeric field.
fn range_for(field: &str) -> (f64, f64) {
    match field {
        "steps" => (0.0, 100_000.0),
        "heart_rate" => (20.0, 250.0),
        "sleep_hours" => (0.0, 24.0),
        "sleep_quality" => (1.0, 10.0),
        "weight" => (20.0, 500.0),
        "calories" => (0.0, 15_000.0),
        "bp_systolic" => (50.0, 300.0),
        "bp_diastolic" => (30.0, 200.0),
        "spo2" => (50.0, 100.0),
        "body_fat" => (1.0, 75.0),
        "muscle_mass" => (5.0, 200.0),
        "water_intake" => (0.0, 15.0),
        "exercise_minutes" => (0.0, 1440.0),
        "blood_glucose" => (20.0, 600.0),
        "body_temperature" => (30.0, 45.0),
        "mood" | "stress_level" => (1.0, 10.0),
        _ => (f64::NEG_INFINITY, f64::INFINITY),
    }
}

fn check_vitals(v: &Vitals, errors: &mut Collector) {
    for (field, value) in v.fields() {
        let Some(value) = value else { continue };
        if !value.is_finite() {
            errors.push(field, "must be a finite number");
            continue;
        }
        let (min, max) = range_for(field);
        if value < min || value > max {
            errors.push(field, format!("must be between {} and {}", min, max));
        }
    }
    if let (Some(sys), Some(dia)) = (v.bp_systolic, v.bp_diastolic)
        && dia >= sys
    {
        errors.push("bp_diastolic", "must be lower than bp_systolic");
    }
}

/// Validate a new health record against field ranges and required content.
pub fn validate_record(input: &NewHealthRecord, now: DateTime<Utc>) -> Result<(), ValidationError> {
    let mut errors = Collector::default();

    let has_text = input.medications.as_deref().is_some_and(|m| !m.trim().is_empty())
        || input.meal_type.is_some();
    if input.vitals.is_empty() && !has_text {
        errors.push("record", "at least one measurement is required");
    }

    check_vitals(&input.vitals, &mut errors);

    if input.vitals.bp_systolic.is_some() != input.vitals.bp_diastolic.is_some() {
        let missing = if input.vitals.bp_systolic.is_some() {
            "bp_diastolic"
        } else {
            "bp_systolic"
        };
        errors.push(missing, "blood pressure needs both systolic and diastolic values");
    }

    if let Some(ts) = input.recorded_at
        && ts > now + Duration::hours(24)
    {
        errors.push("recorded_at", "must not lie in the future");
    }
    if let Some(ref m) = input.medications
        && m.chars().count() > MAX_MEDICATIONS_LEN
    {
        errors.push(
            "medications",
            format!("must be at most {} characters", MAX_MEDICATIONS_LEN),
        );
    }
    if let Some(ref n) = input.notes
        && n.chars().count() > MAX_NOTES_LEN
    {
        errors.push("notes", format!("must be at most {} characters", MAX_NOTES_LEN));
    }

    errors.finish()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn validate_registration(reg: &Registration) -> Result<(), ValidationError> {
    let mut errors = Collector::default();
    if reg.email.trim().is_empty() {
        errors.push("email", "is required");
    } else if !is_valid_email(&reg.email) {
        errors.push("email", "is not a valid email address");
    }
    if reg.name.trim().is_empty() {
        errors.push("name", "is required");
    }
    if reg.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
    errors.finish()
}

pub fn validate_profile(update: &ProfileUpdate) -> Result<(), ValidationError> {
    let mut errors = Collector::default();
    if let Some(ref name) = update.name
        && name.trim().is_empty()
    {
        errors.push("name", "must not be empty");
    }
    if let Some(h) = update.height_cm
        && !(50.0..=272.0).contains(&h)
    {
        errors.push("height_cm", "must be between 50 and 272");
    }
    if let Some(y) = update.birth_year
        && !(1900..=2100).contains(&y)
    {
        errors.push("birth_year", "must be between 1900 and 2100");
    }
    if let Some(ref blob) = update.alert_thresholds
        && !blob.is_null()
        && let Err(e) = crate::core::alerts::ThresholdOverrides::from_json(blob)
    {
        errors.push("alert_thresholds", e.to_string());
    }
    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("anna@example.de"));
        assert!(!is_valid_email("anna@"));
        assert!(!is_valid_email("no at sign.de"));
    }

    #[test]
    fn range_lookup_is_inclusive() {
        let v = Vitals {
            spo2: Some(100.0),
            heart_rate: Some(20.0),
            ..Default::default()
        };
        let mut c = Collector::default();
        check_vitals(&v, &mut c);
        assert!(c.0.is_empty());
    }
}

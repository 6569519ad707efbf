use anyhow::Result;

use crate::core::validation::{self, ValidationError};
use crate::db::Database;
use crate::models::user::{ProfileUpdate, User};

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Apply a partial profile update. A JSON `null` for `alert_thresholds`
/// removes the custom overrides.
pub fn update(db: &Database, mut user: User, update: ProfileUpdate) -> Result<User, ProfileError> {
    validation::validate_profile(&update)?;

    if let Some(name) = update.name {
        user.name = name.trim().to_string();
    }
    if update.height_cm.is_some() {
        user.height_cm = update.height_cm;
    }
    if update.birth_year.is_some() {
        user.birth_year = update.birth_year;
    }
    if let Some(level) = update.activity_level {
        user.activity_level = level;
    }
    if let Some(goal) = update.goal {
        user.goal = goal;
    }
    if let Some(blob) = update.alert_thresholds {
        user.alert_thresholds = if blob.is_null() { None } else { Some(blob) };
    }

    db.update_user(&user)?;
    Ok(user)
}

/// BMI from height and weight, rounded to one decimal.
pub fn bmi(height_cm: Option<f64>, weight_kg: Option<f64>) -> Option<f64> {
    match (height_cm, weight_kg) {
        (Some(h), Some(w)) if h > 0.0 => {
            let h_m = h / 100.0;
            Some((w / (h_m * h_m) * 10.0).round() / 10.0)
        }
        _ => None,
    }
}

pub fn bmi_category(bmi: f64) -> &'static str {
    match bmi {
        b if b < 18.5 => "underweight",
        b if b < 25.0 => "normal",
        b if b < 30.0 => "overweight",
        _ => "obese",
    }
}
